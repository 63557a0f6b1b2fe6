//! Client connection handling.

use std::os::unix::net::UnixStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tracing::info;

use crate::daemon::protocol::{read_message, write_message, Request, Response};
use crate::monitor::Monitor;
use crate::notify::StatusEvent;
use crate::settings::{SensorSettings, Settings, SettingsStore};

/// Handle a client connection until it disconnects or unsubscribes.
pub(super) fn handle_client_connection(
    mut stream: UnixStream,
    shutdown_flag: Arc<AtomicBool>,
    monitor: Arc<Mutex<Monitor>>,
    store: SettingsStore,
    status_subscribers: Arc<Mutex<Vec<UnixStream>>>,
) -> Result<()> {
    loop {
        let request: Request = match read_message(&mut stream) {
            Ok(req) => req,
            Err(_) => {
                // Client disconnected or error reading
                break;
            }
        };

        match request {
            Request::Ping => {
                write_message(&mut stream, &Response::Pong)?;
            }
            Request::Stop => {
                info!("shutdown requested");
                write_message(&mut stream, &Response::Ok)?;
                shutdown_flag.store(true, Ordering::Relaxed);
                break;
            }
            Request::Status => {
                let response = match monitor.lock() {
                    Ok(monitor) => Response::Status {
                        status: monitor.status(),
                    },
                    Err(_) => Response::Error {
                        message: "Monitor state is poisoned".to_string(),
                    },
                };
                write_message(&mut stream, &response)?;
            }
            Request::SubscribeStatus => {
                // Snapshot first; taking the monitor lock while holding the
                // subscriber lock would invert the watcher's lock order.
                let snapshot = monitor.lock().ok().map(|m| m.status());

                if let Ok(stream_clone) = stream.try_clone() {
                    match status_subscribers.lock() {
                        Ok(mut subs) => {
                            subs.push(stream_clone);
                            write_message(&mut stream, &Response::Ok)?;
                            if let Some(status) = snapshot {
                                write_message(
                                    &mut stream,
                                    &Response::StatusUpdate(StatusEvent::status_update(status)),
                                )?;
                            }
                        }
                        Err(_) => {
                            write_message(
                                &mut stream,
                                &Response::Error {
                                    message: "Failed to acquire subscriber lock".to_string(),
                                },
                            )?;
                        }
                    }
                } else {
                    write_message(
                        &mut stream,
                        &Response::Error {
                            message: "Failed to clone stream".to_string(),
                        },
                    )?;
                }
            }
            Request::Unsubscribe => {
                write_message(&mut stream, &Response::Ok)?;
                break;
            }
            Request::ApplySettings(sensor) => {
                let response = apply_settings(&monitor, &store, sensor);
                write_message(&mut stream, &response)?;
            }
            Request::PrintEvent(event) => {
                let response = match monitor.lock() {
                    Ok(mut monitor) => {
                        monitor.on_print_event(event);
                        Response::Ok
                    }
                    Err(_) => Response::Error {
                        message: "Monitor state is poisoned".to_string(),
                    },
                };
                write_message(&mut stream, &response)?;
            }
        }
    }

    Ok(())
}

/// Reconfigure the live monitor, then persist.
fn apply_settings(
    monitor: &Arc<Mutex<Monitor>>,
    store: &SettingsStore,
    sensor: SensorSettings,
) -> Response {
    match monitor.lock() {
        Ok(mut monitor) => monitor.reconfigure(sensor.clone()),
        Err(_) => {
            return Response::Error {
                message: "Monitor state is poisoned".to_string(),
            }
        }
    }

    // Persist outside the monitor lock; file IO must not stall ticks.
    let persisted = store.load().unwrap_or_default();
    let updated = Settings { sensor, ..persisted };
    match store.save(&updated) {
        Ok(()) => Response::SettingsApplied,
        Err(err) => Response::Error {
            message: format!("Settings applied but not persisted: {err:#}"),
        },
    }
}
