//! The watcher thread driving the monitor loop, and the subscriber sink.

use std::os::unix::net::UnixStream;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::daemon::protocol::{write_message, Response};
use crate::notify::{NotificationSink, StatusEvent};

use super::core::DaemonServer;

/// How often the watcher wakes to check the shutdown flag between polls.
const SHUTDOWN_POLL: Duration = Duration::from_millis(250);

/// Pushes status events to all connected subscribers.
///
/// Dead subscribers are pruned on the first failed write; there is no
/// queueing or retry.
pub(crate) struct SubscriberSink {
    subscribers: Arc<Mutex<Vec<UnixStream>>>,
}

impl SubscriberSink {
    pub(crate) fn new(subscribers: Arc<Mutex<Vec<UnixStream>>>) -> Self {
        Self { subscribers }
    }
}

impl NotificationSink for SubscriberSink {
    fn publish(&mut self, event: &StatusEvent) {
        let response = Response::StatusUpdate(event.clone());
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.retain_mut(|stream| write_message(stream, &response).is_ok());
        }
    }
}

/// Spawn the watcher thread.
///
/// The thread ticks the monitor at its poll cadence, re-reading the cadence
/// after every tick so a reconfiguration takes effect on the next cycle.
pub(super) fn spawn_watcher(server: &DaemonServer) -> JoinHandle<()> {
    let shutdown_flag = Arc::clone(&server.shutdown_flag);
    let monitor = Arc::clone(&server.monitor);

    thread::spawn(move || {
        let mut interval = monitor
            .lock()
            .map(|m| m.poll_interval())
            .unwrap_or(Duration::from_secs(5));
        let mut elapsed = Duration::ZERO;

        while !shutdown_flag.load(Ordering::Relaxed) {
            if elapsed >= interval {
                elapsed = Duration::ZERO;
                if let Ok(mut monitor) = monitor.lock() {
                    monitor.tick();
                    interval = monitor.poll_interval();
                }
            }

            // Sleep in short slices so shutdown stays responsive even with
            // long poll intervals.
            thread::sleep(SHUTDOWN_POLL);
            elapsed += SHUTDOWN_POLL;
        }
    })
}
