//! Core DaemonServer struct and status checks.

use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use nix::sys::signal::kill;
use nix::unistd::Pid;

use crate::monitor::Monitor;
use crate::reaction::PrintController;
use crate::sensor::PinDriver;
use crate::settings::SettingsStore;

use super::SubscriberSink;

/// Maximum number of concurrent client connections allowed.
pub(super) const MAX_CONNECTIONS: usize = 32;

/// Daemon status indicating process and socket state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonStatus {
    /// Daemon process not found
    NotRunning,
    /// Daemon process running and socket responsive
    Running,
    /// Daemon process exists but socket unreachable (hung state)
    ProcessOnly,
}

/// Watchdog daemon listening on a Unix domain socket.
pub struct DaemonServer {
    pub(super) socket_path: PathBuf,
    pub(super) pid_path: PathBuf,
    pub(super) log_path: PathBuf,
    pub(super) store: SettingsStore,
    pub(super) monitor: Arc<Mutex<Monitor>>,
    pub(super) shutdown_flag: Arc<AtomicBool>,
    pub(super) connection_count: Arc<AtomicUsize>,
    pub(super) status_subscribers: Arc<Mutex<Vec<UnixStream>>>,
}

impl DaemonServer {
    /// Build the server and its monitor from injected capabilities.
    ///
    /// The monitor configures the sensor immediately, so the initial status
    /// is available before the socket starts accepting clients.
    pub fn new(
        state_dir: &Path,
        store: SettingsStore,
        driver: Box<dyn PinDriver>,
        controller: Box<dyn PrintController>,
    ) -> Result<Self> {
        let settings = store.load()?;
        let status_subscribers = Arc::new(Mutex::new(Vec::new()));
        let sink = SubscriberSink::new(Arc::clone(&status_subscribers));

        let monitor = Monitor::new(driver, controller, Box::new(sink), settings.sensor);

        Ok(Self {
            socket_path: state_dir.join("runout.sock"),
            pid_path: state_dir.join("runout.pid"),
            log_path: state_dir.join("runout.log"),
            store,
            monitor: Arc::new(Mutex::new(monitor)),
            shutdown_flag: Arc::new(AtomicBool::new(false)),
            connection_count: Arc::new(AtomicUsize::new(0)),
            status_subscribers,
        })
    }

    pub fn socket_path(state_dir: &Path) -> PathBuf {
        state_dir.join("runout.sock")
    }

    /// Check daemon status with a socket connectivity test.
    pub fn check_status(state_dir: &Path) -> DaemonStatus {
        let pid_path = state_dir.join("runout.pid");
        let socket_path = state_dir.join("runout.sock");

        if !socket_path.exists() {
            // No socket means the daemon is not accepting connections.
            // Clean up a stale PID file from a crashed run.
            if pid_path.exists() {
                if let Some(pid) = Self::read_pid(state_dir) {
                    if !is_process_alive(pid) {
                        let _ = std::fs::remove_file(&pid_path);
                    }
                }
            }
            return DaemonStatus::NotRunning;
        }

        if let Some(pid) = Self::read_pid(state_dir) {
            if !is_process_alive(pid) {
                let _ = std::fs::remove_file(&pid_path);
                let _ = std::fs::remove_file(&socket_path);
                return DaemonStatus::NotRunning;
            }

            match UnixStream::connect(&socket_path) {
                Ok(stream) => {
                    let _ = stream.set_read_timeout(Some(Duration::from_millis(100)));
                    DaemonStatus::Running
                }
                Err(_) => DaemonStatus::ProcessOnly,
            }
        } else {
            // Socket exists but no PID file - clean up the stale socket
            let _ = std::fs::remove_file(&socket_path);
            DaemonStatus::NotRunning
        }
    }

    pub fn is_running(state_dir: &Path) -> bool {
        matches!(
            Self::check_status(state_dir),
            DaemonStatus::Running | DaemonStatus::ProcessOnly
        )
    }

    /// Read the PID from the PID file.
    pub fn read_pid(state_dir: &Path) -> Option<u32> {
        std::fs::read_to_string(state_dir.join("runout.pid"))
            .ok()
            .and_then(|s| s.trim().parse::<u32>().ok())
    }

    /// Request graceful shutdown.
    pub fn shutdown(&self) {
        self.shutdown_flag.store(true, Ordering::Relaxed);
    }
}

fn is_process_alive(pid: u32) -> bool {
    kill(Pid::from_raw(pid as i32), None).is_ok()
}
