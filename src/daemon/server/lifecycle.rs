//! Daemon server lifecycle methods: start, stop, run.

use std::fs::{self, File, Permissions};
use std::os::unix::fs::PermissionsExt;
use std::os::unix::io::AsRawFd;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use nix::unistd::{fork, setsid, ForkResult};
use tracing::{error, warn};

use crate::daemon::protocol::{read_message, write_message, Request, Response};

use super::client::handle_client_connection;
use super::core::{DaemonServer, MAX_CONNECTIONS};
use super::watcher::spawn_watcher;

impl DaemonServer {
    /// Stop a running daemon by sending a stop request via socket.
    pub fn stop(state_dir: &Path) -> Result<()> {
        let socket_path = Self::socket_path(state_dir);

        if !Self::is_running(state_dir) {
            bail!("Daemon is not running");
        }

        let mut stream =
            UnixStream::connect(&socket_path).context("Failed to connect to daemon socket")?;
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .context("Failed to set read timeout")?;

        write_message(&mut stream, &Request::Stop).context("Failed to send stop request")?;

        let response: Response = match read_message(&mut stream) {
            Ok(resp) => resp,
            Err(e) => {
                if let Some(io_err) = e.downcast_ref::<std::io::Error>() {
                    if io_err.kind() == std::io::ErrorKind::WouldBlock
                        || io_err.kind() == std::io::ErrorKind::TimedOut
                    {
                        bail!(
                            "Daemon did not respond within 5 seconds. \
                             It may be frozen. Try: kill $(cat {})",
                            state_dir.join("runout.pid").display()
                        );
                    }
                }
                return Err(e).context("Failed to read stop response");
            }
        };

        match response {
            Response::Ok => Ok(()),
            Response::Error { message } => bail!("Daemon returned error: {message}"),
            _ => bail!("Unexpected response from daemon"),
        }
    }

    /// Start the daemon (daemonize process).
    pub fn start(&self) -> Result<()> {
        // Remove stale socket if it exists (ignore NotFound to avoid TOCTOU race)
        if let Err(e) = fs::remove_file(&self.socket_path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                return Err(e).context("Failed to remove stale socket file");
            }
        }

        // First fork - parent exits, child continues
        match unsafe { fork() }.context("First fork failed")? {
            ForkResult::Parent { .. } => {
                std::process::exit(0);
            }
            ForkResult::Child => {}
        }

        // Create new session (detach from controlling terminal)
        setsid().context("setsid failed")?;

        // Second fork - prevents acquiring a controlling terminal
        match unsafe { fork() }.context("Second fork failed")? {
            ForkResult::Parent { .. } => {
                std::process::exit(0);
            }
            ForkResult::Child => {}
        }

        // Redirect stdout and stderr to the log file
        let log_file = File::create(&self.log_path).context("Failed to create log file")?;
        let log_fd = log_file.as_raw_fd();

        unsafe {
            libc::close(0);
            if libc::dup2(log_fd, 1) < 0 {
                bail!("Failed to redirect stdout");
            }
            if libc::dup2(log_fd, 2) < 0 {
                bail!("Failed to redirect stderr");
            }
        }

        self.run_server()
    }

    /// Run the daemon in the foreground, stopping on Ctrl-C.
    pub fn run_foreground(&self) -> Result<()> {
        if let Err(e) = fs::remove_file(&self.socket_path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                return Err(e).context("Failed to remove stale socket file");
            }
        }

        let shutdown_flag = Arc::clone(&self.shutdown_flag);
        ctrlc::set_handler(move || {
            shutdown_flag.store(true, Ordering::Relaxed);
        })
        .context("Failed to install signal handler")?;

        self.run_server()
    }

    /// Main server loop (listens on socket and accepts connections).
    pub fn run_server(&self) -> Result<()> {
        fs::write(&self.pid_path, format!("{}", std::process::id()))
            .context("Failed to write PID file")?;

        let listener =
            UnixListener::bind(&self.socket_path).context("Failed to bind Unix socket")?;

        // Owner-only: the socket can pause prints
        fs::set_permissions(&self.socket_path, Permissions::from_mode(0o600))
            .context("Failed to set socket permissions")?;

        // Non-blocking accept so shutdown is observed promptly
        listener
            .set_nonblocking(true)
            .context("Failed to set socket to non-blocking")?;

        let watcher_handle = spawn_watcher(self);

        while !self.shutdown_flag.load(Ordering::Relaxed) {
            match listener.accept() {
                Ok((stream, _addr)) => {
                    let current = self.connection_count.load(Ordering::Relaxed);
                    if current >= MAX_CONNECTIONS {
                        warn!("connection limit reached ({MAX_CONNECTIONS}), rejecting");
                        drop(stream);
                        continue;
                    }

                    self.connection_count.fetch_add(1, Ordering::Relaxed);

                    let shutdown_flag = Arc::clone(&self.shutdown_flag);
                    let monitor = Arc::clone(&self.monitor);
                    let store = self.store.clone();
                    let status_subscribers = Arc::clone(&self.status_subscribers);
                    let connection_count = Arc::clone(&self.connection_count);

                    thread::spawn(move || {
                        let result = handle_client_connection(
                            stream,
                            shutdown_flag,
                            monitor,
                            store,
                            status_subscribers,
                        );
                        connection_count.fetch_sub(1, Ordering::Relaxed);
                        if let Err(e) = result {
                            warn!("client handler error: {e:#}");
                        }
                    });
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(100));
                }
                Err(e) => {
                    error!("accept error: {e}");
                    break;
                }
            }
        }

        let _ = watcher_handle.join();

        self.cleanup()?;
        Ok(())
    }

    /// Clean up socket and PID files.
    pub(super) fn cleanup(&self) -> Result<()> {
        // Remove files directly, ignoring NotFound to avoid TOCTOU race
        if let Err(e) = fs::remove_file(&self.socket_path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                return Err(e).context("Failed to remove socket file");
            }
        }
        if let Err(e) = fs::remove_file(&self.pid_path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                return Err(e).context("Failed to remove PID file");
            }
        }
        Ok(())
    }
}

impl Drop for DaemonServer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
