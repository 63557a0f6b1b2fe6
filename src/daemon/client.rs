//! Client-side access to a running daemon.

use std::os::unix::net::UnixStream;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::monitor::PrintEvent;
use crate::notify::StatusEvent;
use crate::sensor::FilamentStatus;
use crate::settings::SensorSettings;

use super::protocol::{read_message, write_message, Request, Response};
use super::server::DaemonServer;

/// Synchronous client for the daemon control socket.
pub struct DaemonClient {
    stream: UnixStream,
}

impl DaemonClient {
    pub fn connect(state_dir: &Path) -> Result<Self> {
        let socket_path = DaemonServer::socket_path(state_dir);
        let stream = UnixStream::connect(&socket_path).with_context(|| {
            format!("Failed to connect to daemon at {}", socket_path.display())
        })?;
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .context("Failed to set read timeout")?;

        Ok(Self { stream })
    }

    fn request(&mut self, request: &Request) -> Result<Response> {
        write_message(&mut self.stream, request)?;
        read_message(&mut self.stream)
    }

    pub fn ping(&mut self) -> Result<()> {
        match self.request(&Request::Ping)? {
            Response::Pong => Ok(()),
            other => bail!("Unexpected response to ping: {other:?}"),
        }
    }

    /// Query the current tri-state sensor status.
    pub fn query_status(&mut self) -> Result<FilamentStatus> {
        match self.request(&Request::Status)? {
            Response::Status { status } => Ok(status),
            Response::Error { message } => bail!("Daemon returned error: {message}"),
            other => bail!("Unexpected response to status query: {other:?}"),
        }
    }

    /// Apply sensor settings to the running daemon (also persisted there).
    pub fn apply_settings(&mut self, settings: &SensorSettings) -> Result<()> {
        match self.request(&Request::ApplySettings(settings.clone()))? {
            Response::SettingsApplied => Ok(()),
            Response::Error { message } => bail!("Daemon returned error: {message}"),
            other => bail!("Unexpected response to settings update: {other:?}"),
        }
    }

    /// Report a host print lifecycle event.
    pub fn notify_print_event(&mut self, event: PrintEvent) -> Result<()> {
        match self.request(&Request::PrintEvent(event))? {
            Response::Ok => Ok(()),
            Response::Error { message } => bail!("Daemon returned error: {message}"),
            other => bail!("Unexpected response to print event: {other:?}"),
        }
    }

    /// Subscribe to status-change events, invoking `on_event` for each until
    /// the daemon goes away.
    ///
    /// The daemon pushes the current status immediately on subscription.
    pub fn subscribe<F>(mut self, mut on_event: F) -> Result<()>
    where
        F: FnMut(StatusEvent),
    {
        write_message(&mut self.stream, &Request::SubscribeStatus)?;
        match read_message::<Response, _>(&mut self.stream)? {
            Response::Ok => {}
            Response::Error { message } => bail!("Daemon refused subscription: {message}"),
            other => bail!("Unexpected response to subscription: {other:?}"),
        }

        // Block indefinitely on pushed events from here on.
        self.stream
            .set_read_timeout(None)
            .context("Failed to clear read timeout")?;

        loop {
            match read_message::<Response, _>(&mut self.stream) {
                Ok(Response::StatusUpdate(event)) => on_event(event),
                Ok(_) => {}
                // Daemon shut down or the connection dropped.
                Err(_) => break,
            }
        }

        Ok(())
    }
}
