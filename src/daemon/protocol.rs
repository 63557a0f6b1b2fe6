use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::monitor::PrintEvent;
use crate::notify::StatusEvent;
use crate::sensor::FilamentStatus;
use crate::settings::SensorSettings;

/// Client request to the daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Request {
    /// Ping to check if the daemon is alive
    Ping,
    /// Synchronous tri-state status query
    Status,
    /// Subscribe to live status-change events
    SubscribeStatus,
    /// Disconnect cleanly
    Unsubscribe,
    /// Apply and persist new sensor settings
    ApplySettings(SensorSettings),
    /// Report a host print lifecycle event
    PrintEvent(PrintEvent),
    /// Request daemon shutdown
    Stop,
}

/// Daemon response to a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Response {
    Ok,
    Pong,
    Error { message: String },
    /// Answer to a status query; the code is -1 unknown, 0 absent, 1 present
    Status { status: FilamentStatus },
    /// Acknowledgment that settings were applied and persisted
    SettingsApplied,
    /// Pushed to subscribers when the sensor status changes
    StatusUpdate(StatusEvent),
}

/// Write a length-prefixed JSON message to a stream.
///
/// Format: 4-byte big-endian length prefix + JSON data
pub fn write_message<T: Serialize, W: Write>(stream: &mut W, message: &T) -> Result<()> {
    let json = serde_json::to_vec(message).context("Failed to serialize message")?;
    let len = json.len() as u32;

    stream
        .write_all(&len.to_be_bytes())
        .context("Failed to write message length")?;
    stream
        .write_all(&json)
        .context("Failed to write message body")?;
    stream.flush().context("Failed to flush stream")?;

    Ok(())
}

/// Read a length-prefixed JSON message from a stream.
pub fn read_message<T: for<'de> Deserialize<'de>, R: Read>(stream: &mut R) -> Result<T> {
    let mut len_bytes = [0u8; 4];
    stream
        .read_exact(&mut len_bytes)
        .context("Failed to read message length")?;
    let len = u32::from_be_bytes(len_bytes) as usize;

    // Sanity check: no legitimate message comes close to 1 MB
    if len > 1024 * 1024 {
        anyhow::bail!("Message too large: {len} bytes");
    }

    let mut json_bytes = vec![0u8; len];
    stream
        .read_exact(&mut json_bytes)
        .context("Failed to read message body")?;

    serde_json::from_slice(&json_bytes).context("Failed to deserialize message")
}
