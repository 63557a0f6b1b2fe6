//! Print lifecycle events consumed from the host.

use serde::{Deserialize, Serialize};

/// Host-side print lifecycle notifications.
///
/// Informational for the monitor; they only gate polling when
/// `only_while_printing` is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrintEvent {
    Started,
    Done,
    Failed,
    Cancelled,
}

impl PrintEvent {
    /// Parse an event name as passed on the CLI.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "started" => Ok(PrintEvent::Started),
            "done" => Ok(PrintEvent::Done),
            "failed" => Ok(PrintEvent::Failed),
            "cancelled" => Ok(PrintEvent::Cancelled),
            other => Err(format!(
                "invalid print event '{other}' (expected started, done, failed or cancelled)"
            )),
        }
    }
}

impl std::fmt::Display for PrintEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrintEvent::Started => write!(f, "started"),
            PrintEvent::Done => write!(f, "done"),
            PrintEvent::Failed => write!(f, "failed"),
            PrintEvent::Cancelled => write!(f, "cancelled"),
        }
    }
}
