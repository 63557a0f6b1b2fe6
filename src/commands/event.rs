//! Event command - forwards a host print lifecycle event
//!
//! Intended to be wired into the print host's event hooks (e.g. an
//! OctoPrint system command on PrintStarted/PrintDone).

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::daemon::{DaemonClient, DaemonServer};
use crate::monitor::PrintEvent;

pub fn execute(state_dir: &Path, event: PrintEvent) -> Result<()> {
    if !DaemonServer::is_running(state_dir) {
        // Hooks fire whether or not the watchdog is up; don't fail the host.
        println!("{} Daemon is not running, event dropped", "─".dimmed());
        return Ok(());
    }

    let mut client =
        DaemonClient::connect(state_dir).context("Failed to connect to daemon")?;
    client.notify_print_event(event)?;

    println!("{} Reported print event: {event}", "✓".green().bold());
    Ok(())
}
