//! Watch command - follows live status-change events

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Local;
use colored::Colorize;

use crate::daemon::{DaemonClient, DaemonServer};
use crate::sensor::FilamentStatus;

pub fn execute(state_dir: &Path) -> Result<()> {
    if !DaemonServer::is_running(state_dir) {
        bail!("Daemon is not running");
    }

    let client = DaemonClient::connect(state_dir).context("Failed to connect to daemon")?;

    println!("{} Watching sensor status (Ctrl-C to stop)", "→".cyan().bold());

    client.subscribe(|event| {
        let time = event.at.with_timezone(&Local).format("%H:%M:%S");
        let label = match event.status {
            FilamentStatus::Present => "present".green().bold(),
            FilamentStatus::Absent => "absent".red().bold(),
            FilamentStatus::Unknown => "unknown".dimmed(),
        };
        println!("{time} {label} ({})", event.status.code());
    })?;

    println!("{} Daemon went away", "─".dimmed());
    Ok(())
}
