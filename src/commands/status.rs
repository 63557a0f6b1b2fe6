//! Status command - queries the current sensor status

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::daemon::{DaemonClient, DaemonServer};
use crate::sensor::FilamentStatus;

pub fn execute(state_dir: &Path) -> Result<()> {
    if !DaemonServer::is_running(state_dir) {
        println!("{} Daemon is not running", "─".dimmed());
        println!("{} ({})", "unknown".dimmed(), FilamentStatus::Unknown.code());
        return Ok(());
    }

    let mut client =
        DaemonClient::connect(state_dir).context("Failed to connect to daemon")?;
    let status = client.query_status()?;

    match status {
        FilamentStatus::Present => {
            println!("{} filament present ({})", "✓".green().bold(), status.code());
        }
        FilamentStatus::Absent => {
            println!("{} filament absent ({})", "✗".red().bold(), status.code());
        }
        FilamentStatus::Unknown => {
            println!("{} status unknown ({})", "─".dimmed(), status.code());
        }
    }

    Ok(())
}
