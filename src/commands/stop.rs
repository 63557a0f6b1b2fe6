//! Stop command - gracefully shuts down the daemon

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::daemon::DaemonServer;

pub fn execute(state_dir: &Path) -> Result<()> {
    if !DaemonServer::is_running(state_dir) {
        println!("{} Daemon is not running", "─".dimmed());
        return Ok(());
    }

    println!("{} Stopping daemon...", "→".cyan().bold());
    DaemonServer::stop(state_dir).context("Failed to stop daemon")?;

    println!("{} Daemon stopped", "✓".green().bold());
    Ok(())
}
