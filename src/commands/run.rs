//! Run command - starts the watchdog daemon

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use crate::daemon::DaemonServer;
use crate::printer::OctoPrintClient;
use crate::sensor::SysfsGpio;
use crate::settings::SettingsStore;

/// Start the daemon, daemonized by default.
pub fn execute(config_path: &Path, state_dir: &Path, foreground: bool) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if DaemonServer::is_running(state_dir) {
        bail!("Daemon is already running (state dir: {})", state_dir.display());
    }

    fs::create_dir_all(state_dir)
        .with_context(|| format!("Failed to create state directory: {}", state_dir.display()))?;

    let store = SettingsStore::new(config_path);
    let settings = store.load()?;

    // Missing GPIO support must fail loudly here; degrading would leave a
    // monitor that can never observe the sensor.
    let gpio = SysfsGpio::new();
    gpio.probe()
        .context("Filament sensor requires the sysfs GPIO interface")?;

    let printer = OctoPrintClient::new(&settings.printer)?;

    let server = DaemonServer::new(state_dir, store, Box::new(gpio), Box::new(printer))?;

    if foreground {
        println!("{} Watchdog running in foreground (Ctrl-C to stop)", "→".cyan().bold());
        server.run_foreground()
    } else {
        println!("{} Starting watchdog daemon...", "→".cyan().bold());
        println!("  socket: {}", DaemonServer::socket_path(state_dir).display());
        println!("  log:    {}", state_dir.join("runout.log").display());
        server.start()
    }
}
