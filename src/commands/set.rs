//! Set command - updates sensor settings

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use crate::daemon::{DaemonClient, DaemonServer};
use crate::settings::{PullMode, SettingsStore};

/// Sensor settings overrides; omitted flags keep their persisted value.
#[derive(Debug, Args)]
pub struct SetArgs {
    /// Sensor input pin (-1 disables the sensor)
    #[arg(long)]
    pub pin: Option<i32>,

    /// Debounce in milliseconds
    #[arg(long)]
    pub bounce: Option<u64>,

    /// Raw level (0/1) meaning filament present
    #[arg(long)]
    pub switch: Option<u8>,

    /// Pull-resistor mode: up, down or none
    #[arg(long, value_parser = PullMode::parse)]
    pub mode: Option<PullMode>,

    /// Gcode sent on runout (empty string clears it)
    #[arg(long)]
    pub gcode: Option<String>,

    /// Pause the print on runout (true/false)
    #[arg(long)]
    pub pause_print: Option<bool>,

    /// Poll cadence in seconds
    #[arg(long)]
    pub check_freq: Option<u64>,

    /// Poll only while a print is active (true/false)
    #[arg(long)]
    pub only_while_printing: Option<bool>,
}

pub fn execute(config_path: &Path, state_dir: &Path, args: SetArgs) -> Result<()> {
    let store = SettingsStore::new(config_path);
    let mut settings = store.load()?;

    let sensor = &mut settings.sensor;
    if let Some(pin) = args.pin {
        sensor.pin = pin;
    }
    if let Some(bounce) = args.bounce {
        sensor.bounce = bounce;
    }
    if let Some(switch) = args.switch {
        sensor.switch = switch;
    }
    if let Some(mode) = args.mode {
        sensor.mode = mode;
    }
    if let Some(gcode) = args.gcode {
        sensor.gcode = gcode;
    }
    if let Some(pause_print) = args.pause_print {
        sensor.pause_print = pause_print;
    }
    if let Some(check_freq) = args.check_freq {
        sensor.check_freq = check_freq;
    }
    if let Some(only_while_printing) = args.only_while_printing {
        sensor.only_while_printing = only_while_printing;
    }

    store.save(&settings)?;
    println!(
        "{} Settings saved to {}",
        "✓".green().bold(),
        store.path().display()
    );

    if DaemonServer::is_running(state_dir) {
        let mut client =
            DaemonClient::connect(state_dir).context("Failed to connect to daemon")?;
        client.apply_settings(&settings.sensor)?;
        println!("{} Applied to the running daemon", "✓".green().bold());
    } else {
        println!(
            "{} Daemon not running; settings take effect on next start",
            "─".dimmed()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn no_overrides() -> SetArgs {
        SetArgs {
            pin: None,
            bounce: None,
            switch: None,
            mode: None,
            gcode: None,
            pause_print: None,
            check_freq: None,
            only_while_printing: None,
        }
    }

    #[test]
    #[serial]
    fn test_set_persists_overrides() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        let state_dir = temp_dir.path().join("state");

        let args = SetArgs {
            pin: Some(7),
            gcode: Some("M600".to_string()),
            ..no_overrides()
        };
        execute(&config_path, &state_dir, args).expect("Failed to set");

        let settings = SettingsStore::new(&config_path)
            .load()
            .expect("Failed to load");
        assert_eq!(settings.sensor.pin, 7);
        assert_eq!(settings.sensor.gcode, "M600");
        // Untouched fields keep their defaults.
        assert_eq!(settings.sensor.check_freq, 5);
    }

    #[test]
    #[serial]
    fn test_set_without_overrides_keeps_existing_values() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        let state_dir = temp_dir.path().join("state");

        let args = SetArgs {
            pin: Some(11),
            ..no_overrides()
        };
        execute(&config_path, &state_dir, args).expect("Failed to set");
        execute(&config_path, &state_dir, no_overrides()).expect("Failed to re-set");

        let settings = SettingsStore::new(&config_path)
            .load()
            .expect("Failed to load");
        assert_eq!(settings.sensor.pin, 11);
    }
}
