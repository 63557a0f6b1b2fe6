//! Loading and saving the settings file.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::Settings;

/// Default location of the settings file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("runout")
        .join("config.toml")
}

/// Default directory for the daemon socket, pid and log files.
pub fn default_state_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("runout")
}

/// Reads and writes the persisted settings file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings from disk; a missing file yields the factory defaults.
    pub fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read settings file: {}", self.path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", self.path.display()))
    }

    /// Write settings to disk, creating parent directories as needed.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content =
            toml::to_string_pretty(settings).context("Failed to serialize settings")?;

        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write settings file: {}", self.path.display()))
    }
}
