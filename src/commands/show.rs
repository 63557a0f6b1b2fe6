//! Show command - prints the persisted settings

use std::path::Path;

use anyhow::{Context, Result};

use crate::settings::SettingsStore;

pub fn execute(config_path: &Path) -> Result<()> {
    let store = SettingsStore::new(config_path);
    let settings = store.load()?;

    let rendered =
        toml::to_string_pretty(&settings).context("Failed to render settings")?;
    print!("{rendered}");

    Ok(())
}
