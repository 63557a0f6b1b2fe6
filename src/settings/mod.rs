//! Persisted watchdog configuration
//!
//! Settings are stored as a TOML file under the user config directory and
//! applied to a running daemon over the control socket.

mod store;
mod types;

pub use store::{default_config_path, default_state_dir, SettingsStore};
pub use types::{PrinterSettings, PullMode, SensorSettings, Settings};
