use serde::{Deserialize, Serialize};

/// Pull-resistor bias applied to the sensor input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PullMode {
    Up,
    Down,
    None,
}

impl PullMode {
    /// Parse a pull mode from its config/CLI spelling.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "up" => Ok(PullMode::Up),
            "down" => Ok(PullMode::Down),
            "none" => Ok(PullMode::None),
            other => Err(format!(
                "invalid pull mode '{other}' (expected up, down or none)"
            )),
        }
    }
}

impl std::fmt::Display for PullMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PullMode::Up => write!(f, "up"),
            PullMode::Down => write!(f, "down"),
            PullMode::None => write!(f, "none"),
        }
    }
}

/// Sensor wiring and behavior settings.
///
/// Values are accepted as-is without range validation; an unusable pin
/// surfaces as a driver failure and the sensor degrades to unknown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorSettings {
    /// Input line id; -1 means the sensor is not configured.
    pub pin: i32,
    /// Debounce in milliseconds, forwarded to the pin driver.
    pub bounce: u64,
    /// Raw level (0/1) read when filament is present.
    pub switch: u8,
    /// Pull-resistor mode for the input line.
    pub mode: PullMode,
    /// Raw gcode sent on runout; empty sends nothing.
    pub gcode: String,
    /// Pause the active print on runout.
    pub pause_print: bool,
    /// Poll cadence in seconds.
    pub check_freq: u64,
    /// Suspend polling while no print is active.
    pub only_while_printing: bool,
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            pin: -1,
            bounce: 300,
            switch: 0,
            mode: PullMode::Up,
            gcode: String::new(),
            pause_print: true,
            check_freq: 5,
            only_while_printing: false,
        }
    }
}

impl SensorSettings {
    /// Whether a pin has been configured at all.
    pub fn enabled(&self) -> bool {
        self.pin != -1
    }
}

/// Connection settings for the print host REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinterSettings {
    pub api_url: String,
    pub api_key: String,
}

impl Default for PrinterSettings {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:5000".to_string(),
            api_key: String::new(),
        }
    }
}

/// Top-level persisted settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sensor: SensorSettings,
    pub printer: PrinterSettings,
}
