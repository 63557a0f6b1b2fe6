//! Tri-state sensor status and raw-level interpretation.

use serde::{Deserialize, Serialize};

/// Interpreted sensor status.
///
/// Serialized as the integer codes used on the wire: -1 unknown, 0 absent,
/// 1 present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum FilamentStatus {
    /// Sensor disabled or the last read failed.
    Unknown,
    Absent,
    Present,
}

impl FilamentStatus {
    pub fn code(self) -> i8 {
        self.into()
    }
}

impl From<FilamentStatus> for i8 {
    fn from(status: FilamentStatus) -> i8 {
        match status {
            FilamentStatus::Unknown => -1,
            FilamentStatus::Absent => 0,
            FilamentStatus::Present => 1,
        }
    }
}

impl TryFrom<i8> for FilamentStatus {
    type Error = String;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        match code {
            -1 => Ok(FilamentStatus::Unknown),
            0 => Ok(FilamentStatus::Absent),
            1 => Ok(FilamentStatus::Present),
            other => Err(format!("invalid status code {other}")),
        }
    }
}

impl std::fmt::Display for FilamentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilamentStatus::Unknown => write!(f, "unknown"),
            FilamentStatus::Absent => write!(f, "absent"),
            FilamentStatus::Present => write!(f, "present"),
        }
    }
}

/// Interpret a raw pin level against the configured active level.
///
/// Present exactly when the raw level equals the level configured to mean
/// "filament present"; polarity varies with sensor wiring.
pub fn evaluate(raw: u8, active_level: u8) -> FilamentStatus {
    if raw == active_level {
        FilamentStatus::Present
    } else {
        FilamentStatus::Absent
    }
}
