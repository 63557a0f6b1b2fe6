//! Sysfs GPIO pin driver.
//!
//! Claims pins through the kernel's `/sys/class/gpio` interface. Pull bias
//! and hardware debounce are not controllable through sysfs; both are left
//! to the platform defaults and logged at debug level.

use anyhow::{bail, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::settings::PullMode;

use super::driver::{PinDriver, PinError};

pub struct SysfsGpio {
    base: PathBuf,
}

impl SysfsGpio {
    pub fn new() -> Self {
        Self::with_base(Path::new("/sys/class/gpio"))
    }

    /// Use an alternate sysfs root. Used by tests.
    pub fn with_base(base: &Path) -> Self {
        Self {
            base: base.to_path_buf(),
        }
    }

    /// Verify the sysfs GPIO interface exists.
    ///
    /// Called once at daemon startup; a missing interface is fatal since the
    /// monitor would otherwise silently never leave the unknown state.
    pub fn probe(&self) -> Result<()> {
        if !self.base.join("export").exists() {
            bail!(
                "sysfs GPIO interface not found at {} (is the gpio subsystem enabled?)",
                self.base.display()
            );
        }
        Ok(())
    }

    fn pin_dir(&self, pin: i32) -> PathBuf {
        self.base.join(format!("gpio{pin}"))
    }
}

impl Default for SysfsGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl PinDriver for SysfsGpio {
    fn configure_input(
        &mut self,
        pin: i32,
        pull: PullMode,
        bounce_ms: u64,
    ) -> Result<(), PinError> {
        let pin_dir = self.pin_dir(pin);

        // Export only when the kernel has not already exposed the pin.
        if !pin_dir.exists() {
            fs::write(self.base.join("export"), pin.to_string())
                .map_err(|source| PinError::Access { pin, source })?;
        }

        fs::write(pin_dir.join("direction"), "in")
            .map_err(|source| PinError::Access { pin, source })?;

        if pull != PullMode::None {
            debug!(pin, %pull, "pull bias left to platform defaults (no sysfs bias control)");
        }
        if bounce_ms > 0 {
            debug!(pin, bounce_ms, "no hardware debounce via sysfs, poll cadence applies");
        }

        Ok(())
    }

    fn read_level(&mut self, pin: i32) -> Result<u8, PinError> {
        let value = fs::read_to_string(self.pin_dir(pin).join("value"))
            .map_err(|source| PinError::Access { pin, source })?;

        match value.trim() {
            "0" => Ok(0),
            "1" => Ok(1),
            other => Err(PinError::BadLevel {
                pin,
                value: other.to_string(),
            }),
        }
    }

    fn release(&mut self, pin: i32) {
        // Best-effort; the pin may never have been exported.
        let _ = fs::write(self.base.join("unexport"), pin.to_string());
    }
}
