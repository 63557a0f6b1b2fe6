//! Sensor reader: owns the pin claim and interprets raw levels.

use tracing::{debug, warn};

use crate::settings::SensorSettings;

use super::driver::PinDriver;
use super::status::{evaluate, FilamentStatus};

/// Reads the filament sensor through an injected pin driver.
///
/// Holds at most one pin claim at a time. Reconfiguration always releases
/// the previous claim before acquiring the new one, so repeated settings
/// changes cannot leak claims.
pub struct SensorReader {
    driver: Box<dyn PinDriver>,
    claimed: Option<i32>,
    active_level: u8,
}

impl SensorReader {
    pub fn new(driver: Box<dyn PinDriver>) -> Self {
        Self {
            driver,
            claimed: None,
            active_level: 0,
        }
    }

    /// Apply wiring settings, releasing any previously claimed pin first.
    ///
    /// A driver failure here is not fatal: the reader stays unconfigured and
    /// every subsequent read reports unknown.
    pub fn configure(&mut self, settings: &SensorSettings) {
        if let Some(pin) = self.claimed.take() {
            self.driver.release(pin);
        }

        self.active_level = settings.switch;

        if !settings.enabled() {
            debug!("sensor pin not configured, reads will report unknown");
            return;
        }

        match self
            .driver
            .configure_input(settings.pin, settings.mode, settings.bounce)
        {
            Ok(()) => {
                debug!(pin = settings.pin, mode = %settings.mode, "sensor pin configured");
                self.claimed = Some(settings.pin);
            }
            Err(err) => {
                warn!(pin = settings.pin, %err, "failed to configure sensor pin");
            }
        }
    }

    /// Sample the sensor and interpret the level.
    ///
    /// Unknown when the sensor is unconfigured or the read fails; hardware
    /// faults are logged here and never propagated.
    pub fn read_status(&mut self) -> FilamentStatus {
        let Some(pin) = self.claimed else {
            return FilamentStatus::Unknown;
        };

        match self.driver.read_level(pin) {
            Ok(raw) => evaluate(raw, self.active_level),
            Err(err) => {
                warn!(pin, %err, "sensor read failed");
                FilamentStatus::Unknown
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.claimed.is_some()
    }
}

impl Drop for SensorReader {
    fn drop(&mut self) {
        if let Some(pin) = self.claimed.take() {
            self.driver.release(pin);
        }
    }
}
