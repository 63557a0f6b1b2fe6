//! Runout reaction policy.

use anyhow::Result;
use tracing::{info, warn};

use crate::settings::SensorSettings;

/// Capability to act on the printer when filament runs out.
pub trait PrintController: Send {
    /// Pause the active print job.
    fn pause_print(&mut self) -> Result<()>;

    /// Send raw gcode to the printer; `gcode` may span multiple lines.
    fn send_commands(&mut self, gcode: &str) -> Result<()>;
}

/// Decides what happens when the sensor reads absent.
///
/// Both actions are independent and fire-and-forget. A failed pause is only
/// logged: the monitor loop re-invokes this policy on every tick while
/// filament stays absent, which is the retry mechanism.
pub struct ReactionPolicy {
    controller: Box<dyn PrintController>,
}

impl ReactionPolicy {
    pub fn new(controller: Box<dyn PrintController>) -> Self {
        Self { controller }
    }

    pub fn on_filament_absent(&mut self, settings: &SensorSettings) {
        if settings.pause_print {
            info!("pausing print");
            if let Err(err) = self.controller.pause_print() {
                warn!(%err, "pause request failed, retrying on next poll");
            }
        }

        if !settings.gcode.is_empty() {
            info!(gcode = %settings.gcode, "sending runout gcode");
            if let Err(err) = self.controller.send_commands(&settings.gcode) {
                warn!(%err, "gcode dispatch failed");
            }
        }
    }
}
