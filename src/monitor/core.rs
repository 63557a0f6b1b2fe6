//! Core Monitor implementation

use std::time::Duration;

use tracing::{debug, info};

use crate::notify::{NotificationSink, StatusEvent};
use crate::reaction::{PrintController, ReactionPolicy};
use crate::sensor::{FilamentStatus, PinDriver, SensorReader};
use crate::settings::SensorSettings;

use super::events::PrintEvent;

/// The sensor monitoring state machine.
///
/// Owns the sensor state exclusively: `last_status` is only ever mutated by
/// the tick and reconfigure paths. Callers serialize access (the daemon
/// keeps the monitor behind a mutex) so a reconfiguration can never race a
/// tick through a half-released pin claim.
pub struct Monitor {
    settings: SensorSettings,
    reader: SensorReader,
    policy: ReactionPolicy,
    sink: Box<dyn NotificationSink>,
    last_status: FilamentStatus,
    print_active: bool,
}

impl Monitor {
    /// Build the monitor, configure the sensor, and publish the initial
    /// status to subscribers.
    pub fn new(
        driver: Box<dyn PinDriver>,
        controller: Box<dyn PrintController>,
        mut sink: Box<dyn NotificationSink>,
        settings: SensorSettings,
    ) -> Self {
        let mut reader = SensorReader::new(driver);
        reader.configure(&settings);
        let last_status = reader.read_status();

        if settings.enabled() {
            info!(pin = settings.pin, status = %last_status, "filament sensor active");
        } else {
            info!("sensor pin not configured, monitoring disabled");
        }

        sink.publish(&StatusEvent::status_update(last_status));

        Self {
            settings,
            reader,
            policy: ReactionPolicy::new(controller),
            sink,
            last_status,
            print_active: false,
        }
    }

    /// One poll cycle.
    ///
    /// Notification is edge-triggered (only on a status change between
    /// ticks); the runout reaction is level-triggered and fires on every
    /// tick that reads absent, so a pause sent while the printer firmware
    /// was not ready is retried on the next cycle. Unknown never reacts.
    pub fn tick(&mut self) {
        if !self.settings.enabled() {
            return;
        }
        if self.settings.only_while_printing && !self.print_active {
            debug!("no active print, skipping poll");
            return;
        }

        let status = self.reader.read_status();

        if status != self.last_status {
            debug!(from = %self.last_status, to = %status, "sensor status changed");
            self.sink.publish(&StatusEvent::status_update(status));
        }
        self.last_status = status;

        if status == FilamentStatus::Absent {
            info!("no filament detected");
            self.policy.on_filament_absent(&self.settings);
        }
    }

    /// Apply new settings: re-claim the pin and re-seed the sensor state
    /// from a fresh sample.
    pub fn reconfigure(&mut self, settings: SensorSettings) {
        info!(pin = settings.pin, "applying sensor settings");

        self.reader.configure(&settings);
        self.settings = settings;

        let status = self.reader.read_status();
        if status != self.last_status {
            self.sink.publish(&StatusEvent::status_update(status));
        }
        self.last_status = status;
    }

    /// Last evaluated status, answerable at any time.
    pub fn status(&self) -> FilamentStatus {
        self.last_status
    }

    pub fn settings(&self) -> &SensorSettings {
        &self.settings
    }

    /// Current poll cadence. Clamped to one second so a zero in the
    /// settings file cannot spin the loop.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.settings.check_freq.max(1))
    }

    /// Record a host print lifecycle event.
    pub fn on_print_event(&mut self, event: PrintEvent) {
        match event {
            PrintEvent::Started => {
                info!(sensor_enabled = self.settings.enabled(), "print started");
                if self.settings.enabled() {
                    info!("filament sensor active, monitoring");
                }
                self.print_active = true;
            }
            PrintEvent::Done | PrintEvent::Failed | PrintEvent::Cancelled => {
                info!(%event, "print finished");
                self.print_active = false;
            }
        }
    }
}
