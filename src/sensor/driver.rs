//! Pin driver capability.

use thiserror::Error;

use crate::settings::PullMode;

/// Failure while touching the physical input line.
///
/// These never escape the sensor layer; the reader downgrades them to an
/// unknown status so a flaky line cannot pause a print.
#[derive(Debug, Error)]
pub enum PinError {
    #[error("pin {pin} is not accessible: {source}")]
    Access {
        pin: i32,
        #[source]
        source: std::io::Error,
    },
    #[error("pin {pin} returned unexpected level {value:?}")]
    BadLevel { pin: i32, value: String },
}

/// Capability to configure and sample a digital input line.
///
/// Implementations must treat every failure as a returned error; the caller
/// decides the degradation policy. `release` is best-effort and must be
/// safe to call for a pin that was never claimed.
pub trait PinDriver: Send {
    /// Idempotently claim `pin` as an input with the requested bias.
    ///
    /// `bounce_ms` is a hint for drivers with hardware debounce support and
    /// may be ignored.
    fn configure_input(&mut self, pin: i32, pull: PullMode, bounce_ms: u64)
        -> Result<(), PinError>;

    /// Sample the line; returns the raw level (0 or 1).
    fn read_level(&mut self, pin: i32) -> Result<u8, PinError>;

    /// Release a previously claimed pin.
    fn release(&mut self, pin: i32);
}
