//! # Mask Telemetry
//!
//! Logging setup shared by every Mask execution context.
//!
//! Libraries in this workspace only emit `tracing` events. Binaries and test
//! harnesses call [`init_logging`] once, or [`init_from_settings`] with the
//! `[logging]` section of the configuration file.

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{init_logging, LogConfig};
pub use mask_config::LogFormat;

/// Initialize logging from the configuration file section
pub fn init_from_settings(settings: &mask_config::LogSettings) -> TelemetryResult<()> {
    init_logging(&LogConfig::from(settings))
}
