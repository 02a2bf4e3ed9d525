//! Telemetry error types

use thiserror::Error;

/// Telemetry-related errors
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to initialize logging
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Rejected filter directive
    #[error("Invalid log filter '{0}'")]
    InvalidFilter(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for TelemetryError {
    fn from(e: anyhow::Error) -> Self {
        TelemetryError::Other(e.to_string())
    }
}

/// Result type for telemetry operations
pub type TelemetryResult<T> = Result<T, TelemetryError>;
