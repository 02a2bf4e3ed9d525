//! Logging initialization and configuration

use crate::{TelemetryError, TelemetryResult};
use mask_config::{LogFormat, LogSettings};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level or filter directive (`info`, `mask_bridge=debug`, ...)
    pub level: String,

    /// Log format (json, text, compact)
    pub format: LogFormat,

    /// Enable ANSI colors
    pub color: bool,

    /// Include target in log output
    pub include_target: bool,

    /// Include file location in log output
    pub include_location: bool,

    /// Include span events
    pub span_events: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            color: true,
            include_target: true,
            include_location: false,
            span_events: false,
        }
    }
}

impl From<&LogSettings> for LogConfig {
    fn from(settings: &LogSettings) -> Self {
        Self {
            level: settings.level.clone(),
            format: settings.format,
            color: settings.format == LogFormat::Text,
            ..Self::default()
        }
    }
}

impl LogConfig {
    /// `RUST_LOG` wins over the configured level
    fn filter(&self) -> TelemetryResult<EnvFilter> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.level)
                .map_err(|_| TelemetryError::InvalidFilter(self.level.clone())),
        }
    }

    fn span_events(&self) -> FmtSpan {
        if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        match self.format {
            LogFormat::Text => fmt::layer()
                .with_ansi(self.color)
                .with_target(self.include_target)
                .with_file(self.include_location)
                .with_line_number(self.include_location)
                .with_span_events(self.span_events())
                .boxed(),
            LogFormat::Compact => fmt::layer()
                .compact()
                .with_ansi(self.color)
                .with_target(self.include_target)
                .with_span_events(self.span_events())
                .boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .with_target(self.include_target)
                .with_file(self.include_location)
                .with_line_number(self.include_location)
                .with_span_events(self.span_events())
                .boxed(),
        }
    }
}

/// Initialize the logging system
///
/// Fails with [`TelemetryError::LoggingInit`] when a global subscriber is
/// already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    let filter = config.filter()?;

    tracing_subscriber::registry()
        .with(config.layer())
        .with(filter)
        .try_init()
        .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;

    tracing::info!(
        "Logging initialized with level: {} ({})",
        config.level,
        config.format
    );
    Ok(())
}
