//! Mask Configuration Module
//!
//! This module provides configuration types for the service bridge, the
//! red packet pipeline and logging. Every section deserialises from TOML and
//! falls back to its defaults when omitted.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Average Ethereum mainnet block interval
pub const SECONDS_PER_BLOCK: u64 = 12;
pub const MILLISECONDS_PER_BLOCK: u64 = SECONDS_PER_BLOCK * 1000;

/// Ethereum mainnet chain id
pub const MAINNET_CHAIN_ID: u64 = 1;

/// Sentinel address used by token lists for the chain's native asset
pub const DEFAULT_NATIVE_TOKEN_ADDRESS: &str = "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE";

/// HappyRedPacketV4 on Ethereum mainnet
pub const DEFAULT_RED_PACKET_ADDRESS: &str = "0xaBBe1101FD8fa5847c452A6D70C8655532B03C33";

/// Default buffer for the cross-context message port
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    pub bridge: BridgeConfig,
    pub red_packet: RedPacketConfig,
    pub logging: LogSettings,
}

impl MaskConfig {
    /// Loads and validates configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parses and validates configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.red_packet.speed_up_poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "red_packet.speed_up_poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.bridge.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "bridge.channel_capacity must be greater than zero".to_string(),
            ));
        }
        if self.bridge.call_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "bridge.call_timeout_ms must be greater than zero when set".to_string(),
            ));
        }
        check_address("red_packet.contract_address", &self.red_packet.contract_address)?;
        check_address(
            "red_packet.native_token_address",
            &self.red_packet.native_token_address,
        )?;
        Ok(())
    }
}

fn check_address(field: &str, value: &str) -> ConfigResult<()> {
    value
        .parse::<Address>()
        .map(|_| ())
        .map_err(|_| ConfigError::Invalid(format!("{field} is not a valid address: {value}")))
}

/// Cross-context bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Upper bound for a single forwarded call, none waits forever
    pub call_timeout_ms: Option<u64>,
    pub channel_capacity: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms: None,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Red packet pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedPacketConfig {
    pub chain_id: u64,
    pub contract_address: String,
    pub native_token_address: String,

    /// How often a pending creation is checked for a sped-up replacement
    pub speed_up_poll_interval_ms: u64,
}

impl Default for RedPacketConfig {
    fn default() -> Self {
        Self {
            chain_id: MAINNET_CHAIN_ID,
            contract_address: DEFAULT_RED_PACKET_ADDRESS.to_string(),
            native_token_address: DEFAULT_NATIVE_TOKEN_ADDRESS.to_string(),
            speed_up_poll_interval_ms: MILLISECONDS_PER_BLOCK,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Compact,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Compact => write!(f, "compact"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Logging section of the configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = MaskConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.red_packet.chain_id, MAINNET_CHAIN_ID);
        assert_eq!(config.bridge.channel_capacity, DEFAULT_CHANNEL_CAPACITY);
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!("JSON".parse::<LogFormat>().ok(), Some(LogFormat::Json));
        assert_eq!("pretty".parse::<LogFormat>().ok(), Some(LogFormat::Text));
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_check_address() {
        assert!(check_address("a", DEFAULT_RED_PACKET_ADDRESS).is_ok());
        assert!(check_address("a", "0x1234").is_err());
        assert!(check_address("a", "0xZZBe1101FD8fa5847c452A6D70C8655532B03C33").is_err());
    }
}
