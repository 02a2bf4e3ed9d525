//! # mask-rs
//!
//! Core services of the Mask Network extension in Rust:
//!
//! - [`rpc`] - request/response calls over a message port between contexts
//! - [`bridge`] - per-context service registration and forwarding
//! - [`contract`] - address parsing over alloy types, contract call handles, gas tiers
//! - [`wallets`] - wallet records and the wallet service (feature `wallets`)
//! - [`red_packet`] - red packet creation pipeline (feature `red-packet`)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mask_rs::prelude::*;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = mask_rs::init("mask.toml")?;
//! let bridge = ContextBridge::new(&StaticContext(ExecutionContext::Background), None, &config.bridge);
//! # Ok(())
//! # }
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

pub use mask_bridge as bridge;
pub use mask_config as config;
pub use mask_contract as contract;
pub use mask_rpc as rpc;
pub use mask_telemetry as telemetry;

#[cfg(feature = "red-packet")]
pub use mask_red_packet as red_packet;

#[cfg(feature = "wallets")]
pub use mask_wallets as wallets;

use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Start-up failures
#[derive(Debug, Error)]
pub enum MaskError {
    #[error(transparent)]
    Config(#[from] mask_config::ConfigError),

    #[error(transparent)]
    Telemetry(#[from] mask_telemetry::TelemetryError),
}

/// Loads the configuration at `path` and installs logging
pub fn init(path: impl AsRef<Path>) -> Result<mask_config::MaskConfig, MaskError> {
    let config = mask_config::MaskConfig::load(path)?;
    mask_telemetry::init_from_settings(&config.logging)?;
    info!("mask-rs {} initialised", env!("CARGO_PKG_VERSION"));
    Ok(config)
}

/// Common imports
pub mod prelude {
    pub use crate::bridge::{
        ContextBridge, ContextDetector, ExecutionContext, MessageBus, MockService, Registration,
        ServiceBinding, ServiceName, StaticContext,
    };
    pub use crate::config::{BridgeConfig, MaskConfig, RedPacketConfig};
    pub use crate::contract::{
        Address, ChainProvider, ContractCaller, FungibleToken, TokenType, TransactionEvent,
        TransactionReceipt, B256, U256,
    };
    pub use crate::rpc::{MessageChannel, RpcError, RpcHandler, RpcResult};

    #[cfg(feature = "red-packet")]
    pub use crate::red_packet::{ChainContext, CreatePipeline, RedPacketSettings, TransactionState};

    #[cfg(feature = "wallets")]
    pub use crate::wallets::{WalletDatabase, WalletService, WalletServiceProxy};
}
