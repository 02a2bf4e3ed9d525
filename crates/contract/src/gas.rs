//! Gas price tiers offered when sending a transaction

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GasOption {
    Low,
    Medium,
    High,
}

impl fmt::Display for GasOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GasOption::Low => write!(f, "low"),
            GasOption::Medium => write!(f, "medium"),
            GasOption::High => write!(f, "high"),
        }
    }
}

/// Suggested gas prices in wei
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GasPriceDict {
    pub slow: u64,
    pub normal: u64,
    pub fast: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasOptionEntry {
    pub option: GasOption,
    pub gas_price: u64,
}

/// Source of gas price suggestions for a chain
#[async_trait]
pub trait GasPriceOracle: Send + Sync {
    /// `Ok(None)` when the oracle does not cover `chain_id`
    async fn gas_prices(&self, chain_id: u64) -> anyhow::Result<Option<GasPriceDict>>;
}

/// Low, medium and high entries for `chain_id`; all zero when the oracle
/// has nothing to offer.
pub async fn gas_options(oracle: &dyn GasPriceOracle, chain_id: u64) -> [GasOptionEntry; 3] {
    let prices = match oracle.gas_prices(chain_id).await {
        Ok(Some(prices)) => prices,
        Ok(None) => GasPriceDict::default(),
        Err(e) => {
            warn!("Gas price lookup for chain {} failed: {:#}", chain_id, e);
            GasPriceDict::default()
        }
    };
    [
        GasOptionEntry { option: GasOption::Low, gas_price: prices.slow },
        GasOptionEntry { option: GasOption::Medium, gas_price: prices.normal },
        GasOptionEntry { option: GasOption::High, gas_price: prices.fast },
    ]
}
