use mask_config::RedPacketConfig;
use mask_contract::{parse_address, Address, AddressError, FungibleToken};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Hex private key of the red packet's claim account, wiped on drop
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(String);

impl PrivateKey {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// What the user asked for when creating a red packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedPacketSettings {
    /// Address of the generated claim account
    pub public_key: Address,
    pub private_key: PrivateKey,
    pub shares: i64,
    /// Seconds until the red packet expires
    pub duration: u64,
    pub is_random: bool,
    /// Total amount in the token's smallest unit, decimal
    pub total: String,
    pub name: String,
    pub message: String,
    pub token: Option<FungibleToken>,
}

/// Account and chain the pipeline works against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainContext {
    pub account: Address,
    pub chain_id: u64,
    /// Sentinel address standing for the chain's native asset
    pub native_token_address: Address,
    pub gas_price: Option<u64>,
}

impl ChainContext {
    pub fn from_config(config: &RedPacketConfig, account: Address) -> Result<Self, AddressError> {
        Ok(Self {
            account,
            chain_id: config.chain_id,
            native_token_address: parse_address(&config.native_token_address)?,
            gas_price: None,
        })
    }
}
