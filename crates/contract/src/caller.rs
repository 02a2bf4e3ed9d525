//! Contract call handles and chain access

use crate::transaction::{TransactionConfig, TransactionEvents, TransactionInfo, TransactionReceipt};
use crate::types::{Address, Bytes, B256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use thiserror::Error;

/// Failures reported by a contract handle or chain provider.
///
/// `Clone` so it can be stored in observable transaction state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("gas estimation failed: {0}")]
    Estimation(String),

    #[error("transaction rejected: {0}")]
    Rejected(String),

    #[error("transaction reverted: {0}")]
    Reverted(String),

    #[error("provider error: {0}")]
    Provider(String),

    #[error("ABI error: {0}")]
    Abi(String),

    #[error("transaction events ended before a final result")]
    Dropped,
}

impl From<alloy_sol_types::Error> for ContractError {
    fn from(error: alloy_sol_types::Error) -> Self {
        ContractError::Abi(error.to_string())
    }
}

pub type ContractResult<T> = Result<T, ContractError>;

/// ABI-encoded invocation of one contract method
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    /// Solidity signature, `name(type,...)`
    pub signature: &'static str,
    /// Selector followed by the encoded arguments
    pub input: Bytes,
}

impl MethodCall {
    pub fn new<C: SolCall>(call: &C) -> Self {
        Self {
            signature: C::SIGNATURE,
            input: call.abi_encode().into(),
        }
    }

    /// Method name without the parameter list
    pub fn name(&self) -> &str {
        self.signature
            .split_once('(')
            .map_or(self.signature, |(name, _)| name)
    }

    pub fn selector(&self) -> Option<[u8; 4]> {
        self.input.get(..4)?.try_into().ok()
    }

    /// Decodes the arguments as `C`; fails on a foreign selector
    pub fn decode<C: SolCall>(&self) -> ContractResult<C> {
        Ok(C::abi_decode(&self.input)?)
    }
}

/// Handle on one deployed contract
#[async_trait]
pub trait ContractCaller: Send + Sync {
    fn address(&self) -> Address;

    /// Gas needed to run `call`; fails when the call would revert
    async fn estimate_gas(&self, call: &MethodCall, config: &TransactionConfig) -> ContractResult<u64>;

    /// Signs and broadcasts `call`. The returned stream runs until an error
    /// or the last confirmation the implementation reports.
    async fn send(&self, call: &MethodCall, config: &TransactionConfig) -> TransactionEvents;
}

/// Read access to the chain
#[async_trait]
pub trait ChainProvider: Send + Sync {
    async fn block_number(&self) -> ContractResult<u64>;

    async fn block_transactions(&self, number: u64) -> ContractResult<Vec<TransactionInfo>>;

    /// `None` while the transaction is still pending
    async fn transaction_receipt(&self, hash: B256) -> ContractResult<Option<TransactionReceipt>>;
}
