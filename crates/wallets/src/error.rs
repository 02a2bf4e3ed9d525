use mask_rpc::RpcError;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Not a valid address.")]
    InvalidAddress,

    #[error("The wallet does not exist.")]
    WalletNotFound,

    #[error("The wallet already exists.")]
    WalletExists,

    #[error("The stored key info does not exist.")]
    StoredKeyInfoNotFound,

    /// Removing a wallet derived from a mnemonic
    #[error("Illegal operation.")]
    IllegalOperation,

    #[error("wallet storage error: {0}")]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Rpc(RpcError),
}

pub type WalletResult<T> = Result<T, WalletError>;

impl WalletError {
    /// Recovers the typed error from a failure reported by the background page
    pub fn from_remote(error: RpcError) -> Self {
        let message = match &error {
            RpcError::Remote { message, .. } => message.as_str(),
            _ => return WalletError::Rpc(error),
        };
        match message {
            "Not a valid address." => WalletError::InvalidAddress,
            "The wallet does not exist." => WalletError::WalletNotFound,
            "The wallet already exists." => WalletError::WalletExists,
            "The stored key info does not exist." => WalletError::StoredKeyInfoNotFound,
            "Illegal operation." => WalletError::IllegalOperation,
            _ => WalletError::Rpc(error),
        }
    }
}

impl From<WalletError> for RpcError {
    fn from(error: WalletError) -> Self {
        match error {
            WalletError::Rpc(inner) => inner,
            other => RpcError::application(&other),
        }
    }
}
