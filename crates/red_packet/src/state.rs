use mask_contract::{ContractError, TransactionReceipt, B256};
use std::fmt;
use thiserror::Error;

use crate::params::ValidationError;

/// Why a creation ended in [`TransactionState::Failed`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Bad intent, never retried
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Gas estimation failed; the user may submit again
    #[error("{0}")]
    Estimation(ContractError),

    /// Network failure or signature rejection after submission
    #[error("{0}")]
    Submission(ContractError),
}

/// Observable lifecycle of one creation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TransactionState {
    #[default]
    Unknown,
    WaitingForConfirmation { hash: Option<B256> },
    Confirmed { no: u64, receipt: TransactionReceipt },
    Failed { error: PipelineError },
}

impl TransactionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionState::Confirmed { .. } | TransactionState::Failed { .. })
    }

    /// Hash of the pending submission, once the wallet reported it
    pub fn pending_hash(&self) -> Option<B256> {
        match self {
            TransactionState::WaitingForConfirmation { hash } => *hash,
            _ => None,
        }
    }
}

impl fmt::Display for TransactionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionState::Unknown => write!(f, "unknown"),
            TransactionState::WaitingForConfirmation { hash: None } => write!(f, "waiting for confirmation"),
            TransactionState::WaitingForConfirmation { hash: Some(hash) } => {
                write!(f, "waiting for confirmation of {}", hash)
            }
            TransactionState::Confirmed { no, receipt } => {
                write!(f, "confirmed ({}) in {}", no, receipt.transaction_hash)
            }
            TransactionState::Failed { error } => write!(f, "failed: {}", error),
        }
    }
}
