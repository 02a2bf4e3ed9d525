//! Detection of a submission replaced by a faster one

use alloy_sol_types::SolCall;
use mask_contract::{Address, ChainProvider, ContractResult, TransactionInfo, B256};
use tracing::debug;

/// Scans mined blocks for a transaction that superseded a pending one.
///
/// A candidate is sent by the tracked account to the contract, is not the
/// pending hash itself and carries input that decodes as the tracked
/// method and satisfies the caller's predicate.
#[derive(Debug, Clone)]
pub struct SpeedUpDetector {
    account: Address,
    contract: Address,
    /// First block to scan, fixed when tracking began
    baseline: u64,
}

impl SpeedUpDetector {
    pub fn new(account: Address, contract: Address, baseline: u64) -> Self {
        Self {
            account,
            contract,
            baseline,
        }
    }

    pub fn baseline(&self) -> u64 {
        self.baseline
    }

    /// Whether `tx` replaces `pending` with a call to `C`
    pub fn matches<C, F>(&self, tx: &TransactionInfo, pending: Option<B256>, predicate: &F) -> bool
    where
        C: SolCall,
        F: Fn(&C) -> bool,
    {
        if tx.from != self.account || tx.to != Some(self.contract) || Some(tx.hash) == pending {
            return false;
        }
        match C::abi_decode(&tx.input) {
            Ok(call) => predicate(&call),
            Err(e) => {
                debug!("Skipping {}: {}", tx.hash, e);
                false
            }
        }
    }

    /// First superseding transaction between the baseline and the head
    pub async fn scan<C, F>(
        &self,
        provider: &dyn ChainProvider,
        pending: Option<B256>,
        predicate: F,
    ) -> ContractResult<Option<TransactionInfo>>
    where
        C: SolCall,
        F: Fn(&C) -> bool + Send + Sync,
    {
        let head = provider.block_number().await?;
        for number in self.baseline..=head {
            let transactions = provider.block_transactions(number).await?;
            if let Some(tx) = transactions
                .into_iter()
                .find(|tx| self.matches(tx, pending, &predicate))
            {
                return Ok(Some(tx));
            }
        }
        Ok(None)
    }
}
