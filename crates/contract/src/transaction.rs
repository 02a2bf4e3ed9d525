//! Transaction configuration, receipts and the event stream of a submission

use crate::caller::ContractError;
use crate::types::{Address, Bytes, Log, B256, U256};
use alloy_sol_types::SolEvent;
use tokio::sync::mpsc;

/// Sender-side options of a contract call
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransactionConfig {
    pub from: Address,
    /// Native value attached to the call, in wei
    pub value: U256,
    pub gas: Option<u64>,
    pub gas_price: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransactionReceipt {
    pub transaction_hash: B256,
    pub block_number: u64,
    pub status: bool,
    pub logs: Vec<Log>,
}

impl TransactionReceipt {
    /// First log emitted by `address`
    pub fn log_from(&self, address: Address) -> Option<&Log> {
        self.logs.iter().find(|log| log.address == address)
    }

    /// First log of `emitter` that decodes as `E`. Logs of other events
    /// are skipped.
    pub fn decode_event<E: SolEvent>(&self, emitter: Address) -> Option<E> {
        self.logs
            .iter()
            .filter(|log| log.address == emitter)
            .find_map(|log| E::decode_log(log).ok())
            .map(|decoded| decoded.data)
    }
}

/// Mined transaction as seen when scanning a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionInfo {
    pub hash: B256,
    pub from: Address,
    pub to: Option<Address>,
    pub nonce: u64,
    pub input: Bytes,
    pub block_number: u64,
}

/// Lifecycle notification of one submitted call.
///
/// Arrives in the order hash, receipt, confirmations; an error ends the
/// stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionEvent {
    TransactionHash(B256),
    Receipt(TransactionReceipt),
    Confirmation { no: u64, receipt: TransactionReceipt },
    Error(ContractError),
}

/// Receiving half handed back by [`crate::ContractCaller::send`]
#[derive(Debug)]
pub struct TransactionEvents {
    receiver: mpsc::UnboundedReceiver<TransactionEvent>,
}

impl TransactionEvents {
    pub fn channel() -> (TransactionEventSender, TransactionEvents) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            TransactionEventSender { sender },
            TransactionEvents { receiver },
        )
    }

    /// Next event, `None` once the submitting side has gone away
    pub async fn next(&mut self) -> Option<TransactionEvent> {
        self.receiver.recv().await
    }
}

#[derive(Debug, Clone)]
pub struct TransactionEventSender {
    sender: mpsc::UnboundedSender<TransactionEvent>,
}

impl TransactionEventSender {
    /// Returns `false` when nobody listens anymore
    pub fn emit(&self, event: TransactionEvent) -> bool {
        self.sender.send(event).is_ok()
    }

    pub fn transaction_hash(&self, hash: B256) -> bool {
        self.emit(TransactionEvent::TransactionHash(hash))
    }

    pub fn receipt(&self, receipt: TransactionReceipt) -> bool {
        self.emit(TransactionEvent::Receipt(receipt))
    }

    pub fn confirmation(&self, no: u64, receipt: TransactionReceipt) -> bool {
        self.emit(TransactionEvent::Confirmation { no, receipt })
    }

    pub fn error(&self, error: ContractError) -> bool {
        self.emit(TransactionEvent::Error(error))
    }
}
