//! Hand-written contract and chain doubles

#![allow(dead_code)]

use alloy_sol_types::{SolCall, SolEvent};
use async_trait::async_trait;
use mask_contract::{
    Address, Bytes, ChainProvider, ContractCaller, ContractError, ContractResult, FungibleToken,
    Log, MethodCall, TransactionConfig, TransactionEventSender, TransactionEvents,
    TransactionInfo, TransactionReceipt, B256, U256,
};
use mask_red_packet::{
    create_red_packetCall, ChainContext, CreationSuccess, PrivateKey, RedPacketSettings,
};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use tokio::sync::oneshot;

pub const CONTRACT: Address = Address::repeat_byte(0xab);
pub const ACCOUNT: Address = Address::repeat_byte(0x11);
pub const PUBLIC_KEY: Address = Address::repeat_byte(0x22);
pub const NATIVE: Address = Address::repeat_byte(0xee);
pub const CREATION_ID: B256 = B256::repeat_byte(0x42);
pub const CREATION_TIME: u64 = 1_634_000_000;

pub fn settings(total: &str, shares: i64) -> RedPacketSettings {
    RedPacketSettings {
        public_key: PUBLIC_KEY,
        private_key: PrivateKey::new("0x4c0883a69102937d6231471b5dbb6204fe512961708279f1d6f6f5e5f1a3b2c1"),
        shares,
        duration: 86_400,
        is_random: false,
        total: total.to_string(),
        name: "Mask".to_string(),
        message: "Best Wishes!".to_string(),
        token: Some(FungibleToken::native("ETH", "Ether")),
    }
}

pub fn context() -> ChainContext {
    ChainContext {
        account: ACCOUNT,
        chain_id: 1,
        native_token_address: NATIVE,
        gas_price: None,
    }
}

pub fn hash(tail: &str) -> B256 {
    format!("0x{:0>64}", tail).parse().unwrap()
}

/// Contract double: estimation result is configurable, submissions hand
/// their event sender to the test
pub struct MockContract {
    pub estimate: Mutex<ContractResult<u64>>,
    pub estimate_gate: Mutex<Option<oneshot::Receiver<()>>>,
    pub sent: Mutex<Vec<(MethodCall, TransactionConfig)>>,
    pub senders: Mutex<Vec<TransactionEventSender>>,
    pub senders_ready: tokio::sync::Notify,
}

impl MockContract {
    pub fn new() -> Self {
        Self {
            estimate: Mutex::new(Ok(210_000)),
            estimate_gate: Mutex::new(None),
            sent: Mutex::new(Vec::new()),
            senders: Mutex::new(Vec::new()),
            senders_ready: tokio::sync::Notify::new(),
        }
    }

    pub fn failing_estimate(message: &str) -> Self {
        let contract = Self::new();
        *contract.estimate.lock() = Err(ContractError::Estimation(message.to_string()));
        contract
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }

    /// Sender of the latest submission, waiting for it if needed
    pub async fn sender(&self) -> TransactionEventSender {
        loop {
            let notified = self.senders_ready.notified();
            if let Some(sender) = self.senders.lock().last().cloned() {
                return sender;
            }
            notified.await;
        }
    }
}

#[async_trait]
impl ContractCaller for MockContract {
    fn address(&self) -> Address {
        CONTRACT
    }

    async fn estimate_gas(&self, call: &MethodCall, _config: &TransactionConfig) -> ContractResult<u64> {
        call.decode::<create_red_packetCall>()?;
        let gate = self.estimate_gate.lock().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.estimate.lock().clone()
    }

    async fn send(&self, call: &MethodCall, config: &TransactionConfig) -> TransactionEvents {
        self.sent.lock().push((call.clone(), config.clone()));
        let (sender, events) = TransactionEvents::channel();
        self.senders.lock().push(sender);
        self.senders_ready.notify_waiters();
        events
    }
}

/// Chain double holding blocks and receipts
#[derive(Default)]
pub struct MockChain {
    pub head: Mutex<u64>,
    pub blocks: Mutex<BTreeMap<u64, Vec<TransactionInfo>>>,
    pub receipts: Mutex<BTreeMap<B256, TransactionReceipt>>,
}

impl MockChain {
    pub fn at(head: u64) -> Self {
        let chain = Self::default();
        *chain.head.lock() = head;
        chain
    }

    pub fn mine(&self, tx: TransactionInfo, receipt: Option<TransactionReceipt>) {
        let mut head = self.head.lock();
        *head = (*head).max(tx.block_number);
        if let Some(receipt) = receipt {
            self.receipts.lock().insert(tx.hash, receipt);
        }
        self.blocks.lock().entry(tx.block_number).or_default().push(tx);
    }
}

#[async_trait]
impl ChainProvider for MockChain {
    async fn block_number(&self) -> ContractResult<u64> {
        Ok(*self.head.lock())
    }

    async fn block_transactions(&self, number: u64) -> ContractResult<Vec<TransactionInfo>> {
        Ok(self.blocks.lock().get(&number).cloned().unwrap_or_default())
    }

    async fn transaction_receipt(&self, hash: B256) -> ContractResult<Option<TransactionReceipt>> {
        Ok(self.receipts.lock().get(&hash).cloned())
    }
}

/// `CreationSuccess` log as the contract emits it
pub fn creation_log(emitter: Address, creator: Address, total: u64) -> Log {
    let event = CreationSuccess {
        total: U256::from(total),
        id: CREATION_ID,
        name: "Mask".into(),
        message: "Best Wishes!".into(),
        creator,
        creation_time: U256::from(CREATION_TIME),
        token_address: NATIVE,
        number: U256::from(5),
        ifrandom: false,
        duration: U256::from(86_400),
    };
    Log {
        address: emitter,
        data: event.encode_log_data(),
    }
}

/// Transaction input calling `create_red_packet` for `public_key`
pub fn create_input(public_key: Address) -> Bytes {
    create_red_packetCall {
        _public_key: public_key,
        _number: U256::from(5),
        _ifrandom: false,
        _duration: U256::from(86_400),
        _seed: B256::repeat_byte(1),
        _message: "Best Wishes!".into(),
        _name: "Mask".into(),
        _token_type: U256::ZERO,
        _token_addr: NATIVE,
        _total_tokens: U256::from(100),
    }
    .abi_encode()
    .into()
}
