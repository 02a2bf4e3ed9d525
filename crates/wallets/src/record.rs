//! Wallet record model

use chrono::{DateTime, Utc};
use mask_contract::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::store::Record;

/// Where the current account comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderType {
    MaskWallet,
    MetaMask,
    WalletConnect,
    CustomNetwork,
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderType::MaskWallet => write!(f, "Maskbook"),
            ProviderType::MetaMask => write!(f, "MetaMask"),
            ProviderType::WalletConnect => write!(f, "WalletConnect"),
            ProviderType::CustomNetwork => write!(f, "CustomNetwork"),
        }
    }
}

/// Encrypted key material held by the wallet core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredKeyInfo {
    pub hash: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenLists {
    pub erc20_whitelist: BTreeSet<Address>,
    pub erc20_blacklist: BTreeSet<Address>,
    pub erc721_whitelist: BTreeSet<Address>,
    pub erc721_blacklist: BTreeSet<Address>,
    pub erc1155_whitelist: BTreeSet<Address>,
    pub erc1155_blacklist: BTreeSet<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRecord {
    /// Checksummed address, doubles as the record key
    pub id: String,
    pub address: Address,
    pub name: String,
    /// Set for wallets derived from a mnemonic
    pub derivation_path: Option<String>,
    pub stored_key_info: Option<StoredKeyInfo>,
    pub tokens: TokenLists,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record for WalletRecord {
    const COLLECTION: &'static str = "wallet";

    fn key(&self) -> String {
        self.id.clone()
    }
}

/// Input of `add_wallet`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWallet {
    pub address: String,
    pub name: Option<String>,
    pub derivation_path: Option<String>,
    pub stored_key_info: Option<StoredKeyInfo>,
}

impl NewWallet {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_derivation_path(mut self, path: impl Into<String>) -> Self {
        self.derivation_path = Some(path.into());
        self
    }

    pub fn with_stored_key_info(mut self, info: StoredKeyInfo) -> Self {
        self.stored_key_info = Some(info);
        self
    }
}

/// Fields `update_wallet` may change; `None` leaves a field untouched
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletUpdate {
    pub name: Option<String>,
    pub derivation_path: Option<String>,
    pub stored_key_info: Option<StoredKeyInfo>,
}

impl WalletUpdate {
    pub(crate) fn apply(self, record: &mut WalletRecord) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(path) = self.derivation_path {
            record.derivation_path = Some(path);
        }
        if let Some(info) = self.stored_key_info {
            record.stored_key_info = Some(info);
        }
    }
}

/// Account selection of the current session.
///
/// Passed to every query that depends on it instead of being read from
/// process-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSettings {
    pub current_account: Option<Address>,
    pub current_mask_wallet_account: Option<Address>,
    pub current_provider: Option<ProviderType>,
}

impl WalletSettings {
    /// Account selected for `provider`
    pub fn account_for(&self, provider: Option<ProviderType>) -> Option<Address> {
        if provider == Some(ProviderType::MaskWallet) {
            self.current_mask_wallet_account
        } else {
            self.current_account
        }
    }
}

/// Broadcast to every context after the wallet set changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletMessage {
    WalletsUpdated,
}
