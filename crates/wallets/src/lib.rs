//! # Mask Wallets
//!
//! Wallet records kept in the background page: lookup, ordering per
//! provider, creation with default names, updates and guarded removal.
//! Changes are announced to every context on a [`mask_bridge::MessageBus`].
//!
//! [`WalletService`] is the typed interface shared by the real
//! [`WalletDatabase`] and the [`WalletServiceProxy`] used by UI contexts.

pub mod database;
pub mod error;
pub mod record;
pub mod service;
pub mod store;

pub use database::WalletDatabase;
pub use error::{WalletError, WalletResult};
pub use record::{
    NewWallet, ProviderType, StoredKeyInfo, TokenLists, WalletMessage, WalletRecord,
    WalletSettings, WalletUpdate,
};
pub use service::{WalletService, WalletServiceHandler, WalletServiceProxy};
pub use store::{MemoryRecordStore, Record, RecordStore, StoreError, StoreResult};
