use chrono::Utc;
use futures::TryStreamExt;
use mask_bridge::MessageBus;
use mask_contract::Address;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

use crate::error::{WalletError, WalletResult};
use crate::record::{
    NewWallet, ProviderType, StoredKeyInfo, TokenLists, WalletMessage, WalletRecord,
    WalletSettings, WalletUpdate,
};
use crate::store::RecordStore;

fn parse_address(address: &str) -> WalletResult<Address> {
    mask_contract::parse_address(address).map_err(|_| WalletError::InvalidAddress)
}

/// Wallet records on top of a [`RecordStore`].
///
/// Every mutation announces [`WalletMessage::WalletsUpdated`] on the bus.
pub struct WalletDatabase<S> {
    store: Arc<S>,
    bus: MessageBus<WalletMessage>,
}

impl<S> Clone for WalletDatabase<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            bus: self.bus.clone(),
        }
    }
}

impl<S: RecordStore<WalletRecord>> WalletDatabase<S> {
    pub fn new(store: Arc<S>, bus: MessageBus<WalletMessage>) -> Self {
        Self { store, bus }
    }

    pub fn messages(&self) -> &MessageBus<WalletMessage> {
        &self.bus
    }

    pub async fn get_wallet(&self, address: &str) -> WalletResult<Option<WalletRecord>> {
        let address = parse_address(address)?;
        Ok(self.store.get(&address.to_checksum(None)).await?)
    }

    /// Wallet of the current Mask wallet account, if one is selected
    pub async fn current_wallet(&self, settings: &WalletSettings) -> WalletResult<Option<WalletRecord>> {
        match settings.current_mask_wallet_account {
            Some(address) => Ok(self.store.get(&address.to_checksum(None)).await?),
            None => Ok(None),
        }
    }

    pub async fn get_wallet_required(&self, address: &str) -> WalletResult<WalletRecord> {
        self.get_wallet(address)
            .await?
            .ok_or(WalletError::WalletNotFound)
    }

    pub async fn has_wallet(&self, address: &str) -> WalletResult<bool> {
        let address = parse_address(address)?;
        Ok(self.store.has(&address.to_checksum(None)).await?)
    }

    pub async fn has_wallet_required(&self, address: &str) -> WalletResult<bool> {
        if !self.has_wallet(address).await? {
            return Err(WalletError::WalletNotFound);
        }
        Ok(true)
    }

    pub async fn has_stored_key_info(&self, info: Option<&StoredKeyInfo>) -> WalletResult<bool> {
        let Some(info) = info else {
            return Ok(false);
        };
        let wallets = self.all_wallets().await?;
        Ok(wallets.iter().any(|wallet| {
            wallet
                .stored_key_info
                .as_ref()
                .is_some_and(|stored| !stored.hash.is_empty() && stored.hash == info.hash)
        }))
    }

    pub async fn has_stored_key_info_required(&self, info: Option<&StoredKeyInfo>) -> WalletResult<bool> {
        if !self.has_stored_key_info(info).await? {
            return Err(WalletError::StoredKeyInfoNotFound);
        }
        Ok(true)
    }

    async fn all_wallets(&self) -> WalletResult<Vec<WalletRecord>> {
        Ok(self.store.iterate().try_collect().await?)
    }

    /// Wallets visible for `provider`.
    ///
    /// The selected account comes first, the rest newest first by update
    /// then creation time. The Mask wallet provider only sees wallets with
    /// stored keys; the current provider only sees the selected account;
    /// any other provider sees nothing.
    pub async fn get_wallets(
        &self,
        provider: Option<ProviderType>,
        settings: &WalletSettings,
    ) -> WalletResult<Vec<WalletRecord>> {
        let mut wallets = self.all_wallets().await?;
        let current = settings.account_for(provider);

        wallets.sort_by(|a, z| {
            let a_current = Some(a.address) == current;
            let z_current = Some(z.address) == current;
            match (a_current, z_current) {
                (true, false) => return Ordering::Less,
                (false, true) => return Ordering::Greater,
                _ => {}
            }
            z.updated_at
                .cmp(&a.updated_at)
                .then_with(|| z.created_at.cmp(&a.created_at))
        });

        Ok(match provider {
            Some(ProviderType::MaskWallet) => wallets
                .into_iter()
                .filter(|w| w.stored_key_info.is_some())
                .collect(),
            Some(p) if Some(p) == settings.current_provider => wallets
                .into_iter()
                .filter(|w| Some(w.address) == current)
                .collect(),
            Some(_) => Vec::new(),
            None => wallets,
        })
    }

    /// Stores a new wallet and returns its checksummed address.
    ///
    /// A blank name becomes `Account {n}` with `n` one past the number of
    /// stored wallets.
    pub async fn add_wallet(&self, wallet: NewWallet) -> WalletResult<Address> {
        let address = parse_address(&wallet.address)?;
        if self.store.has(&address.to_checksum(None)).await? {
            return Err(WalletError::WalletExists);
        }

        let name = match wallet.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Account {}", self.all_wallets().await?.len() + 1),
        };
        let now = Utc::now();
        self.store
            .add(WalletRecord {
                id: address.to_checksum(None),
                address,
                name,
                derivation_path: wallet.derivation_path,
                stored_key_info: wallet.stored_key_info,
                tokens: TokenLists::default(),
                created_at: now,
                updated_at: now,
            })
            .await?;

        debug!("Wallet {} added", address);
        self.bus.send_to_all(WalletMessage::WalletsUpdated);
        Ok(address)
    }

    pub async fn update_wallet(&self, address: &str, updates: WalletUpdate) -> WalletResult<()> {
        let mut wallet = self.get_wallet_required(address).await?;
        updates.apply(&mut wallet);
        wallet.updated_at = Utc::now();
        self.store.add(wallet).await?;
        self.bus.send_to_all(WalletMessage::WalletsUpdated);
        Ok(())
    }

    /// Wallets derived from a mnemonic cannot be removed
    pub async fn remove_wallet(&self, address: &str) -> WalletResult<()> {
        let wallet = self.get_wallet_required(address).await?;
        if wallet.derivation_path.is_some() {
            return Err(WalletError::IllegalOperation);
        }
        self.store.remove(&wallet.id).await?;
        debug!("Wallet {} removed", wallet.address);
        self.bus.send_to_all(WalletMessage::WalletsUpdated);
        Ok(())
    }
}
