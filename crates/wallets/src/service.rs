//! Wallet service as seen from every context.
//!
//! The background page wraps a [`WalletDatabase`] in a
//! [`WalletServiceHandler`] and registers it under `ServiceName::WALLET`;
//! other contexts talk to it through a [`WalletServiceProxy`].

use async_trait::async_trait;
use mask_bridge::ServiceBinding;
use mask_contract::Address;
use mask_rpc::{param, to_value, RpcError, RpcHandler, RpcResult};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::database::WalletDatabase;
use crate::error::{WalletError, WalletResult};
use crate::record::{NewWallet, ProviderType, WalletRecord, WalletSettings, WalletUpdate};
use crate::store::RecordStore;

pub mod methods {
    pub const GET_WALLET: &str = "getWallet";
    pub const GET_WALLETS: &str = "getWallets";
    pub const HAS_WALLET: &str = "hasWallet";
    pub const ADD_WALLET: &str = "addWallet";
    pub const UPDATE_WALLET: &str = "updateWallet";
    pub const REMOVE_WALLET: &str = "removeWallet";
}

#[async_trait]
pub trait WalletService: Send + Sync {
    async fn get_wallet(&self, address: &str) -> WalletResult<Option<WalletRecord>>;

    async fn get_wallets(
        &self,
        provider: Option<ProviderType>,
        settings: &WalletSettings,
    ) -> WalletResult<Vec<WalletRecord>>;

    async fn has_wallet(&self, address: &str) -> WalletResult<bool>;

    async fn add_wallet(&self, wallet: NewWallet) -> WalletResult<Address>;

    async fn update_wallet(&self, address: &str, updates: WalletUpdate) -> WalletResult<()>;

    async fn remove_wallet(&self, address: &str) -> WalletResult<()>;
}

#[async_trait]
impl<S: RecordStore<WalletRecord>> WalletService for WalletDatabase<S> {
    async fn get_wallet(&self, address: &str) -> WalletResult<Option<WalletRecord>> {
        WalletDatabase::get_wallet(self, address).await
    }

    async fn get_wallets(
        &self,
        provider: Option<ProviderType>,
        settings: &WalletSettings,
    ) -> WalletResult<Vec<WalletRecord>> {
        WalletDatabase::get_wallets(self, provider, settings).await
    }

    async fn has_wallet(&self, address: &str) -> WalletResult<bool> {
        WalletDatabase::has_wallet(self, address).await
    }

    async fn add_wallet(&self, wallet: NewWallet) -> WalletResult<Address> {
        WalletDatabase::add_wallet(self, wallet).await
    }

    async fn update_wallet(&self, address: &str, updates: WalletUpdate) -> WalletResult<()> {
        WalletDatabase::update_wallet(self, address, updates).await
    }

    async fn remove_wallet(&self, address: &str) -> WalletResult<()> {
        WalletDatabase::remove_wallet(self, address).await
    }
}

/// Server-side adapter dispatching RPC method names to a [`WalletService`]
pub struct WalletServiceHandler<W> {
    inner: W,
}

impl<W: WalletService> WalletServiceHandler<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<W: WalletService> RpcHandler for WalletServiceHandler<W> {
    async fn call(&self, method: &str, params: Vec<Value>) -> RpcResult<Value> {
        match method {
            methods::GET_WALLET => {
                let address: String = param(&params, 0)?;
                to_value(self.inner.get_wallet(&address).await?)
            }
            methods::GET_WALLETS => {
                let provider: Option<ProviderType> = param(&params, 0)?;
                let settings: Option<WalletSettings> = param(&params, 1)?;
                let settings = settings.unwrap_or_default();
                to_value(self.inner.get_wallets(provider, &settings).await?)
            }
            methods::HAS_WALLET => {
                let address: String = param(&params, 0)?;
                to_value(self.inner.has_wallet(&address).await?)
            }
            methods::ADD_WALLET => {
                let wallet: NewWallet = param(&params, 0)?;
                to_value(self.inner.add_wallet(wallet).await?)
            }
            methods::UPDATE_WALLET => {
                let address: String = param(&params, 0)?;
                let updates: WalletUpdate = param(&params, 1)?;
                self.inner.update_wallet(&address, updates).await?;
                Ok(Value::Null)
            }
            methods::REMOVE_WALLET => {
                let address: String = param(&params, 0)?;
                self.inner.remove_wallet(&address).await?;
                Ok(Value::Null)
            }
            other => Err(RpcError::MethodNotFound(other.to_string())),
        }
    }
}

/// Client-side adapter forwarding typed calls through a service binding
#[derive(Clone)]
pub struct WalletServiceProxy {
    binding: ServiceBinding,
}

impl WalletServiceProxy {
    pub fn new(binding: ServiceBinding) -> Self {
        Self { binding }
    }

    async fn invoke<T: DeserializeOwned>(&self, method: &str, params: Vec<Value>) -> WalletResult<T> {
        self.binding
            .call_typed(method, params)
            .await
            .map_err(WalletError::from_remote)
    }
}

#[async_trait]
impl WalletService for WalletServiceProxy {
    async fn get_wallet(&self, address: &str) -> WalletResult<Option<WalletRecord>> {
        self.invoke(methods::GET_WALLET, vec![json!(address)]).await
    }

    async fn get_wallets(
        &self,
        provider: Option<ProviderType>,
        settings: &WalletSettings,
    ) -> WalletResult<Vec<WalletRecord>> {
        let settings = to_value(settings).map_err(WalletError::Rpc)?;
        self.invoke(methods::GET_WALLETS, vec![json!(provider), settings])
            .await
    }

    async fn has_wallet(&self, address: &str) -> WalletResult<bool> {
        self.invoke(methods::HAS_WALLET, vec![json!(address)]).await
    }

    async fn add_wallet(&self, wallet: NewWallet) -> WalletResult<Address> {
        let wallet = to_value(wallet).map_err(WalletError::Rpc)?;
        self.invoke(methods::ADD_WALLET, vec![wallet]).await
    }

    async fn update_wallet(&self, address: &str, updates: WalletUpdate) -> WalletResult<()> {
        let updates = to_value(updates).map_err(WalletError::Rpc)?;
        self.invoke(methods::UPDATE_WALLET, vec![json!(address), updates])
            .await
    }

    async fn remove_wallet(&self, address: &str) -> WalletResult<()> {
        self.invoke(methods::REMOVE_WALLET, vec![json!(address)])
            .await
    }
}
