use async_trait::async_trait;
use mask_rpc::{RpcClient, RpcError, RpcHandler, RpcResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Identifier of a registrable capability set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceName(&'static str);

impl ServiceName {
    pub const CRYPTO: ServiceName = ServiceName("Crypto");
    pub const PEOPLE: ServiceName = ServiceName("People");
    pub const WELCOME: ServiceName = ServiceName("Welcome");
    pub const WALLET: ServiceName = ServiceName("Wallet");

    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Forwards every call to the service of the same name in another context
#[derive(Clone)]
pub struct RemoteService {
    name: ServiceName,
    client: RpcClient,
}

impl RemoteService {
    pub fn new(name: ServiceName, client: RpcClient) -> Self {
        Self { name, client }
    }

    pub fn name(&self) -> ServiceName {
        self.name
    }
}

#[async_trait]
impl RpcHandler for RemoteService {
    async fn call(&self, method: &str, params: Vec<Value>) -> RpcResult<Value> {
        self.client.call(self.name.as_str(), method, params).await
    }
}

/// What a context holds for a service name
#[derive(Clone)]
pub enum ServiceBinding {
    /// The real implementation, only ever held by the background page
    Local(Arc<dyn RpcHandler>),
    /// A proxy to the background page (or the debugging loopback)
    Remote(RemoteService),
}

impl ServiceBinding {
    pub fn is_local(&self) -> bool {
        matches!(self, ServiceBinding::Local(_))
    }

    pub async fn call(&self, method: &str, params: Vec<Value>) -> RpcResult<Value> {
        match self {
            ServiceBinding::Local(handler) => handler.call(method, params).await,
            ServiceBinding::Remote(remote) => remote.call(method, params).await,
        }
    }

    pub async fn call_typed<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> RpcResult<T> {
        let value = self.call(method, params).await?;
        serde_json::from_value(value).map_err(|e| RpcError::Serialization(e.to_string()))
    }
}

#[async_trait]
impl RpcHandler for ServiceBinding {
    async fn call(&self, method: &str, params: Vec<Value>) -> RpcResult<Value> {
        ServiceBinding::call(self, method, params).await
    }
}

impl fmt::Debug for ServiceBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceBinding::Local(_) => f.write_str("ServiceBinding::Local"),
            ServiceBinding::Remote(remote) => write!(f, "ServiceBinding::Remote({})", remote.name),
        }
    }
}
