use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::FutureExt;
use mask_rpc::{RpcHandler, RpcResult};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

type MockMethod = Arc<dyn Fn(Vec<Value>) -> BoxFuture<'static, RpcResult<Value>> + Send + Sync>;

/// Partial service implementation used while developing UI without a
/// background page.
#[derive(Clone, Default)]
pub struct MockService {
    methods: HashMap<String, MockMethod>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method<F, Fut>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = RpcResult<Value>> + Send + 'static,
    {
        let method: MockMethod = Arc::new(move |params| method(params).boxed());
        self.methods.insert(name.into(), method);
        self
    }

    /// Method that always resolves to `value`
    pub fn with_value(self, name: impl Into<String>, value: Value) -> Self {
        self.with_method(name, move |_| {
            let value = value.clone();
            async move { Ok(value) }
        })
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }
}

/// Adapter resolving every method missing from the mock to `null`
#[derive(Clone, Default)]
pub struct DefaultToNoop {
    mock: MockService,
}

impl DefaultToNoop {
    pub fn new(mock: Option<MockService>) -> Self {
        Self {
            mock: mock.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl RpcHandler for DefaultToNoop {
    async fn call(&self, method: &str, params: Vec<Value>) -> RpcResult<Value> {
        match self.mock.methods.get(method) {
            Some(implementation) => implementation(params).await,
            None => Ok(Value::Null),
        }
    }
}
