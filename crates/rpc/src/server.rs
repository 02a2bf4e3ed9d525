use crate::channel::{Message, Port};
use crate::models::{RpcRequest, RpcResponse};
use crate::{RpcError, RpcHandler};
use futures::FutureExt;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

/// Exposes handlers under string keys and answers requests arriving on ports.
///
/// Clones share the same handler table, so a handler exposed after
/// [`RpcServer::serve`] started is reachable from every served port.
#[derive(Clone, Default)]
pub struct RpcServer {
    handlers: Arc<RwLock<HashMap<String, Arc<dyn RpcHandler>>>>,
}

impl RpcServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exposes `handler` under `key`, returning the handler it replaced
    pub fn expose(
        &self,
        key: impl Into<String>,
        handler: Arc<dyn RpcHandler>,
    ) -> Option<Arc<dyn RpcHandler>> {
        let key = key.into();
        let previous = self.handlers.write().insert(key.clone(), handler);
        if previous.is_some() {
            debug!("Replaced handler exposed under {}", key);
        }
        previous
    }

    pub fn handler(&self, key: &str) -> Option<Arc<dyn RpcHandler>> {
        self.handlers.read().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.handlers.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn clear(&self) {
        self.handlers.write().clear();
    }

    /// Runs a single request against the handler table
    pub async fn dispatch(&self, request: RpcRequest) -> RpcResponse {
        let RpcRequest {
            id,
            key,
            method,
            params,
            ..
        } = request;

        let Some(handler) = self.handler(&key) else {
            return RpcResponse::failure(id, &RpcError::MethodNotFound(key));
        };

        let call = AssertUnwindSafe(handler.call(&method, params)).catch_unwind();
        match call.await {
            Ok(Ok(value)) => RpcResponse::success(id, value),
            Ok(Err(err)) => {
                debug!("{}.{} failed: {}", key, method, err);
                RpcResponse::failure(id, &err)
            }
            Err(panic_payload) => {
                let panic_msg = panic_payload
                    .downcast_ref::<&str>()
                    .copied()
                    .unwrap_or("Handler panicked");
                error!("RPC handler {}.{} panicked: {}", key, method, panic_msg);
                RpcResponse::failure(id, &RpcError::Internal("Internal server error".into()))
            }
        }
    }

    /// Answers requests arriving on `port` until the other end goes away
    pub fn serve(&self, port: Port) -> JoinHandle<()> {
        let (sender, mut receiver) = port.split();
        let server = self.clone();
        tokio::spawn(async move {
            while let Some(message) = receiver.recv().await {
                match message {
                    Message::Request(request) => {
                        let server = server.clone();
                        let sender = sender.clone();
                        tokio::spawn(async move {
                            let response = server.dispatch(request).await;
                            if sender.send(Message::Response(response)).await.is_err() {
                                debug!("Caller disconnected before the response was sent");
                            }
                        });
                    }
                    Message::Response(response) => {
                        warn!("Ignoring unexpected response {} on a served port", response.id);
                    }
                }
            }
            debug!("Served port closed");
        })
    }
}
