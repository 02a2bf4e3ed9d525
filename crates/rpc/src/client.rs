use crate::channel::{Message, Port};
use crate::models::{RpcRequest, RpcResponse};
use crate::{RpcError, RpcResult};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

type PendingCalls = Arc<Mutex<HashMap<u64, oneshot::Sender<RpcResponse>>>>;

/// Forwards calls over a port and resolves them with the remote result.
///
/// Cheap to clone; all clones share the port and the table of in-flight
/// calls. The reader task stops once the last clone is dropped.
#[derive(Clone)]
pub struct RpcClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    sender: mpsc::Sender<Message>,
    pending: PendingCalls,
    next_id: AtomicU64,
    timeout: Option<Duration>,
    reader: JoinHandle<()>,
}

impl Drop for ClientInner {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

impl RpcClient {
    /// Connects to the context on the other end of `port`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn connect(port: Port, timeout: Option<Duration>) -> Self {
        let (sender, receiver) = port.split();
        let pending: PendingCalls = Arc::new(Mutex::new(HashMap::new()));
        let reader = tokio::spawn(read_responses(receiver, pending.clone()));

        Self {
            inner: Arc::new(ClientInner {
                sender,
                pending,
                next_id: AtomicU64::new(1),
                timeout,
                reader,
            }),
        }
    }

    /// Calls `method` on the service exposed under `key`.
    ///
    /// Dropping the returned future forgets the call; a late response is
    /// then discarded.
    pub async fn call(&self, key: &str, method: &str, params: Vec<Value>) -> RpcResult<Value> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = oneshot::channel();
        self.inner.pending.lock().insert(id, tx);
        let _registered = PendingGuard {
            pending: &self.inner.pending,
            id,
        };

        let request = RpcRequest::new(id, key, method, params);
        trace!("Forwarding {}.{} as call {}", key, method, id);
        if self.inner.sender.send(Message::Request(request)).await.is_err() {
            return Err(RpcError::ChannelClosed);
        }

        let response = match self.inner.timeout {
            Some(limit) => tokio::time::timeout(limit, rx)
                .await
                .map_err(|_| RpcError::Timeout(format!("{key}.{method}")))?,
            None => rx.await,
        };

        response.map_err(|_| RpcError::ChannelClosed)?.into_result()
    }

    /// Calls a method and deserializes its result
    pub async fn call_typed<T: DeserializeOwned>(
        &self,
        key: &str,
        method: &str,
        params: Vec<Value>,
    ) -> RpcResult<T> {
        let value = self.call(key, method, params).await?;
        serde_json::from_value(value).map_err(|e| {
            RpcError::Serialization(format!("{key}.{method} returned an unexpected shape: {e}"))
        })
    }

    /// Number of calls awaiting a response
    pub fn in_flight(&self) -> usize {
        self.inner.pending.lock().len()
    }
}

/// Removes a call from the pending table however its future ends
struct PendingGuard<'a> {
    pending: &'a PendingCalls,
    id: u64,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.pending.lock().remove(&self.id);
    }
}

async fn read_responses(mut receiver: mpsc::Receiver<Message>, pending: PendingCalls) {
    while let Some(message) = receiver.recv().await {
        match message {
            Message::Response(response) => {
                let waiter = pending.lock().remove(&response.id);
                match waiter {
                    Some(waiter) => {
                        let _ = waiter.send(response);
                    }
                    None => debug!("Dropping response for unknown call {}", response.id),
                }
            }
            Message::Request(request) => {
                debug!(
                    "Client port received request {}.{}, ignoring",
                    request.key, request.method
                );
            }
        }
    }
    // Dropping the waiters fails every in-flight call with ChannelClosed
    pending.lock().clear();
}
