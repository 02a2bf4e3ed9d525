//! Mask RPC Library
//!
//! Request/response calls between two execution contexts of the extension.
//! One side exposes [`RpcHandler`]s under string keys with an [`RpcServer`],
//! the other side forwards calls through an [`RpcClient`]. Both ends talk
//! over a [`Port`] obtained from [`MessageChannel::pair`].

pub mod models;
mod channel;
mod client;
mod rpc_error;
mod server;

pub use channel::{Message, MessageChannel, Port};
pub use client::RpcClient;
pub use rpc_error::{error_codes, RpcError};
pub use server::RpcServer;

// Re-export commonly used types
pub use models::{RpcRequest, RpcResponse, RpcResponseError};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// Result type for RPC operations
pub type RpcResult<T> = std::result::Result<T, RpcError>;

/// A callable capability set exposed under a key.
///
/// Methods are dispatched by name with positional JSON arguments.
#[async_trait]
pub trait RpcHandler: Send + Sync {
    async fn call(&self, method: &str, params: Vec<Value>) -> RpcResult<Value>;
}

/// Deserializes the positional argument at `index`.
///
/// A missing argument is read as `null`, so optional parameters can be
/// omitted by the caller.
pub fn param<T: DeserializeOwned>(params: &[Value], index: usize) -> RpcResult<T> {
    let value = params.get(index).cloned().unwrap_or(Value::Null);
    serde_json::from_value(value)
        .map_err(|e| RpcError::InvalidParams(format!("argument {index}: {e}")))
}

/// Serializes a handler result.
pub fn to_value<T: Serialize>(value: T) -> RpcResult<Value> {
    serde_json::to_value(value).map_err(|e| RpcError::Serialization(e.to_string()))
}
