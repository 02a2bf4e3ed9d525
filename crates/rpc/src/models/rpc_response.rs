use super::JSON_RPC_VERSION;
use crate::RpcError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// RPC response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub id: u64,

    #[serde(rename = "jsonrpc")]
    pub json_rpc: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcResponseError>,
}

/// Error payload of a failed call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcResponseError {
    pub code: i32,
    pub message: String,

    /// Best-effort cause chain of the remote failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl RpcResponse {
    pub fn success(id: u64, result: Value) -> Self {
        Self {
            id,
            json_rpc: JSON_RPC_VERSION.to_string(),
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: u64, error: &RpcError) -> Self {
        Self {
            id,
            json_rpc: JSON_RPC_VERSION.to_string(),
            result: None,
            error: Some(error.to_response_error()),
        }
    }

    /// Converts into the caller-facing result. A response with neither
    /// field set resolves to `null`.
    pub fn into_result(self) -> Result<Value, RpcError> {
        match self.error {
            Some(error) => Err(error.into()),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}
