use super::JSON_RPC_VERSION;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// RPC request addressed to a service key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Request ID, echoed by the response
    pub id: u64,

    /// JSON-RPC version
    #[serde(rename = "jsonrpc")]
    pub json_rpc: String,

    /// Key the target service was exposed under
    pub key: String,

    /// Method name
    pub method: String,

    /// Positional parameters
    #[serde(default)]
    pub params: Vec<Value>,
}

impl RpcRequest {
    pub fn new(id: u64, key: impl Into<String>, method: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            id,
            json_rpc: JSON_RPC_VERSION.to_string(),
            key: key.into(),
            method: method.into(),
            params,
        }
    }
}
