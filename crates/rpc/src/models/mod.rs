mod rpc_request;
mod rpc_response;

pub use rpc_request::RpcRequest;
pub use rpc_response::{RpcResponse, RpcResponseError};

/// JSON-RPC protocol version carried by every message
pub const JSON_RPC_VERSION: &str = "2.0";
