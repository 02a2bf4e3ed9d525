use crate::models::RpcResponseError;
use thiserror::Error;

/// JSON-RPC 2.0 error codes used on the wire
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    pub const APPLICATION_ERROR: i32 = -32000;
}

/// Errors raised by a call, locally or on the remote side
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// Error reported by the other context
    #[error("{message}")]
    Remote {
        code: i32,
        message: String,
        stack: Option<String>,
    },

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Message channel closed")]
    ChannelClosed,

    #[error("Call to {0} timed out")]
    Timeout(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// Failure raised by the service implementation itself
    #[error("{0}")]
    Application(String),
}

impl RpcError {
    /// Wire code for this error
    pub fn code(&self) -> i32 {
        match self {
            RpcError::Remote { code, .. } => *code,
            RpcError::MethodNotFound(_) => error_codes::METHOD_NOT_FOUND,
            RpcError::InvalidParams(_) => error_codes::INVALID_PARAMS,
            RpcError::Serialization(_) => error_codes::PARSE_ERROR,
            RpcError::ChannelClosed | RpcError::Timeout(_) | RpcError::Internal(_) => {
                error_codes::INTERNAL_ERROR
            }
            RpcError::Application(_) => error_codes::APPLICATION_ERROR,
        }
    }

    /// Wraps any error raised by a service, keeping its source chain as the stack text
    pub fn application<E: std::error::Error + ?Sized>(error: &E) -> Self {
        RpcError::Application(render_chain(error))
    }

    pub fn to_response_error(&self) -> RpcResponseError {
        match self {
            RpcError::Remote {
                code,
                message,
                stack,
            } => RpcResponseError {
                code: *code,
                message: message.clone(),
                stack: stack.clone(),
            },
            RpcError::Application(text) => {
                let (message, stack) = match text.split_once('\n') {
                    Some((head, rest)) => (head.to_string(), Some(rest.to_string())),
                    None => (text.clone(), None),
                };
                RpcResponseError {
                    code: self.code(),
                    message,
                    stack,
                }
            }
            other => RpcResponseError {
                code: other.code(),
                message: other.to_string(),
                stack: None,
            },
        }
    }
}

impl From<RpcResponseError> for RpcError {
    fn from(error: RpcResponseError) -> Self {
        RpcError::Remote {
            code: error.code,
            message: error.message,
            stack: error.stack,
        }
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(error: serde_json::Error) -> Self {
        RpcError::Serialization(error.to_string())
    }
}

fn render_chain<E: std::error::Error + ?Sized>(error: &E) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str("\n    caused by: ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
