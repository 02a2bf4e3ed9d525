use crate::models::{RpcRequest, RpcResponse};
use crate::RpcError;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Frame travelling over a port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    Request(RpcRequest),
    Response(RpcResponse),
}

impl Message {
    pub fn to_json(&self) -> Result<String, RpcError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, RpcError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// One end of a bidirectional message channel between two contexts
#[derive(Debug)]
pub struct Port {
    sender: mpsc::Sender<Message>,
    receiver: mpsc::Receiver<Message>,
}

impl Port {
    pub(crate) fn split(self) -> (mpsc::Sender<Message>, mpsc::Receiver<Message>) {
        (self.sender, self.receiver)
    }
}

/// Factory for connected port pairs
pub struct MessageChannel;

impl MessageChannel {
    /// Creates two connected ports, each buffering up to `capacity` frames
    pub fn pair(capacity: usize) -> (Port, Port) {
        let capacity = capacity.max(1);
        let (left_tx, left_rx) = mpsc::channel(capacity);
        let (right_tx, right_rx) = mpsc::channel(capacity);
        (
            Port {
                sender: left_tx,
                receiver: right_rx,
            },
            Port {
                sender: right_tx,
                receiver: left_rx,
            },
        )
    }
}
