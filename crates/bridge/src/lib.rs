//! Mask Context Bridge
//!
//! Gives every execution context of the extension the same async call
//! interface to services, while only the background page runs the real
//! implementations. UI contexts hold forwarding proxies; the debugging
//! harness serves partial mocks that answer unknown methods with `null`.
//!
//! - [`ContextBridge`] - per-context service registry
//! - [`ExecutionContext`] / [`ContextDetector`] - which context we are in
//! - [`ServiceBinding`] - local implementation or remote proxy
//! - [`MockService`] / [`DefaultToNoop`] - development mocks
//! - [`MessageBus`] - broadcast notifications to all subscribers

mod bridge;
mod context;
mod messages;
mod mock;
mod service;

pub use bridge::{BridgeError, BridgeResult, ContextBridge, Registration};
pub use context::{ContextDetector, ExecutionContext, StaticContext};
pub use messages::MessageBus;
pub use mock::{DefaultToNoop, MockService};
pub use service::{RemoteService, ServiceBinding, ServiceName};

pub use mask_rpc::{MessageChannel, Port, RpcError, RpcHandler, RpcResult};
