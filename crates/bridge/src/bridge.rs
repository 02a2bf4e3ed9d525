use crate::context::{ContextDetector, ExecutionContext};
use crate::mock::{DefaultToNoop, MockService};
use crate::service::{RemoteService, ServiceBinding, ServiceName};
use mask_config::BridgeConfig;
use mask_rpc::{MessageChannel, Port, RpcClient, RpcError, RpcHandler, RpcServer};
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Bridge errors
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Failed to load service {name}: {reason}")]
    LoadFailed { name: ServiceName, reason: String },

    #[error("No port to the background page in the {0} context")]
    NotConnected(ExecutionContext),

    #[error("Only the background page accepts connections, this is the {0} context")]
    NotPrivileged(ExecutionContext),

    #[error("Service {0} is not registered")]
    ServiceUnavailable(ServiceName),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

pub type BridgeResult<T> = Result<T, BridgeError>;

/// Outcome of [`ContextBridge::register_service`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// Real implementation loaded and exposed (background page)
    Local,
    /// Forwarding proxy installed (content script, options page)
    Proxy,
    /// Proxy installed over the loopback, backed by the mock
    Mocked,
    /// Unknown context, nothing registered
    Skipped,
}

/// Per-context service registry.
///
/// Created once per context at start-up and torn down with
/// [`ContextBridge::shutdown`] (or on drop) when the context unloads.
/// Must be constructed inside a tokio runtime.
pub struct ContextBridge {
    context: ExecutionContext,
    registry: RwLock<BTreeMap<ServiceName, ServiceBinding>>,
    server: RpcServer,
    client: Option<RpcClient>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl ContextBridge {
    /// Creates the bridge for the detected context.
    ///
    /// `upstream` is the port towards the background page; it is only used
    /// by the content script and the options page. The debugging harness
    /// talks to its own loopback server instead.
    pub fn new(
        detector: &dyn ContextDetector,
        upstream: Option<Port>,
        config: &BridgeConfig,
    ) -> Self {
        let context = detector.current();
        let timeout = config.call_timeout_ms.map(Duration::from_millis);
        let server = RpcServer::new();
        let mut tasks = Vec::new();

        let client = match context {
            ExecutionContext::Content | ExecutionContext::Options => {
                upstream.map(|port| RpcClient::connect(port, timeout))
            }
            ExecutionContext::Debugging => {
                let (client_port, server_port) = MessageChannel::pair(config.channel_capacity);
                tasks.push(server.serve(server_port));
                Some(RpcClient::connect(client_port, timeout))
            }
            ExecutionContext::Background | ExecutionContext::Unknown => None,
        };

        Self {
            context,
            registry: RwLock::new(BTreeMap::new()),
            server,
            client,
            tasks: Mutex::new(tasks),
        }
    }

    pub fn context(&self) -> ExecutionContext {
        self.context
    }

    /// Publishes the binding for `name` in this context.
    ///
    /// - background: awaits `loader`, keeps the implementation locally and
    ///   exposes it to other contexts under `name`
    /// - content / options: installs a proxy forwarding to the background page
    /// - debugging: installs a proxy and serves `mock` behind it, with
    ///   missing methods resolving to `null`
    /// - unknown: logs a warning and registers nothing
    ///
    /// `loader` is only invoked in the background page. Registering a name
    /// again replaces the previous binding.
    pub async fn register_service<F, Fut>(
        &self,
        name: ServiceName,
        loader: F,
        mock: Option<MockService>,
    ) -> BridgeResult<Registration>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<Arc<dyn RpcHandler>>>,
    {
        match self.context {
            ExecutionContext::Background => {
                info!("Service {} registered in {} page", name, self.context);
                let loaded = loader().await.map_err(|e| BridgeError::LoadFailed {
                    name,
                    reason: format!("{e:#}"),
                })?;
                self.registry
                    .write()
                    .insert(name, ServiceBinding::Local(loaded.clone()));
                self.server.expose(name.as_str(), loaded);
                Ok(Registration::Local)
            }
            ExecutionContext::Content | ExecutionContext::Options | ExecutionContext::Debugging => {
                let client = self
                    .client
                    .clone()
                    .ok_or(BridgeError::NotConnected(self.context))?;
                info!("Service {} registered in {} context", name, self.context);
                self.registry.write().insert(
                    name,
                    ServiceBinding::Remote(RemoteService::new(name, client)),
                );

                if self.context == ExecutionContext::Debugging {
                    info!("Service {} mocked", name);
                    self.server
                        .expose(name.as_str(), Arc::new(DefaultToNoop::new(mock)));
                    return Ok(Registration::Mocked);
                }
                Ok(Registration::Proxy)
            }
            ExecutionContext::Unknown => {
                warn!("Unknown environment, service {} not registered", name);
                Ok(Registration::Skipped)
            }
        }
    }

    /// Answers calls from another context arriving on `port`
    pub fn accept(&self, port: Port) -> BridgeResult<()> {
        if !self.context.is_privileged() {
            return Err(BridgeError::NotPrivileged(self.context));
        }
        let task = self.server.serve(port);
        self.tasks.lock().push(task);
        Ok(())
    }

    pub fn service(&self, name: ServiceName) -> Option<ServiceBinding> {
        self.registry.read().get(&name).cloned()
    }

    /// Like [`ContextBridge::service`] but fails when nothing is registered
    pub fn require(&self, name: ServiceName) -> BridgeResult<ServiceBinding> {
        self.service(name)
            .ok_or(BridgeError::ServiceUnavailable(name))
    }

    pub fn services(&self) -> Vec<ServiceName> {
        self.registry.read().keys().copied().collect()
    }

    /// Stops serving other contexts and forgets every binding
    pub fn shutdown(&self) {
        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
        self.server.clear();
        self.registry.write().clear();
        info!("Bridge for the {} context shut down", self.context);
    }
}

impl Drop for ContextBridge {
    fn drop(&mut self) {
        for task in self.tasks.get_mut().drain(..) {
            task.abort();
        }
    }
}
