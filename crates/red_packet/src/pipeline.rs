use mask_contract::{
    Address, ChainProvider, ContractCaller, ContractError, ContractResult, TransactionConfig,
    TransactionEvent, TransactionEvents, TransactionReceipt, B256,
};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::abi::{create_red_packetCall, Creation, CreationSuccess};
use crate::params::{derive_create, Derivation};
use crate::settings::{ChainContext, RedPacketSettings};
use crate::speed_up::SpeedUpDetector;
use crate::state::{PipelineError, TransactionState};

struct Inputs {
    settings: RedPacketSettings,
    context: ChainContext,
    contract: Option<Arc<dyn ContractCaller>>,
}

enum Step {
    Continue,
    Resolved,
    Rejected(ContractError),
}

struct Shared {
    state: watch::Sender<TransactionState>,
    inputs: RwLock<Inputs>,
    derivation: RwLock<Derivation>,
    generation: AtomicU64,
    create_settings: RwLock<Option<RedPacketSettings>>,
    baseline: RwLock<Option<u64>>,
}

impl Shared {
    fn set_state(&self, state: TransactionState) {
        debug!("Red packet creation {}", state);
        self.state.send_replace(state);
    }

    fn apply(&self, event: TransactionEvent) -> Step {
        match event {
            TransactionEvent::TransactionHash(hash) => {
                self.set_state(TransactionState::WaitingForConfirmation { hash: Some(hash) });
                Step::Continue
            }
            TransactionEvent::Receipt(receipt) => {
                self.set_state(TransactionState::Confirmed { no: 0, receipt });
                Step::Continue
            }
            TransactionEvent::Confirmation { no, receipt } => {
                self.set_state(TransactionState::Confirmed { no, receipt });
                Step::Resolved
            }
            TransactionEvent::Error(error) => {
                warn!("Red packet submission failed: {}", error);
                self.set_state(TransactionState::Failed {
                    error: PipelineError::Submission(error.clone()),
                });
                Step::Rejected(error)
            }
        }
    }
}

/// Creation of one red packet, from parameter derivation to confirmation.
///
/// State changes are published on a watch channel (see
/// [`CreatePipeline::subscribe`]). Inputs are explicit: settings, chain
/// context and contract handle are swapped through the setters, each of
/// which re-derives the call parameters.
pub struct CreatePipeline {
    shared: Arc<Shared>,
}

impl CreatePipeline {
    pub fn new(settings: RedPacketSettings, context: ChainContext) -> Self {
        let (state, _) = watch::channel(TransactionState::Unknown);
        Self {
            shared: Arc::new(Shared {
                state,
                inputs: RwLock::new(Inputs {
                    settings,
                    context,
                    contract: None,
                }),
                derivation: RwLock::new(Derivation::Unavailable),
                generation: AtomicU64::new(0),
                create_settings: RwLock::new(None),
                baseline: RwLock::new(None),
            }),
        }
    }

    pub fn state(&self) -> TransactionState {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<TransactionState> {
        self.shared.state.subscribe()
    }

    /// Settings of the last submission that got past validation
    pub fn create_settings(&self) -> Option<RedPacketSettings> {
        self.shared.create_settings.read().clone()
    }

    /// Latest retained derivation
    pub fn derivation(&self) -> Derivation {
        self.shared.derivation.read().clone()
    }

    /// `CreationSuccess` of the confirmed receipt, emitted by the current
    /// contract
    pub fn creation(&self) -> Option<Creation> {
        let contract = self.contract_address()?;
        match &*self.shared.state.borrow() {
            TransactionState::Confirmed { receipt, .. } => receipt
                .decode_event::<CreationSuccess>(contract)
                .map(|event| Creation::from(&event)),
            _ => None,
        }
    }

    pub fn baseline_block(&self) -> Option<u64> {
        *self.shared.baseline.read()
    }

    pub async fn set_settings(&self, settings: RedPacketSettings) -> Derivation {
        self.shared.inputs.write().settings = settings;
        self.refresh_params().await
    }

    pub async fn set_context(&self, context: ChainContext) -> Derivation {
        self.shared.inputs.write().context = context;
        self.refresh_params().await
    }

    pub async fn set_contract(&self, contract: Option<Arc<dyn ContractCaller>>) -> Derivation {
        self.shared.inputs.write().contract = contract;
        self.refresh_params().await
    }

    /// Records the chain head once; later calls return the same block
    pub async fn track(&self, provider: &dyn ChainProvider) -> ContractResult<u64> {
        if let Some(baseline) = self.baseline_block() {
            return Ok(baseline);
        }
        let head = provider.block_number().await?;
        let baseline = *self.shared.baseline.write().get_or_insert(head);
        info!("Tracking red packet creation from block {}", baseline);
        Ok(baseline)
    }

    /// Derives call parameters from the current inputs.
    ///
    /// Only the most recently started derivation is retained; the result of
    /// one overtaken by a newer call is returned but discarded. Invalid
    /// settings move the state to `Failed`.
    pub async fn refresh_params(&self) -> Derivation {
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (settings, context, contract) = {
            let inputs = self.shared.inputs.read();
            (inputs.settings.clone(), inputs.context.clone(), inputs.contract.clone())
        };

        let derivation = match contract {
            Some(contract) => derive_create(&settings, contract.as_ref(), &context).await,
            None => Derivation::Unavailable,
        };

        let mut retained = self.shared.derivation.write();
        if self.shared.generation.load(Ordering::SeqCst) != generation {
            debug!("Discarding derivation {} overtaken by a newer one", generation);
            return derivation;
        }
        if let Derivation::Invalid(error) = &derivation {
            self.shared.set_state(TransactionState::Failed {
                error: PipelineError::Validation(error.clone()),
            });
        }
        *retained = derivation.clone();
        derivation
    }

    /// Submits the derived call and follows it until the first confirmation.
    ///
    /// Missing inputs or parameters reset the state to `Unknown`; invalid
    /// parameters and gas estimation failures end in `Failed` without
    /// submitting. All of these return `Ok`. A submission error rejects
    /// with [`PipelineError::Submission`]. Confirmations after the first keep
    /// updating the state in the background.
    pub async fn create(&self) -> Result<(), PipelineError> {
        let (settings, context, contract) = {
            let inputs = self.shared.inputs.read();
            (inputs.settings.clone(), inputs.context.clone(), inputs.contract.clone())
        };
        let derivation = self.shared.derivation.read().clone();

        let (contract, prepared) = match (settings.token.as_ref(), contract, derivation) {
            (Some(_), Some(contract), Derivation::Ready(prepared)) => (contract, prepared),
            (Some(_), Some(_), Derivation::Invalid(error)) => {
                self.shared.set_state(TransactionState::Failed { error: error.into() });
                return Ok(());
            }
            _ => {
                self.shared.set_state(TransactionState::Unknown);
                return Ok(());
            }
        };

        let call = match prepared.params.to_method_call() {
            Ok(call) => call,
            Err(error) => {
                self.shared.set_state(TransactionState::Failed { error: error.into() });
                return Ok(());
            }
        };
        if let Some(error) = prepared.gas_error {
            self.shared.set_state(TransactionState::Failed {
                error: PipelineError::Estimation(error),
            });
            return Ok(());
        }
        let value = match prepared.params.value() {
            Ok(value) => value,
            Err(error) => {
                self.shared.set_state(TransactionState::Failed { error: error.into() });
                return Ok(());
            }
        };

        *self.shared.create_settings.write() = Some(settings);
        self.shared
            .set_state(TransactionState::WaitingForConfirmation { hash: None });

        let config = TransactionConfig {
            from: context.account,
            value,
            gas: prepared.gas,
            gas_price: context.gas_price,
        };
        let mut events = contract.send(&call, &config).await;

        loop {
            let Some(event) = events.next().await else {
                let error = ContractError::Dropped;
                self.shared.set_state(TransactionState::Failed {
                    error: PipelineError::Submission(error.clone()),
                });
                return Err(PipelineError::Submission(error));
            };
            match self.shared.apply(event) {
                Step::Continue => {}
                Step::Resolved => {
                    self.follow(events);
                    return Ok(());
                }
                Step::Rejected(error) => return Err(PipelineError::Submission(error)),
            }
        }
    }

    fn follow(&self, mut events: TransactionEvents) {
        let shared = self.shared.clone();
        tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Step::Rejected(_) = shared.apply(event) {
                    break;
                }
            }
        });
    }

    /// Back to `Unknown`; an in-flight submission keeps running
    pub fn reset(&self) {
        self.shared.set_state(TransactionState::Unknown);
    }

    fn contract_address(&self) -> Option<Address> {
        self.shared
            .inputs
            .read()
            .contract
            .as_ref()
            .map(|contract| contract.address())
    }

    /// Detector over the blocks since [`CreatePipeline::track`] was called
    pub fn speed_up_detector(&self) -> Option<SpeedUpDetector> {
        let baseline = self.baseline_block()?;
        let contract = self.contract_address()?;
        let account = self.shared.inputs.read().context.account;
        Some(SpeedUpDetector::new(account, contract, baseline))
    }

    /// Confirms the creation from the receipt of a replacing transaction.
    ///
    /// Looks for a `CreationSuccess` log emitted by the contract. Returns
    /// `false` and leaves the state alone when the receipt is missing or
    /// holds no such log.
    pub async fn reconcile_speed_up(
        &self,
        provider: &dyn ChainProvider,
        hash: B256,
    ) -> ContractResult<bool> {
        let Some(contract) = self.contract_address() else {
            return Ok(false);
        };
        let Some(receipt) = provider.transaction_receipt(hash).await? else {
            return Ok(false);
        };
        if receipt.decode_event::<CreationSuccess>(contract).is_none() {
            debug!("Receipt {} has no CreationSuccess from {}", hash, contract);
            return Ok(false);
        }

        info!("Red packet creation replaced by {}", receipt.transaction_hash);
        // Replacements report no confirmation count.
        self.shared.set_state(TransactionState::Confirmed {
            no: 0,
            receipt: TransactionReceipt {
                status: true,
                ..receipt
            },
        });
        Ok(true)
    }

    /// One detection round: while a submission is pending, looks for a
    /// replacement carrying the same public key and reconciles it
    pub async fn check_speed_up(&self, provider: &dyn ChainProvider) -> ContractResult<bool> {
        let state = self.state();
        if !matches!(state, TransactionState::WaitingForConfirmation { .. }) {
            return Ok(false);
        }
        let Some(detector) = self.speed_up_detector() else {
            return Ok(false);
        };
        let public_key = self.shared.inputs.read().settings.public_key;
        let replacement = detector
            .scan(provider, state.pending_hash(), move |call: &create_red_packetCall| {
                call._public_key == public_key
            })
            .await?;
        match replacement {
            Some(tx) => self.reconcile_speed_up(provider, tx.hash).await,
            None => Ok(false),
        }
    }

    /// Polls for replacements every `interval` until the creation is
    /// confirmed or failed, or the pipeline is dropped
    pub fn spawn_speed_up_monitor(
        &self,
        provider: Arc<dyn ChainProvider>,
        interval: Duration,
    ) -> JoinHandle<()> {
        let shared = Arc::downgrade(&self.shared);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let Some(shared) = shared.upgrade() else {
                    break;
                };
                let pipeline = CreatePipeline { shared };
                if pipeline.state().is_terminal() {
                    break;
                }
                match pipeline.check_speed_up(provider.as_ref()).await {
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(e) => debug!("Speed-up check failed: {}", e),
                }
            }
        })
    }
}
