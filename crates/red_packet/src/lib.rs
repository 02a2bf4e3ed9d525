//! # Mask Red Packet
//!
//! Creation of red packets on chain. A [`CreatePipeline`] derives the
//! `create_red_packet` arguments from [`RedPacketSettings`], submits the
//! call and publishes its [`TransactionState`] until the first
//! confirmation. When the wallet replaces the pending transaction with a
//! faster one, the [`SpeedUpDetector`] finds the replacement and the
//! pipeline confirms from its receipt instead.

pub mod abi;
pub mod params;
pub mod pipeline;
pub mod settings;
pub mod speed_up;
pub mod state;

pub use abi::{create_red_packetCall, Creation, CreationSuccess};
pub use params::{
    derive_create, generate_seed, resolve_token_address, validate, CreateParams, Derivation,
    PreparedCreate, ValidationError,
};
pub use pipeline::CreatePipeline;
pub use settings::{ChainContext, PrivateKey, RedPacketSettings};
pub use speed_up::SpeedUpDetector;
pub use state::{PipelineError, TransactionState};
