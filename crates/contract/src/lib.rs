//! # Mask Contract
//!
//! Chain-facing building blocks shared by the Mask plugins: address
//! parsing on top of the alloy primitives, contract call handles with
//! their transaction event stream, and gas price tiers.
//!
//! ## Example
//!
//! ```rust
//! use mask_contract::parse_address;
//!
//! let owner = parse_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
//! assert_eq!(owner.to_string(), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
//! ```

pub mod caller;
pub mod gas;
pub mod token;
pub mod transaction;
pub mod types;

pub use caller::{ChainProvider, ContractCaller, ContractError, ContractResult, MethodCall};
pub use gas::{gas_options, GasOption, GasOptionEntry, GasPriceDict, GasPriceOracle};
pub use token::{FungibleToken, TokenType};
pub use transaction::{
    TransactionConfig, TransactionEvent, TransactionEventSender, TransactionEvents,
    TransactionInfo, TransactionReceipt,
};
pub use types::{
    is_same_address, is_valid_address, keccak256, parse_address, Address, AddressError, Bytes,
    Log, LogData, B256, U256,
};
