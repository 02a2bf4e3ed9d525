//! Parameter derivation for `create_red_packet`

use mask_contract::{
    keccak256, Address, ContractCaller, ContractError, FungibleToken, MethodCall, TokenType,
    TransactionConfig, B256, U256,
};
use rand::Rng;
use thiserror::Error;
use tracing::debug;

use crate::abi::create_red_packetCall;
use crate::settings::{ChainContext, RedPacketSettings};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid total amount: {0}")]
    InvalidTotal(String),

    #[error("At least [number of red packets] tokens to your red packet.")]
    InsufficientTotal,

    #[error("At least 1 person should be able to claim the red packet.")]
    NoShares,

    #[error("Token not supported")]
    UnsupportedToken,
}

/// Arguments of one `create_red_packet` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateParams {
    pub public_key: Address,
    pub shares: i64,
    pub is_random: bool,
    pub duration: u64,
    /// Keccak-256 of a locally generated random string
    pub seed: B256,
    pub message: String,
    pub name: String,
    pub token_type: TokenType,
    pub token_address: Address,
    pub total: String,
}

impl CreateParams {
    /// Total as a uint256; decimal digits only
    fn total_amount(&self) -> Result<U256, ValidationError> {
        let invalid = || ValidationError::InvalidTotal(self.total.clone());
        if self.total.is_empty() || !self.total.bytes().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        U256::from_str_radix(&self.total, 10).map_err(|_| invalid())
    }

    /// Validated arguments in contract order
    pub fn to_call(&self) -> Result<create_red_packetCall, ValidationError> {
        validate(self)?;
        Ok(create_red_packetCall {
            _public_key: self.public_key,
            _number: U256::from(self.shares.unsigned_abs()),
            _ifrandom: self.is_random,
            _duration: U256::from(self.duration),
            _seed: self.seed,
            _message: self.message.clone(),
            _name: self.name.clone(),
            _token_type: U256::from(self.token_type.as_u8()),
            _token_addr: self.token_address,
            _total_tokens: self.total_amount()?,
        })
    }

    pub fn to_method_call(&self) -> Result<MethodCall, ValidationError> {
        Ok(MethodCall::new(&self.to_call()?))
    }

    /// Native value attached to the call: the total for native tokens,
    /// otherwise zero
    pub fn value(&self) -> Result<U256, ValidationError> {
        if self.token_type == TokenType::Native {
            self.total_amount()
        } else {
            Ok(U256::ZERO)
        }
    }
}

/// Checks the total, then the share count, then the token type
pub fn validate(params: &CreateParams) -> Result<(), ValidationError> {
    let total = params.total_amount()?;
    if params.shares > 0 && total < U256::from(params.shares.unsigned_abs()) {
        return Err(ValidationError::InsufficientTotal);
    }
    if params.shares <= 0 {
        return Err(ValidationError::NoShares);
    }
    if !matches!(params.token_type, TokenType::Native | TokenType::Erc20) {
        return Err(ValidationError::UnsupportedToken);
    }
    Ok(())
}

/// Hash of a fresh random string
pub fn generate_seed<R: Rng>(rng: &mut R) -> B256 {
    let seed = rng.gen::<f64>().to_string();
    keccak256(seed.as_bytes())
}

/// Contract-side address of `token`; `None` when an ERC token lacks one
pub fn resolve_token_address(token: &FungibleToken, native_token_address: Address) -> Option<Address> {
    match token.token_type {
        TokenType::Native => Some(native_token_address),
        _ => token.address,
    }
}

/// Parameters ready for submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCreate {
    pub params: CreateParams,
    pub gas: Option<u64>,
    /// Estimation failure, reported only once submission is attempted
    pub gas_error: Option<ContractError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Derivation {
    Ready(PreparedCreate),
    Invalid(ValidationError),
    /// Settings, token, token address or contract missing
    Unavailable,
}

impl Derivation {
    pub fn prepared(&self) -> Option<&PreparedCreate> {
        match self {
            Derivation::Ready(prepared) => Some(prepared),
            _ => None,
        }
    }
}

/// Builds and validates the call parameters, then estimates gas.
///
/// Every call draws a new seed.
pub async fn derive_create(
    settings: &RedPacketSettings,
    contract: &dyn ContractCaller,
    context: &ChainContext,
) -> Derivation {
    let Some(token) = settings.token.as_ref() else {
        return Derivation::Unavailable;
    };
    let Some(token_address) = resolve_token_address(token, context.native_token_address) else {
        return Derivation::Unavailable;
    };

    let params = CreateParams {
        public_key: settings.public_key,
        shares: settings.shares,
        is_random: settings.is_random,
        duration: settings.duration,
        seed: generate_seed(&mut rand::thread_rng()),
        message: settings.message.clone(),
        name: settings.name.clone(),
        token_type: token.token_type,
        token_address,
        total: settings.total.clone(),
    };

    let (call, value) = match params.to_method_call().and_then(|call| Ok((call, params.value()?))) {
        Ok(prepared) => prepared,
        Err(e) => return Derivation::Invalid(e),
    };

    let config = TransactionConfig {
        from: context.account,
        value,
        gas: None,
        gas_price: context.gas_price,
    };
    let (gas, gas_error) = match contract.estimate_gas(&call, &config).await {
        Ok(gas) => (Some(gas), None),
        Err(e) => {
            debug!("Gas estimation for {} failed: {}", call.name(), e);
            (None, Some(e))
        }
    };

    Derivation::Ready(PreparedCreate {
        params,
        gas,
        gas_error,
    })
}
