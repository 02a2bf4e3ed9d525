//! Token descriptors

use crate::types::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Token standard, numbered the way the red packet contract expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Native,
    Erc20,
    Erc721,
}

impl TokenType {
    /// Contract-side discriminant (`0` native, `1` ERC-20, `2` ERC-721)
    pub fn as_u8(&self) -> u8 {
        match self {
            TokenType::Native => 0,
            TokenType::Erc20 => 1,
            TokenType::Erc721 => 2,
        }
    }

    pub fn is_fungible(&self) -> bool {
        matches!(self, TokenType::Native | TokenType::Erc20)
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Native => write!(f, "native"),
            TokenType::Erc20 => write!(f, "erc20"),
            TokenType::Erc721 => write!(f, "erc721"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FungibleToken {
    pub token_type: TokenType,
    /// Contract address; native assets have none
    pub address: Option<Address>,
    pub decimals: u8,
    pub symbol: String,
    pub name: String,
}

impl FungibleToken {
    pub fn native(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            token_type: TokenType::Native,
            address: None,
            decimals: 18,
            symbol: symbol.into(),
            name: name.into(),
        }
    }

    pub fn erc20(
        address: Address,
        decimals: u8,
        symbol: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            token_type: TokenType::Erc20,
            address: Some(address),
            decimals,
            symbol: symbol.into(),
            name: name.into(),
        }
    }

    pub fn is_native(&self) -> bool {
        self.token_type == TokenType::Native
    }
}
