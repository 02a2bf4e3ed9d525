//! Address parsing on top of the alloy primitives

pub use alloy_primitives::{keccak256, Address, Bytes, Log, LogData, B256, U256};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("Not a valid address.")]
    Invalid,

    #[error("address checksum mismatch")]
    ChecksumMismatch,
}

/// Parses a hex address.
///
/// All-lowercase and all-uppercase input is taken as is. Mixed case must
/// carry a valid EIP-55 checksum.
pub fn parse_address(s: &str) -> Result<Address, AddressError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let mixed_case = digits.bytes().any(|c| c.is_ascii_lowercase())
        && digits.bytes().any(|c| c.is_ascii_uppercase());
    if !mixed_case {
        return s.parse().map_err(|_| AddressError::Invalid);
    }
    s.parse::<Address>().map_err(|_| AddressError::Invalid)?;
    Address::parse_checksummed(s, None).map_err(|_| AddressError::ChecksumMismatch)
}

pub fn is_valid_address(s: &str) -> bool {
    parse_address(s).is_ok()
}

/// Case-insensitive address comparison on textual input; anything that
/// fails to parse never matches.
pub fn is_same_address(a: &str, b: &str) -> bool {
    match (parse_address(a), parse_address(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
