// crates/fatoken-core/src/identity.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Longest identity string accepted (Tezos-style `tz1...` hashes are 36 chars,
/// contract addresses with entrypoints run longer).
pub const MAX_ADDRESS_LEN: usize = 64;

/// Identity of a ledger participant.
///
/// The ledger never authenticates an address; whoever sequences operations
/// vouches for the caller. An address is any non-empty printable string
/// without whitespace, compared byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Validate and wrap an identity string.
    pub fn new(raw: impl Into<String>) -> Result<Self, LedgerError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(LedgerError::InvalidAddress("empty address".to_string()));
        }
        if raw.len() > MAX_ADDRESS_LEN {
            return Err(LedgerError::InvalidAddress(format!(
                "address is {} bytes, limit is {}",
                raw.len(),
                MAX_ADDRESS_LEN
            )));
        }
        if raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(LedgerError::InvalidAddress(format!(
                "address {:?} contains whitespace or control characters",
                raw
            )));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::new(s)
    }
}

impl TryFrom<String> for Address {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Address::new(value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}
