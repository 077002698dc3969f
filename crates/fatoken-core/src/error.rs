// crates/fatoken-core/src/error.rs
//
// Error taxonomy shared by the ledger, the RPC layer and the daemon.

use thiserror::Error;

use crate::time::Timestamp;
use crate::Amount;

/// Ledger-wide error types for the fatoken staking ledger.
///
/// Every variant is returned *before* any state is mutated, so callers can
/// treat an `Err` as "nothing happened".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Caller is neither the owner of the debited account nor a spender
    /// with a sufficient allowance.
    #[error("Not permitted")]
    Unauthorized,

    /// Liquid balance is smaller than the requested amount.
    #[error("Insufficient balance: requested {requested} but only {available} available")]
    InsufficientBalance { available: Amount, requested: Amount },

    /// Staked amount is smaller than the requested amount.
    #[error("Insufficient stake: requested {requested} but only {available} staked")]
    InsufficientStake { available: Amount, requested: Amount },

    /// The environment presented a timestamp earlier than the last accrual.
    #[error("Non-monotonic time: now {now} is before last update {last_update}")]
    NonMonotonicTime { last_update: Timestamp, now: Timestamp },

    /// Checked arithmetic overflowed while computing the named quantity.
    #[error("Arithmetic overflow computing {0}")]
    Overflow(&'static str),

    /// Malformed account identity.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Rejected genesis configuration.
    #[error("Invalid genesis: {0}")]
    Genesis(String),

    /// A persisted snapshot violates the ledger invariants.
    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Snapshot persistence error.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Stable machine-readable code, returned alongside the message in RPC
    /// error envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::Unauthorized => "UNAUTHORIZED",
            LedgerError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            LedgerError::InsufficientStake { .. } => "INSUFFICIENT_STAKE",
            LedgerError::NonMonotonicTime { .. } => "NON_MONOTONIC_TIME",
            LedgerError::Overflow(_) => "OVERFLOW",
            LedgerError::InvalidAddress(_) => "INVALID_ADDRESS",
            LedgerError::Genesis(_) => "INVALID_GENESIS",
            LedgerError::CorruptSnapshot(_) => "CORRUPT_SNAPSHOT",
            LedgerError::Serialization(_) => "SERIALIZATION",
            LedgerError::Storage(_) => "STORAGE",
        }
    }

    /// Whether the error signals a broken environment rather than a bad
    /// request. Fatal errors are not the caller's fault and should be
    /// escalated by whoever sequences operations.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LedgerError::NonMonotonicTime { .. })
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(e: serde_json::Error) -> Self {
        LedgerError::Serialization(e.to_string())
    }
}
