// crates/fatoken-ledger/src/token.rs
//
// Token constants and checked arithmetic helpers.
//
// All accounting uses integer `Amount` (u128). Any operation whose
// intermediate value would overflow is rejected before state is touched.

use fatoken_core::error::LedgerError;

pub use fatoken_core::Amount;

/// Reward issued to the staking pool per second, shared pro-rata among
/// stakers. Protocol constant; fixed at genesis.
pub const REWARD_RATE_PER_SECOND: Amount = 1_000_000;

/// Supply minted to the issuer at genesis unless configured otherwise.
pub const DEFAULT_GENESIS_SUPPLY: Amount = 1_000;

/// `a + b`, naming `what` in the overflow error.
pub(crate) fn add(a: Amount, b: Amount, what: &'static str) -> Result<Amount, LedgerError> {
    a.checked_add(b).ok_or(LedgerError::Overflow(what))
}

/// `a - b`, naming `what` in the overflow error. Callers check sufficiency
/// first and map shortfalls to the user-facing error; this only guards
/// against internal inconsistency.
pub(crate) fn sub(a: Amount, b: Amount, what: &'static str) -> Result<Amount, LedgerError> {
    a.checked_sub(b).ok_or(LedgerError::Overflow(what))
}

/// `a * b`, naming `what` in the overflow error.
pub(crate) fn mul(a: Amount, b: Amount, what: &'static str) -> Result<Amount, LedgerError> {
    a.checked_mul(b).ok_or(LedgerError::Overflow(what))
}
