// crates/fatoken-core/src/lib.rs
//
// fatoken-core: core types shared by every fatoken crate.
//
// This is the leaf crate of the workspace. It defines the error taxonomy,
// the participant identity type, whole-second timestamps and the clock
// abstraction the sequencer uses to stamp operations.

pub mod error;
pub mod identity;
pub mod time;
pub mod traits;

/// Token quantity. Balances, stakes, allowances and the reward-per-share
/// accumulator all use this width.
pub type Amount = u128;

// Re-export key types for ergonomic access from downstream crates.
pub use error::LedgerError;
pub use identity::Address;
pub use time::Timestamp;
pub use traits::{Clock, ManualClock, MonotonicClock, SystemClock};
