// crates/fatoken-ledger/src/lib.rs
//
// fatoken-ledger: balances, allowances, staking and time-proportional
// staking rewards for the fatoken staking ledger.
//
// All monetary values are integer `Amount`s. Rewards accrue through a
// reward-per-share accumulator and are realized into an account's balance
// whenever that account is settled.

pub mod account;
pub mod accrual;
pub mod accumulator;
pub mod genesis;
pub mod ledger;
pub mod query;
pub mod token;

// Re-export key types for ergonomic access from downstream crates.
pub use account::AccountRecord;
pub use accrual::{accrue, pending_reward, reward_per_share_increment, settle, Accrual};
pub use accumulator::GlobalAccumulator;
pub use genesis::GenesisConfig;
pub use ledger::{Ledger, OpContext, Receipt};
pub use query::StorageSnapshot;
pub use token::{Amount, DEFAULT_GENESIS_SUPPLY, REWARD_RATE_PER_SECOND};
