// crates/fatoken-ledger/src/accrual.rs
//
// Reward accrual engine.
//
// Rewards are streamed to the staking pool at a fixed rate per second and
// shared pro-rata by stake, using a cumulative reward-per-share counter:
//
//   increment          = floor(rate * elapsed / total_staked)
//   reward_per_share  += increment
//   owed(account)      = staked * (reward_per_share - last_reward_per_share)
//
// While nobody is staking the counter is frozen and the clock simply moves
// forward, so the first staker after an idle period is owed nothing for it.
// The flooring remainder (`dust`) is tallied but never distributed.

use fatoken_core::error::LedgerError;
use fatoken_core::time::Timestamp;

use crate::account::AccountRecord;
use crate::accumulator::GlobalAccumulator;
use crate::token::{self, Amount};

/// What a single `accrue` step did to the accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Accrual {
    /// Seconds since the previous accrual.
    pub elapsed: u64,
    /// Amount added to `reward_per_share`.
    pub increment: Amount,
    /// Reward lost to flooring in this step.
    pub dust: Amount,
}

/// Per-share increment and flooring remainder for `elapsed` seconds of
/// emission at `rate` over a pool of `total_staked`.
///
/// An empty pool yields `(0, 0)`: no stake means nothing is owed, and the
/// emission for that interval is simply never created.
pub fn reward_per_share_increment(
    rate: Amount,
    elapsed: u64,
    total_staked: Amount,
) -> Result<(Amount, Amount), LedgerError> {
    if total_staked == 0 || elapsed == 0 {
        return Ok((0, 0));
    }
    let reward = token::mul(rate, Amount::from(elapsed), "pool reward")?;
    Ok((reward / total_staked, reward % total_staked))
}

/// Bring the accumulator forward to `now`.
///
/// Rejects a `now` earlier than `last_update_time` without touching the
/// accumulator. Calling twice with the same `now` makes the second call a
/// no-op.
pub fn accrue(
    acc: &mut GlobalAccumulator,
    now: Timestamp,
    rate: Amount,
) -> Result<Accrual, LedgerError> {
    let elapsed = now
        .checked_elapsed_since(acc.last_update_time)
        .ok_or(LedgerError::NonMonotonicTime {
            last_update: acc.last_update_time,
            now,
        })?;

    let (increment, dust) = reward_per_share_increment(rate, elapsed, acc.total_staked)?;
    let reward_per_share = token::add(acc.reward_per_share, increment, "reward per share")?;

    acc.reward_per_share = reward_per_share;
    acc.dust = acc.dust.saturating_add(dust);
    acc.last_update_time = now;

    Ok(Accrual {
        elapsed,
        increment,
        dust,
    })
}

/// Reward owed to a position of `staked` whose last snapshot was
/// `last_reward_per_share`, against the current `reward_per_share`.
pub fn pending_reward(
    staked: Amount,
    reward_per_share: Amount,
    last_reward_per_share: Amount,
) -> Result<Amount, LedgerError> {
    let delta = token::sub(
        reward_per_share,
        last_reward_per_share,
        "reward per share since last settlement",
    )?;
    token::mul(staked, delta, "pending reward")
}

/// Accrue to `now`, then fold the account's pending reward into its balance
/// and advance its snapshot. The realized reward is issued: it is added to
/// `total_supply` and `rewards_issued` as well.
///
/// Returns the realized reward. On error neither argument is modified.
pub fn settle(
    acc: &mut GlobalAccumulator,
    account: &mut AccountRecord,
    now: Timestamp,
    rate: Amount,
) -> Result<Amount, LedgerError> {
    let mut next = *acc;
    accrue(&mut next, now, rate)?;

    let owed = pending_reward(
        account.staked,
        next.reward_per_share,
        account.last_reward_per_share,
    )?;
    let balance = token::add(account.balance, owed, "balance")?;
    next.total_supply = token::add(next.total_supply, owed, "total supply")?;
    next.rewards_issued = token::add(next.rewards_issued, owed, "rewards issued")?;

    *acc = next;
    account.balance = balance;
    account.last_reward_per_share = next.reward_per_share;
    Ok(owed)
}
