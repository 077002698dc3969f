// crates/fatoken-ledger/src/accumulator.rs

use serde::{Deserialize, Serialize};

use fatoken_core::time::Timestamp;

use crate::token::Amount;

/// Process-wide staking accumulator.
///
/// One instance per ledger, created at genesis. `reward_per_share` only
/// ever grows, and only while `total_staked > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalAccumulator {
    /// Sum of every account's `balance + staked`. Grows when settlement
    /// issues rewards.
    pub total_supply: Amount,
    /// Sum of every account's `staked`.
    pub total_staked: Amount,
    /// Cumulative reward issued per unit staked since genesis.
    pub reward_per_share: Amount,
    /// Time of the most recent accrual.
    pub last_update_time: Timestamp,
    /// Cumulative rewards realized into balances since genesis.
    #[serde(default)]
    pub rewards_issued: Amount,
    /// Cumulative flooring remainder that was never assigned to any share.
    #[serde(default)]
    pub dust: Amount,
}

impl GlobalAccumulator {
    /// Zeroed accumulator for a ledger minting `total_supply` at `genesis_time`.
    pub fn genesis(total_supply: Amount, genesis_time: Timestamp) -> Self {
        Self {
            total_supply,
            total_staked: 0,
            reward_per_share: 0,
            last_update_time: genesis_time,
            rewards_issued: 0,
            dust: 0,
        }
    }

    /// Supply minted at genesis, i.e. everything that was not issued as reward.
    pub fn genesis_supply(&self) -> Amount {
        self.total_supply.saturating_sub(self.rewards_issued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genesis_is_zeroed() {
        let acc = GlobalAccumulator::genesis(1_000, Timestamp::new(0));
        assert_eq!(acc.total_supply, 1_000);
        assert_eq!(acc.total_staked, 0);
        assert_eq!(acc.reward_per_share, 0);
        assert_eq!(acc.last_update_time, Timestamp::new(0));
        assert_eq!(acc.rewards_issued, 0);
        assert_eq!(acc.dust, 0);
    }

    #[test]
    fn test_genesis_supply_excludes_rewards() {
        let mut acc = GlobalAccumulator::genesis(1_000, Timestamp::new(0));
        acc.total_supply += 250;
        acc.rewards_issued += 250;
        assert_eq!(acc.genesis_supply(), 1_000);
    }
}
