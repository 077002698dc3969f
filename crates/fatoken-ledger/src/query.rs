// crates/fatoken-ledger/src/query.rs
//
// Read-only introspection. Nothing here accrues or settles: balances are
// reported as of each account's last settlement. Callers wanting rewards
// realized must run a state-changing operation (`settle`) first.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use fatoken_core::error::LedgerError;
use fatoken_core::identity::Address;
use fatoken_core::time::Timestamp;

use crate::account::AccountRecord;
use crate::accrual;
use crate::accumulator::GlobalAccumulator;
use crate::ledger::Ledger;
use crate::token::{self, Amount};

/// Full, consistent copy of ledger storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSnapshot {
    pub total_supply: Amount,
    pub total_staked: Amount,
    pub reward_per_share: Amount,
    pub last_update_time: Timestamp,
    #[serde(default)]
    pub rewards_issued: Amount,
    #[serde(default)]
    pub dust: Amount,
    pub reward_rate_per_second: Amount,
    pub ledger: BTreeMap<Address, AccountRecord>,
}

impl StorageSnapshot {
    fn accumulator(&self) -> GlobalAccumulator {
        GlobalAccumulator {
            total_supply: self.total_supply,
            total_staked: self.total_staked,
            reward_per_share: self.reward_per_share,
            last_update_time: self.last_update_time,
            rewards_issued: self.rewards_issued,
            dust: self.dust,
        }
    }
}

impl Ledger {
    /// Liquid balance; zero for unknown accounts.
    pub fn balance(&self, address: &Address) -> Amount {
        self.accounts.get(address).map(|a| a.balance).unwrap_or(0)
    }

    /// Staked amount; zero for unknown accounts.
    pub fn staked(&self, address: &Address) -> Amount {
        self.accounts.get(address).map(|a| a.staked).unwrap_or(0)
    }

    /// Remaining amount `spender` may move out of `owner`.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.accounts
            .get(owner)
            .map(|a| a.allowance(spender))
            .unwrap_or(0)
    }

    pub fn total_supply(&self) -> Amount {
        self.accumulator.total_supply
    }

    pub fn total_staked(&self) -> Amount {
        self.accumulator.total_staked
    }

    pub fn account(&self, address: &Address) -> Option<&AccountRecord> {
        self.accounts.get(address)
    }

    pub fn accounts(&self) -> impl Iterator<Item = (&Address, &AccountRecord)> {
        self.accounts.iter()
    }

    /// Reward `address` would realize if settled at `last_update_time`.
    ///
    /// Does not project accrual forward to the present; that would require
    /// a `now`, and queries never take one.
    pub fn pending_reward(&self, address: &Address) -> Result<Amount, LedgerError> {
        match self.accounts.get(address) {
            Some(account) => accrual::pending_reward(
                account.staked,
                self.accumulator.reward_per_share,
                account.last_reward_per_share,
            ),
            None => Ok(0),
        }
    }

    /// Copy of the whole storage.
    pub fn storage(&self) -> StorageSnapshot {
        StorageSnapshot {
            total_supply: self.accumulator.total_supply,
            total_staked: self.accumulator.total_staked,
            reward_per_share: self.accumulator.reward_per_share,
            last_update_time: self.accumulator.last_update_time,
            rewards_issued: self.accumulator.rewards_issued,
            dust: self.accumulator.dust,
            reward_rate_per_second: self.reward_rate_per_second,
            ledger: self.accounts.clone(),
        }
    }

    /// Verify the accounting invariants:
    ///
    /// - `sum(balance + staked) == total_supply`
    /// - `sum(staked) == total_staked`
    /// - no account snapshot is ahead of the global `reward_per_share`
    /// - `rewards_issued <= total_supply`
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut holdings: Amount = 0;
        let mut staked: Amount = 0;
        for (address, account) in &self.accounts {
            let account_holdings = account.holdings().map_err(|e| e.to_string())?;
            holdings = token::add(holdings, account_holdings, "sum of holdings")
                .map_err(|e| e.to_string())?;
            staked = token::add(staked, account.staked, "sum of stakes")
                .map_err(|e| e.to_string())?;
            if account.last_reward_per_share > self.accumulator.reward_per_share {
                return Err(format!(
                    "account {} snapshot {} is ahead of reward_per_share {}",
                    address, account.last_reward_per_share, self.accumulator.reward_per_share
                ));
            }
        }
        if holdings != self.accumulator.total_supply {
            return Err(format!(
                "sum of holdings {} != total_supply {}",
                holdings, self.accumulator.total_supply
            ));
        }
        if staked != self.accumulator.total_staked {
            return Err(format!(
                "sum of stakes {} != total_staked {}",
                staked, self.accumulator.total_staked
            ));
        }
        if self.accumulator.rewards_issued > self.accumulator.total_supply {
            return Err(format!(
                "rewards_issued {} exceeds total_supply {}",
                self.accumulator.rewards_issued, self.accumulator.total_supply
            ));
        }
        Ok(())
    }

    /// Rebuild a ledger from a snapshot, refusing one that breaks the
    /// accounting invariants.
    pub fn restore(snapshot: StorageSnapshot) -> Result<Self, LedgerError> {
        let ledger = Ledger {
            accumulator: snapshot.accumulator(),
            reward_rate_per_second: snapshot.reward_rate_per_second,
            accounts: snapshot.ledger,
        };
        ledger
            .check_invariants()
            .map_err(LedgerError::CorruptSnapshot)?;
        Ok(ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genesis::GenesisConfig;
    use crate::ledger::OpContext;

    fn addr(s: &str) -> Address {
        Address::new(s).unwrap()
    }

    fn staked_ledger() -> Ledger {
        let mut ledger = Ledger::genesis(GenesisConfig::new(addr("alice"))).unwrap();
        ledger
            .stake(&OpContext::new(addr("alice"), Timestamp::new(0)), 100)
            .unwrap();
        ledger
    }

    #[test]
    fn test_unknown_account_queries_are_zero() {
        let ledger = staked_ledger();
        assert_eq!(ledger.balance(&addr("nobody")), 0);
        assert_eq!(ledger.staked(&addr("nobody")), 0);
        assert_eq!(ledger.allowance(&addr("nobody"), &addr("alice")), 0);
        assert_eq!(ledger.pending_reward(&addr("nobody")).unwrap(), 0);
    }

    #[test]
    fn test_queries_do_not_accrue() {
        let ledger = staked_ledger();
        let snapshot = ledger.storage();
        assert_eq!(snapshot.reward_per_share, 0);
        assert_eq!(snapshot.last_update_time, Timestamp::new(0));
        assert_eq!(ledger.balance(&addr("alice")), 900);
    }

    #[test]
    fn test_pending_reward_after_accrual() {
        let mut ledger = staked_ledger();
        ledger
            .transfer(
                &OpContext::new(addr("alice"), Timestamp::new(0)),
                &addr("alice"),
                &addr("bob"),
                100,
            )
            .unwrap();
        ledger
            .stake(&OpContext::new(addr("bob"), Timestamp::new(0)), 100)
            .unwrap();
        // Bob settling at t=2 advances reward_per_share to 10_000; Alice has
        // not settled yet.
        ledger
            .settle(&OpContext::new(addr("bob"), Timestamp::new(2)))
            .unwrap();
        assert_eq!(ledger.pending_reward(&addr("alice")).unwrap(), 1_000_000);
        assert_eq!(ledger.pending_reward(&addr("bob")).unwrap(), 0);
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let ledger = staked_ledger();
        let json = serde_json::to_string(&ledger.storage()).unwrap();
        let snapshot: StorageSnapshot = serde_json::from_str(&json).unwrap();
        let restored = Ledger::restore(snapshot).unwrap();
        assert_eq!(restored, ledger);
    }

    #[test]
    fn test_restore_rejects_broken_conservation() {
        let mut snapshot = staked_ledger().storage();
        snapshot.total_supply += 1;
        assert!(matches!(
            Ledger::restore(snapshot),
            Err(LedgerError::CorruptSnapshot(_))
        ));
    }

    #[test]
    fn test_restore_rejects_future_snapshot() {
        let mut snapshot = staked_ledger().storage();
        if let Some(record) = snapshot.ledger.get_mut(&addr("alice")) {
            record.last_reward_per_share = 1;
        }
        assert!(Ledger::restore(snapshot).is_err());
    }

    #[test]
    fn test_invariants_hold_after_genesis() {
        assert!(staked_ledger().check_invariants().is_ok());
    }
}
