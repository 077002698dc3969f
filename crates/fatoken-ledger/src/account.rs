// crates/fatoken-ledger/src/account.rs
//
// Per-identity account record: liquid balance, staked amount, the
// reward-per-share snapshot taken at the account's last settlement, and
// the allowances the account has granted to spenders.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use fatoken_core::error::LedgerError;
use fatoken_core::identity::Address;

use crate::token::{self, Amount};

/// A single participant's ledger entry.
///
/// Records are created zeroed by `Ledger::ensure_account` and are never
/// removed; an emptied account persists as an all-zero record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Liquid amount: transferable and stakeable.
    pub balance: Amount,
    /// Amount locked in staking.
    pub staked: Amount,
    /// Global `reward_per_share` at this account's last settlement.
    pub last_reward_per_share: Amount,
    /// Spending limits granted to other identities. Zero limits are never
    /// stored.
    #[serde(default)]
    pub allowances: BTreeMap<Address, Amount>,
}

impl AccountRecord {
    /// A fresh record holding `balance` liquid tokens and nothing else.
    pub fn with_balance(balance: Amount) -> Self {
        Self {
            balance,
            ..Self::default()
        }
    }

    /// `balance + staked`.
    pub fn holdings(&self) -> Result<Amount, LedgerError> {
        token::add(self.balance, self.staked, "account holdings")
    }

    /// Remaining limit `spender` may move out of this account. Absent
    /// entries read as zero.
    pub fn allowance(&self, spender: &Address) -> Amount {
        self.allowances.get(spender).copied().unwrap_or(0)
    }

    /// Replace the limit granted to `spender`. Setting zero removes the
    /// entry so that "zero" and "absent" are indistinguishable.
    pub fn set_allowance(&mut self, spender: Address, amount: Amount) {
        if amount == 0 {
            self.allowances.remove(&spender);
        } else {
            self.allowances.insert(spender, amount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::new(s).unwrap()
    }

    #[test]
    fn test_with_balance_zeroes_everything_else() {
        let record = AccountRecord::with_balance(1_000);
        assert_eq!(record.balance, 1_000);
        assert_eq!(record.staked, 0);
        assert_eq!(record.last_reward_per_share, 0);
        assert!(record.allowances.is_empty());
    }

    #[test]
    fn test_allowance_defaults_to_zero() {
        let record = AccountRecord::default();
        assert_eq!(record.allowance(&addr("bob")), 0);
    }

    #[test]
    fn test_set_allowance_replaces() {
        let mut record = AccountRecord::default();
        record.set_allowance(addr("bob"), 50);
        record.set_allowance(addr("bob"), 20);
        assert_eq!(record.allowance(&addr("bob")), 20);
    }

    #[test]
    fn test_zero_allowance_is_removed() {
        let mut record = AccountRecord::default();
        record.set_allowance(addr("bob"), 50);
        record.set_allowance(addr("bob"), 0);
        assert!(record.allowances.is_empty());
    }

    #[test]
    fn test_holdings() {
        let record = AccountRecord {
            balance: 800,
            staked: 100,
            ..AccountRecord::default()
        };
        assert_eq!(record.holdings().unwrap(), 900);
    }

    #[test]
    fn test_deserialize_without_allowances() {
        let json = r#"{"balance":10,"staked":0,"last_reward_per_share":0}"#;
        let record: AccountRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record, AccountRecord::with_balance(10));
    }
}
