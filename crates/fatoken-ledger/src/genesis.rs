// crates/fatoken-ledger/src/genesis.rs
//
// One-time genesis input: who the issuer is, how much they start with,
// the reward rate and when the ledger's clock starts.

use serde::{Deserialize, Serialize};

use fatoken_core::error::LedgerError;
use fatoken_core::identity::Address;
use fatoken_core::time::Timestamp;

use crate::token::{Amount, DEFAULT_GENESIS_SUPPLY, REWARD_RATE_PER_SECOND};

/// Genesis configuration consumed once by `Ledger::genesis`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisConfig {
    /// Account that receives the entire initial supply.
    pub issuer: Address,
    /// Initial supply, all of it liquid in the issuer's balance.
    #[serde(default = "default_total_supply")]
    pub total_supply: Amount,
    /// Reward streamed to stakers per second.
    #[serde(default = "default_reward_rate")]
    pub reward_rate_per_second: Amount,
    /// Initial `last_update_time`.
    #[serde(default)]
    pub genesis_time: Timestamp,
}

fn default_total_supply() -> Amount {
    DEFAULT_GENESIS_SUPPLY
}

fn default_reward_rate() -> Amount {
    REWARD_RATE_PER_SECOND
}

impl GenesisConfig {
    /// Genesis with default supply and reward rate at time zero.
    pub fn new(issuer: Address) -> Self {
        Self {
            issuer,
            total_supply: DEFAULT_GENESIS_SUPPLY,
            reward_rate_per_second: REWARD_RATE_PER_SECOND,
            genesis_time: Timestamp::default(),
        }
    }

    pub fn with_total_supply(mut self, total_supply: Amount) -> Self {
        self.total_supply = total_supply;
        self
    }

    pub fn with_reward_rate(mut self, reward_rate_per_second: Amount) -> Self {
        self.reward_rate_per_second = reward_rate_per_second;
        self
    }

    pub fn with_genesis_time(mut self, genesis_time: Timestamp) -> Self {
        self.genesis_time = genesis_time;
        self
    }

    /// Reject configurations the ledger cannot run.
    ///
    /// A ledger must start with something to distribute; a zero supply
    /// leaves nothing to stake, so rewards could never start.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.total_supply == 0 {
            return Err(LedgerError::Genesis(
                "total_supply must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GenesisConfig::new(Address::new("alice").unwrap());
        assert_eq!(config.total_supply, 1_000);
        assert_eq!(config.reward_rate_per_second, 1_000_000);
        assert_eq!(config.genesis_time, Timestamp::new(0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_supply_rejected() {
        let config = GenesisConfig::new(Address::new("alice").unwrap()).with_total_supply(0);
        assert!(matches!(config.validate(), Err(LedgerError::Genesis(_))));
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: GenesisConfig = serde_json::from_str(r#"{"issuer":"alice"}"#).unwrap();
        assert_eq!(config, GenesisConfig::new(Address::new("alice").unwrap()));
    }
}
