// crates/fatoken-daemon/src/config.rs
//
// Runtime configuration for the fatoken daemon.
// Loaded from a TOML file or populated with sensible defaults.

use serde::Deserialize;
use std::fs;

use fatoken_core::error::LedgerError;
use fatoken_core::identity::Address;
use fatoken_core::time::Timestamp;
use fatoken_ledger::{Amount, GenesisConfig, DEFAULT_GENESIS_SUPPLY, REWARD_RATE_PER_SECOND};

/// Runtime configuration for the daemon.
#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
    /// Directory holding the ledger snapshot.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Host address for the RPC server.
    #[serde(default = "default_rpc_host")]
    pub rpc_host: String,

    /// Port for the RPC server.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Log level: "trace", "debug", "info", "warn", "error".
    /// Ignored when `RUST_LOG` is set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Write a snapshot after every committed operation.
    #[serde(default = "default_persist")]
    pub persist: bool,

    /// Genesis parameters. Only read when no snapshot exists yet.
    #[serde(default)]
    pub genesis: GenesisSection,
}

/// The `[genesis]` table.
///
/// Amounts are `u64` here because TOML integers are 64-bit; the ledger
/// widens them to `Amount`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenesisSection {
    /// Account receiving the initial supply. Required to create a ledger.
    #[serde(default)]
    pub issuer: Option<String>,

    #[serde(default = "default_total_supply")]
    pub total_supply: u64,

    #[serde(default = "default_reward_rate")]
    pub reward_rate_per_second: u64,

    /// Unix seconds. Defaults to the daemon's clock at first start.
    #[serde(default)]
    pub genesis_time: Option<u64>,
}

fn default_data_dir() -> String {
    "~/.fatoken/data".to_string()
}

fn default_rpc_host() -> String {
    "127.0.0.1".to_string()
}

fn default_rpc_port() -> u16 {
    50061
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_persist() -> bool {
    true
}

fn default_total_supply() -> u64 {
    DEFAULT_GENESIS_SUPPLY as u64
}

fn default_reward_rate() -> u64 {
    REWARD_RATE_PER_SECOND as u64
}

impl Default for GenesisSection {
    fn default() -> Self {
        Self {
            issuer: None,
            total_supply: default_total_supply(),
            reward_rate_per_second: default_reward_rate(),
            genesis_time: None,
        }
    }
}

impl GenesisSection {
    /// Build the ledger's genesis input, stamping `now` when no
    /// `genesis_time` is configured.
    pub fn to_genesis_config(&self, now: Timestamp) -> Result<GenesisConfig, LedgerError> {
        let issuer = self.issuer.as_deref().ok_or_else(|| {
            LedgerError::Genesis("genesis.issuer is required to create a new ledger".to_string())
        })?;
        let config = GenesisConfig::new(Address::new(issuer)?)
            .with_total_supply(Amount::from(self.total_supply))
            .with_reward_rate(Amount::from(self.reward_rate_per_second))
            .with_genesis_time(self.genesis_time.map(Timestamp::new).unwrap_or(now));
        config.validate()?;
        Ok(config)
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            rpc_host: default_rpc_host(),
            rpc_port: default_rpc_port(),
            log_level: default_log_level(),
            persist: default_persist(),
            genesis: GenesisSection::default(),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        let config: DaemonConfig = toml::from_str(&contents)?;
        Ok(config)
    }
}
