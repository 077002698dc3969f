// crates/fatoken-daemon/src/bootstrap.rs
//
// Restore-or-genesis: pick the ledger the daemon starts serving.

use fatoken_core::error::LedgerError;
use fatoken_core::time::Timestamp;
use fatoken_ledger::Ledger;

use crate::config::GenesisSection;
use crate::store::SnapshotStore;

/// Restore the stored ledger, or create one from `genesis` if the store is
/// empty. A freshly created ledger is saved immediately so genesis is
/// consumed exactly once.
pub fn open_ledger(
    store: &SnapshotStore,
    genesis: &GenesisSection,
    now: Timestamp,
) -> Result<Ledger, LedgerError> {
    if let Some(ledger) = store.load()? {
        tracing::info!(
            path = %store.path().display(),
            accounts = ledger.accounts().count(),
            total_supply = %ledger.total_supply(),
            "Restored ledger snapshot; genesis table ignored"
        );
        return Ok(ledger);
    }

    let config = genesis.to_genesis_config(now)?;
    tracing::info!(
        issuer = %config.issuer,
        total_supply = %config.total_supply,
        reward_rate_per_second = %config.reward_rate_per_second,
        genesis_time = %config.genesis_time,
        "Creating genesis ledger"
    );
    let ledger = Ledger::genesis(config)?;
    store.save(&ledger.storage())?;
    Ok(ledger)
}
