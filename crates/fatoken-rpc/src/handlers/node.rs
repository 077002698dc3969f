// crates/fatoken-rpc/src/handlers/node.rs
//
// Node health handler: GetHealth.

use serde::{Deserialize, Serialize};

use fatoken_core::error::LedgerError;
use fatoken_core::time::Timestamp;

use crate::state::LedgerState;

/// Request for node health status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetHealthRequest {}

/// Response containing node health status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetHealthResponse {
    /// "healthy" or "degraded".
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    /// Whether the ledger's accounting invariants currently hold.
    pub invariants_ok: bool,
    pub account_count: usize,
    pub last_update_time: Timestamp,
    /// Human-readable details.
    pub details: Option<String>,
}

/// Handle a GetHealth request.
///
/// A ledger whose invariants fail reports "degraded" with the violation in
/// `details`; it keeps serving so the state can be inspected.
pub async fn handle_get_health(
    state: &LedgerState,
    _request: GetHealthRequest,
) -> Result<GetHealthResponse, LedgerError> {
    let (check, account_count, last_update_time) = state
        .read(|ledger| {
            (
                ledger.check_invariants(),
                ledger.accounts().count(),
                ledger.accumulator().last_update_time,
            )
        })
        .await;

    let (status, details) = match check {
        Ok(()) => ("healthy", None),
        Err(violation) => {
            tracing::error!("Ledger invariant violated: {}", violation);
            ("degraded", Some(violation))
        }
    };

    Ok(GetHealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
        invariants_ok: details.is_none(),
        account_count,
        last_update_time,
        details,
    })
}
