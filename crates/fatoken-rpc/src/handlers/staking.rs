// crates/fatoken-rpc/src/handlers/staking.rs
//
// Staking handlers: Stake, Unstake, Settle.

use serde::{Deserialize, Serialize};

use fatoken_core::error::LedgerError;
use fatoken_core::identity::Address;
use fatoken_ledger::{Amount, Ledger, Receipt};

use crate::state::LedgerState;

// ---------------------------------------------------------------------------
// Shared response
// ---------------------------------------------------------------------------

/// Caller's position after a staking operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionResponse {
    pub receipt: Receipt,
    /// Liquid balance, including any reward just realized.
    pub balance: Amount,
    pub staked: Amount,
    /// Pool-wide stake after the operation.
    pub total_staked: Amount,
}

impl PositionResponse {
    fn read(ledger: &Ledger, caller: &Address, receipt: Receipt) -> Self {
        Self {
            receipt,
            balance: ledger.balance(caller),
            staked: ledger.staked(caller),
            total_staked: ledger.total_staked(),
        }
    }
}

// ---------------------------------------------------------------------------
// Stake
// ---------------------------------------------------------------------------

/// Request to lock liquid balance into staking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StakeRequest {
    pub caller: Address,
    pub amount: Amount,
}

/// Handle a Stake request.
pub async fn handle_stake(
    state: &LedgerState,
    request: StakeRequest,
) -> Result<PositionResponse, LedgerError> {
    let amount = request.amount;
    state
        .apply(request.caller, |ledger, ctx| {
            let receipt = ledger.stake(ctx, amount)?;
            Ok(PositionResponse::read(ledger, &ctx.caller, receipt))
        })
        .await
}

// ---------------------------------------------------------------------------
// Unstake
// ---------------------------------------------------------------------------

/// Request to release stake back to liquid balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnstakeRequest {
    pub caller: Address,
    pub amount: Amount,
}

/// Handle an Unstake request.
pub async fn handle_unstake(
    state: &LedgerState,
    request: UnstakeRequest,
) -> Result<PositionResponse, LedgerError> {
    let amount = request.amount;
    state
        .apply(request.caller, |ledger, ctx| {
            let receipt = ledger.unstake(ctx, amount)?;
            Ok(PositionResponse::read(ledger, &ctx.caller, receipt))
        })
        .await
}

// ---------------------------------------------------------------------------
// Settle
// ---------------------------------------------------------------------------

/// Request to realize pending staking rewards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettleRequest {
    pub caller: Address,
}

/// Handle a Settle request.
pub async fn handle_settle(
    state: &LedgerState,
    request: SettleRequest,
) -> Result<PositionResponse, LedgerError> {
    state
        .apply(request.caller, |ledger, ctx| {
            let receipt = ledger.settle(ctx)?;
            Ok(PositionResponse::read(ledger, &ctx.caller, receipt))
        })
        .await
}
