// crates/fatoken-rpc/src/handlers/token.rs
//
// Token handlers: Transfer, Approve.

use serde::{Deserialize, Serialize};

use fatoken_core::error::LedgerError;
use fatoken_core::identity::Address;
use fatoken_ledger::{Amount, Receipt};

use crate::state::LedgerState;

// ---------------------------------------------------------------------------
// Transfer
// ---------------------------------------------------------------------------

/// Request to move liquid tokens between accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Authenticated identity submitting the operation.
    pub caller: Address,
    /// Account debited. Must be `caller` unless `caller` holds an allowance.
    pub from: Address,
    /// Account credited; created if absent.
    pub to: Address,
    pub amount: Amount,
}

/// Response from a transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferResponse {
    pub receipt: Receipt,
    /// `from`'s liquid balance after the transfer.
    pub from_balance: Amount,
    /// `to`'s liquid balance after the transfer.
    pub to_balance: Amount,
    /// Allowance left for `caller` on `from` (0 for owner transfers).
    pub remaining_allowance: Amount,
}

/// Handle a Transfer request.
pub async fn handle_transfer(
    state: &LedgerState,
    request: TransferRequest,
) -> Result<TransferResponse, LedgerError> {
    let TransferRequest {
        caller,
        from,
        to,
        amount,
    } = request;

    state
        .apply(caller, |ledger, ctx| {
            let receipt = ledger.transfer(ctx, &from, &to, amount)?;
            Ok(TransferResponse {
                receipt,
                from_balance: ledger.balance(&from),
                to_balance: ledger.balance(&to),
                remaining_allowance: ledger.allowance(&from, &ctx.caller),
            })
        })
        .await
}

// ---------------------------------------------------------------------------
// Approve
// ---------------------------------------------------------------------------

/// Request to set the caller's allowance for a spender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveRequest {
    /// Owner granting the allowance.
    pub caller: Address,
    pub spender: Address,
    /// New limit; replaces any previous one. Zero revokes.
    pub amount: Amount,
}

/// Response from an approve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveResponse {
    pub owner: Address,
    pub spender: Address,
    pub allowance: Amount,
}

/// Handle an Approve request.
pub async fn handle_approve(
    state: &LedgerState,
    request: ApproveRequest,
) -> Result<ApproveResponse, LedgerError> {
    let ApproveRequest {
        caller,
        spender,
        amount,
    } = request;

    state
        .apply(caller, |ledger, ctx| {
            ledger.approve(ctx, &spender, amount)?;
            Ok(ApproveResponse {
                owner: ctx.caller.clone(),
                allowance: ledger.allowance(&ctx.caller, &spender),
                spender: spender.clone(),
            })
        })
        .await
}
