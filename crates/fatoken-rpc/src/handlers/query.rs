// crates/fatoken-rpc/src/handlers/query.rs
//
// Read-only handlers: GetBalance, GetAllowance, GetAccount, GetStorage,
// GetTotalSupply. None of them accrue; figures are as of the last
// committed operation.

use serde::{Deserialize, Serialize};

use fatoken_core::error::LedgerError;
use fatoken_core::identity::Address;
use fatoken_core::time::Timestamp;
use fatoken_ledger::{AccountRecord, Amount, StorageSnapshot};

use crate::state::LedgerState;

// ---------------------------------------------------------------------------
// GetBalance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetBalanceRequest {
    pub address: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetBalanceResponse {
    pub address: Address,
    pub balance: Amount,
    pub staked: Amount,
    /// Reward owed as of the last accrual, not yet folded into `balance`.
    pub pending_reward: Amount,
}

/// Handle a GetBalance request. Unknown addresses report zeros.
pub async fn handle_get_balance(
    state: &LedgerState,
    request: GetBalanceRequest,
) -> Result<GetBalanceResponse, LedgerError> {
    let address = request.address;
    state
        .read(|ledger| -> Result<GetBalanceResponse, LedgerError> {
            Ok(GetBalanceResponse {
                balance: ledger.balance(&address),
                staked: ledger.staked(&address),
                pending_reward: ledger.pending_reward(&address)?,
                address: address.clone(),
            })
        })
        .await
}

// ---------------------------------------------------------------------------
// GetAllowance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAllowanceRequest {
    pub owner: Address,
    pub spender: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAllowanceResponse {
    pub owner: Address,
    pub spender: Address,
    pub allowance: Amount,
}

/// Handle a GetAllowance request.
pub async fn handle_get_allowance(
    state: &LedgerState,
    request: GetAllowanceRequest,
) -> Result<GetAllowanceResponse, LedgerError> {
    let GetAllowanceRequest { owner, spender } = request;
    let allowance = state.read(|ledger| ledger.allowance(&owner, &spender)).await;
    Ok(GetAllowanceResponse {
        owner,
        spender,
        allowance,
    })
}

// ---------------------------------------------------------------------------
// GetAccount
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAccountRequest {
    pub address: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAccountResponse {
    pub address: Address,
    /// Full record, or `None` if the address has never been touched.
    pub account: Option<AccountRecord>,
    pub pending_reward: Amount,
}

/// Handle a GetAccount request.
pub async fn handle_get_account(
    state: &LedgerState,
    request: GetAccountRequest,
) -> Result<GetAccountResponse, LedgerError> {
    let address = request.address;
    state
        .read(|ledger| -> Result<GetAccountResponse, LedgerError> {
            Ok(GetAccountResponse {
                account: ledger.account(&address).cloned(),
                pending_reward: ledger.pending_reward(&address)?,
                address: address.clone(),
            })
        })
        .await
}

// ---------------------------------------------------------------------------
// GetStorage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetStorageRequest {}

/// Handle a GetStorage request: a consistent copy of the whole ledger.
pub async fn handle_get_storage(
    state: &LedgerState,
    _request: GetStorageRequest,
) -> Result<StorageSnapshot, LedgerError> {
    Ok(state.read(|ledger| ledger.storage()).await)
}

// ---------------------------------------------------------------------------
// GetTotalSupply
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetTotalSupplyRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetTotalSupplyResponse {
    /// Genesis supply plus every reward realized so far.
    pub total_supply: Amount,
    /// `total_supply - rewards_issued`: the supply minted at genesis, which
    /// never changes. This is the figure a ledger that pays rewards without
    /// issuing them would report as its total supply.
    pub genesis_supply: Amount,
    pub total_staked: Amount,
    pub reward_per_share: Amount,
    /// Rewards realized so far; included in `total_supply`.
    pub rewards_issued: Amount,
    /// Emission lost to flooring; never distributed.
    pub dust: Amount,
    pub reward_rate_per_second: Amount,
    pub last_update_time: Timestamp,
}

/// Handle a GetTotalSupply request.
pub async fn handle_get_total_supply(
    state: &LedgerState,
    _request: GetTotalSupplyRequest,
) -> Result<GetTotalSupplyResponse, LedgerError> {
    Ok(state
        .read(|ledger| {
            let acc = ledger.accumulator();
            GetTotalSupplyResponse {
                total_supply: acc.total_supply,
                genesis_supply: acc.genesis_supply(),
                total_staked: acc.total_staked,
                reward_per_share: acc.reward_per_share,
                rewards_issued: acc.rewards_issued,
                dust: acc.dust,
                reward_rate_per_second: ledger.reward_rate_per_second(),
                last_update_time: acc.last_update_time,
            }
        })
        .await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use fatoken_core::traits::ManualClock;
    use fatoken_ledger::{GenesisConfig, Ledger};

    fn addr(s: &str) -> Address {
        Address::new(s).unwrap()
    }

    fn test_state(clock: ManualClock) -> LedgerState {
        let ledger = Ledger::genesis(GenesisConfig::new(addr("alice"))).unwrap();
        LedgerState::new(ledger, Arc::new(clock))
    }

    #[tokio::test]
    async fn test_balance_of_unknown_address() {
        let state = test_state(ManualClock::new(Timestamp::new(0)));
        let resp = handle_get_balance(&state, GetBalanceRequest { address: addr("ghost") })
            .await
            .unwrap();
        assert_eq!(resp.balance, 0);
        assert_eq!(resp.staked, 0);
        assert_eq!(resp.pending_reward, 0);

        let account = handle_get_account(&state, GetAccountRequest { address: addr("ghost") })
            .await
            .unwrap();
        assert!(account.account.is_none());
    }

    #[tokio::test]
    async fn test_queries_never_accrue() {
        let clock = ManualClock::new(Timestamp::new(10));
        let state = test_state(clock.clone());
        state
            .apply(addr("alice"), |ledger, ctx| ledger.stake(ctx, 100))
            .await
            .unwrap();

        clock.advance(1_000);
        let supply = handle_get_total_supply(&state, GetTotalSupplyRequest {})
            .await
            .unwrap();
        assert_eq!(supply.reward_per_share, 0);
        assert_eq!(supply.last_update_time, Timestamp::new(10));
        assert_eq!(supply.total_supply, 1_000);
        assert_eq!(supply.genesis_supply, 1_000);

        let storage = handle_get_storage(&state, GetStorageRequest {}).await.unwrap();
        assert_eq!(storage.total_staked, 100);
        assert_eq!(storage.ledger[&addr("alice")].balance, 900);
    }

    #[tokio::test]
    async fn test_genesis_supply_stays_fixed_as_rewards_issue() {
        let clock = ManualClock::new(Timestamp::new(0));
        let state = test_state(clock.clone());
        state
            .apply(addr("alice"), |ledger, ctx| ledger.stake(ctx, 100))
            .await
            .unwrap();
        clock.advance(3);
        state
            .apply(addr("alice"), |ledger, ctx| ledger.settle(ctx))
            .await
            .unwrap();

        let supply = handle_get_total_supply(&state, GetTotalSupplyRequest {})
            .await
            .unwrap();
        assert_eq!(supply.rewards_issued, 3_000_000);
        assert_eq!(supply.total_supply, 1_000 + 3_000_000);
        assert_eq!(supply.genesis_supply, 1_000);
    }

    #[tokio::test]
    async fn test_allowance_query() {
        let state = test_state(ManualClock::new(Timestamp::new(0)));
        state
            .apply(addr("alice"), |ledger, ctx| ledger.approve(ctx, &addr("bob"), 7))
            .await
            .unwrap();
        let resp = handle_get_allowance(
            &state,
            GetAllowanceRequest {
                owner: addr("alice"),
                spender: addr("bob"),
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.allowance, 7);
    }
}
