// crates/fatoken-ledger/src/ledger.rs
//
// Ledger operations: transfer, approve, stake, unstake and settle.
//
// Every balance-affecting operation settles the debited account first and
// then applies its own delta. Work is staged on copies of the accumulator
// and the touched records; nothing is written back until every check has
// passed, so a failed operation leaves the ledger exactly as it was.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use fatoken_core::error::LedgerError;
use fatoken_core::identity::Address;
use fatoken_core::time::Timestamp;

use crate::account::AccountRecord;
use crate::accrual;
use crate::accumulator::GlobalAccumulator;
use crate::genesis::GenesisConfig;
use crate::token::{self, Amount};

/// The trusted `(caller, now)` pair an operation runs under.
///
/// Both values come from whoever sequences operations; the ledger does not
/// authenticate the caller and only checks that time does not run backwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpContext {
    pub caller: Address,
    pub now: Timestamp,
}

impl OpContext {
    pub fn new(caller: Address, now: Timestamp) -> Self {
        Self { caller, now }
    }
}

/// Outcome of a committed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Reward folded into the settled account's balance by this operation.
    pub reward_realized: Amount,
    /// Global reward-per-share after the operation.
    pub reward_per_share: Amount,
    /// Time the operation was applied at.
    pub applied_at: Timestamp,
}

/// Staged settlement of one account: the accumulator and record as they
/// would look after `settle`, not yet written back.
struct Settlement {
    accumulator: GlobalAccumulator,
    account: AccountRecord,
    reward: Amount,
}

/// Account mapping plus the global accumulator.
///
/// Owned by exactly one writer; callers needing concurrency wrap the whole
/// ledger in a single lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    pub(crate) accumulator: GlobalAccumulator,
    pub(crate) accounts: BTreeMap<Address, AccountRecord>,
    pub(crate) reward_rate_per_second: Amount,
}

impl Ledger {
    /// Create a ledger with a single pre-funded issuer record.
    pub fn genesis(config: GenesisConfig) -> Result<Self, LedgerError> {
        config.validate()?;

        let mut accounts = BTreeMap::new();
        accounts.insert(
            config.issuer.clone(),
            AccountRecord::with_balance(config.total_supply),
        );

        tracing::info!(
            issuer = %config.issuer,
            total_supply = %config.total_supply,
            reward_rate = %config.reward_rate_per_second,
            "ledger genesis"
        );

        Ok(Self {
            accumulator: GlobalAccumulator::genesis(config.total_supply, config.genesis_time),
            accounts,
            reward_rate_per_second: config.reward_rate_per_second,
        })
    }

    pub fn reward_rate_per_second(&self) -> Amount {
        self.reward_rate_per_second
    }

    pub fn accumulator(&self) -> &GlobalAccumulator {
        &self.accumulator
    }

    /// Insert a zeroed record for `address` if none exists and return it.
    ///
    /// This is the only place account records are created.
    pub fn ensure_account(&mut self, address: &Address) -> &mut AccountRecord {
        if !self.accounts.contains_key(address) {
            tracing::debug!(account = %address, "creating account record");
        }
        self.accounts.entry(address.clone()).or_default()
    }

    /// Move `amount` liquid tokens from `from` to `to`.
    ///
    /// The caller must be `from`, or hold an allowance from `from` of at
    /// least `amount`, which is then reduced by `amount`. Only `from` is
    /// settled; `to`'s stake is untouched so its settlement can wait.
    pub fn transfer(
        &mut self,
        ctx: &OpContext,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<Receipt, LedgerError> {
        let spender_allowance = if ctx.caller == *from {
            None
        } else {
            let allowance = self.allowance(from, &ctx.caller);
            if allowance < amount {
                return Err(LedgerError::Unauthorized);
            }
            Some(allowance)
        };

        let mut staged = self.stage_settlement(from, ctx.now)?;
        if staged.account.balance < amount {
            return Err(LedgerError::InsufficientBalance {
                available: staged.account.balance,
                requested: amount,
            });
        }
        staged.account.balance -= amount;
        if let Some(allowance) = spender_allowance {
            staged
                .account
                .set_allowance(ctx.caller.clone(), allowance - amount);
        }

        let credited = if to == from {
            staged.account.balance += amount;
            None
        } else {
            Some(token::add(self.balance(to), amount, "recipient balance")?)
        };

        let receipt = self.commit(from, staged, ctx.now);
        if let Some(balance) = credited {
            self.ensure_account(to).balance = balance;
        }

        tracing::debug!(
            caller = %ctx.caller,
            from = %from,
            to = %to,
            amount = %amount,
            reward = %receipt.reward_realized,
            "transfer"
        );
        Ok(receipt)
    }

    /// Set the caller's allowance for `spender` to `amount`, replacing any
    /// previous limit. Balances and stake are untouched, so nothing settles.
    pub fn approve(
        &mut self,
        ctx: &OpContext,
        spender: &Address,
        amount: Amount,
    ) -> Result<Receipt, LedgerError> {
        self.ensure_account(&ctx.caller)
            .set_allowance(spender.clone(), amount);

        tracing::debug!(
            owner = %ctx.caller,
            spender = %spender,
            amount = %amount,
            "approve"
        );
        Ok(Receipt {
            reward_realized: 0,
            reward_per_share: self.accumulator.reward_per_share,
            applied_at: ctx.now,
        })
    }

    /// Lock `amount` of the caller's liquid balance into staking.
    ///
    /// Settlement runs first, so a stake into an idle pool starts earning
    /// from `now` and is owed nothing for the idle stretch.
    pub fn stake(&mut self, ctx: &OpContext, amount: Amount) -> Result<Receipt, LedgerError> {
        let mut staged = self.stage_settlement(&ctx.caller, ctx.now)?;
        if staged.account.balance < amount {
            return Err(LedgerError::InsufficientBalance {
                available: staged.account.balance,
                requested: amount,
            });
        }
        staged.account.staked = token::add(staged.account.staked, amount, "staked")?;
        staged.accumulator.total_staked =
            token::add(staged.accumulator.total_staked, amount, "total staked")?;
        staged.account.balance -= amount;

        let receipt = self.commit(&ctx.caller, staged, ctx.now);
        tracing::debug!(
            caller = %ctx.caller,
            amount = %amount,
            reward = %receipt.reward_realized,
            total_staked = %self.accumulator.total_staked,
            "stake"
        );
        Ok(receipt)
    }

    /// Release `amount` of the caller's stake back to their liquid balance.
    pub fn unstake(&mut self, ctx: &OpContext, amount: Amount) -> Result<Receipt, LedgerError> {
        let mut staged = self.stage_settlement(&ctx.caller, ctx.now)?;
        if staged.account.staked < amount {
            return Err(LedgerError::InsufficientStake {
                available: staged.account.staked,
                requested: amount,
            });
        }
        staged.account.balance = token::add(staged.account.balance, amount, "balance")?;
        staged.accumulator.total_staked =
            token::sub(staged.accumulator.total_staked, amount, "total staked")?;
        staged.account.staked -= amount;

        let receipt = self.commit(&ctx.caller, staged, ctx.now);
        tracing::debug!(
            caller = %ctx.caller,
            amount = %amount,
            reward = %receipt.reward_realized,
            total_staked = %self.accumulator.total_staked,
            "unstake"
        );
        Ok(receipt)
    }

    /// Realize the caller's pending reward without changing their stake.
    ///
    /// Equivalent to `stake(0)`, but independent of any balance check.
    pub fn settle(&mut self, ctx: &OpContext) -> Result<Receipt, LedgerError> {
        let staged = self.stage_settlement(&ctx.caller, ctx.now)?;
        let receipt = self.commit(&ctx.caller, staged, ctx.now);
        tracing::debug!(
            caller = %ctx.caller,
            reward = %receipt.reward_realized,
            "settle"
        );
        Ok(receipt)
    }

    fn stage_settlement(&self, who: &Address, now: Timestamp) -> Result<Settlement, LedgerError> {
        let mut accumulator = self.accumulator;
        let mut account = self.accounts.get(who).cloned().unwrap_or_default();
        let reward = accrual::settle(
            &mut accumulator,
            &mut account,
            now,
            self.reward_rate_per_second,
        )?;
        Ok(Settlement {
            accumulator,
            account,
            reward,
        })
    }

    fn commit(&mut self, who: &Address, staged: Settlement, now: Timestamp) -> Receipt {
        self.accumulator = staged.accumulator;
        *self.ensure_account(who) = staged.account;
        Receipt {
            reward_realized: staged.reward,
            reward_per_share: self.accumulator.reward_per_share,
            applied_at: now,
        }
    }
}
