// crates/fatoken-ledger/tests/prop_tests.rs
//
// Property tests over random operation schedules.

use proptest::prelude::*;

use fatoken_core::{Address, Timestamp};
use fatoken_ledger::{GenesisConfig, Ledger, OpContext};

const IDENTITIES: [&str; 4] = ["alice", "bob", "carol", "dave"];

#[derive(Debug, Clone)]
enum Op {
    Transfer { caller: usize, from: usize, to: usize, amount: u128 },
    Approve { caller: usize, spender: usize, amount: u128 },
    Stake { caller: usize, amount: u128 },
    Unstake { caller: usize, amount: u128 },
    Settle { caller: usize },
}

fn who(i: usize) -> Address {
    Address::new(IDENTITIES[i]).unwrap()
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let idx = 0..IDENTITIES.len();
    let amount = 0u128..1_500;
    prop_oneof![
        (idx.clone(), idx.clone(), idx.clone(), amount.clone())
            .prop_map(|(caller, from, to, amount)| Op::Transfer { caller, from, to, amount }),
        (idx.clone(), idx.clone(), amount.clone())
            .prop_map(|(caller, spender, amount)| Op::Approve { caller, spender, amount }),
        (idx.clone(), amount.clone()).prop_map(|(caller, amount)| Op::Stake { caller, amount }),
        (idx.clone(), amount).prop_map(|(caller, amount)| Op::Unstake { caller, amount }),
        idx.prop_map(|caller| Op::Settle { caller }),
    ]
}

/// Operations paired with the seconds elapsed before each one.
fn schedule() -> impl Strategy<Value = Vec<(u64, Op)>> {
    prop::collection::vec((0u64..5, op_strategy()), 1..60)
}

fn apply(ledger: &mut Ledger, now: u64, op: &Op) -> bool {
    let at = |caller: usize| OpContext::new(who(caller), Timestamp::new(now));
    let result = match op {
        Op::Transfer { caller, from, to, amount } => {
            ledger.transfer(&at(*caller), &who(*from), &who(*to), *amount)
        }
        Op::Approve { caller, spender, amount } => {
            ledger.approve(&at(*caller), &who(*spender), *amount)
        }
        Op::Stake { caller, amount } => ledger.stake(&at(*caller), *amount),
        Op::Unstake { caller, amount } => ledger.unstake(&at(*caller), *amount),
        Op::Settle { caller } => ledger.settle(&at(*caller)),
    };
    result.is_ok()
}

fn genesis() -> Ledger {
    Ledger::genesis(GenesisConfig::new(who(0))).unwrap()
}

proptest! {
    /// sum(balance + staked) == total_supply and sum(staked) == total_staked
    /// after every operation, successful or not.
    #[test]
    fn conservation_holds(ops in schedule()) {
        let mut ledger = genesis();
        let mut now = 0u64;
        for (dt, op) in &ops {
            now += dt;
            apply(&mut ledger, now, op);
            prop_assert!(ledger.check_invariants().is_ok(), "{:?}", ledger.check_invariants());
        }
    }

    /// total_supply minus issued rewards is always the genesis supply.
    #[test]
    fn supply_grows_only_by_issued_rewards(ops in schedule()) {
        let mut ledger = genesis();
        let mut now = 0u64;
        for (dt, op) in &ops {
            now += dt;
            apply(&mut ledger, now, op);
            prop_assert_eq!(ledger.accumulator().genesis_supply(), 1_000);
        }
    }

    /// reward_per_share never decreases.
    #[test]
    fn accumulator_is_monotonic(ops in schedule()) {
        let mut ledger = genesis();
        let mut now = 0u64;
        let mut last = 0u128;
        for (dt, op) in &ops {
            now += dt;
            apply(&mut ledger, now, op);
            let current = ledger.storage().reward_per_share;
            prop_assert!(current >= last);
            last = current;
        }
    }

    /// A rejected operation leaves storage byte-for-byte unchanged.
    #[test]
    fn failures_are_all_or_nothing(ops in schedule()) {
        let mut ledger = genesis();
        let mut now = 0u64;
        for (dt, op) in &ops {
            now += dt;
            let before = ledger.clone();
            if !apply(&mut ledger, now, op) {
                prop_assert_eq!(&ledger, &before);
            }
        }
    }

    /// Without any stake, reward_per_share stays at zero no matter how much
    /// time passes.
    #[test]
    fn idle_pool_never_accrues(
        ops in prop::collection::vec((0u64..100_000, op_strategy()), 1..40)
    ) {
        let mut ledger = genesis();
        let mut now = 0u64;
        for (dt, op) in &ops {
            now += dt;
            if matches!(op, Op::Stake { .. }) {
                continue;
            }
            apply(&mut ledger, now, op);
            prop_assert_eq!(ledger.storage().reward_per_share, 0);
        }
    }

    /// Settling twice at the same instant realizes nothing the second time.
    #[test]
    fn settle_is_idempotent_within_an_instant(ops in schedule(), caller in 0..IDENTITIES.len(), dt in 0u64..10) {
        let mut ledger = genesis();
        let mut now = 0u64;
        for (step, op) in &ops {
            now += step;
            apply(&mut ledger, now, op);
        }
        now += dt;
        let ctx = OpContext::new(who(caller), Timestamp::new(now));
        ledger.settle(&ctx).unwrap();
        let once = ledger.clone();
        let second = ledger.settle(&ctx).unwrap();
        prop_assert_eq!(second.reward_realized, 0);
        prop_assert_eq!(&ledger, &once);
    }

    /// Realized rewards across all stakers never exceed what the pool emitted.
    #[test]
    fn rewards_bounded_by_emission(ops in schedule()) {
        let mut ledger = genesis();
        let mut now = 0u64;
        for (dt, op) in &ops {
            now += dt;
            apply(&mut ledger, now, op);
        }
        let emitted = ledger.reward_rate_per_second() * u128::from(now);
        prop_assert!(ledger.accumulator().rewards_issued <= emitted);
    }
}
