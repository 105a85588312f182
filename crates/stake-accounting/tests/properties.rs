//! Property tests for the accounting invariants
//!
//! These use proptest to generate random snapshots and verify the laws the
//! engine guarantees regardless of input shape.

use chrono::{DateTime, Duration, Utc};
use proptest::prelude::*;

use stake_accounting::amount::{parse_display_string, to_display_string};
use stake_accounting::apy::{ApyInputs, PoolApy, estimate_apy};
use stake_accounting::balances::{
    StakeAccount, UnlockEntry, available_to_stake_governance, available_to_stake_integrity, available_to_withdraw,
};
use stake_accounting::config::RewardParams;
use stake_accounting::history::{AccountEvent, ActionKind, build_history};
use stake_accounting::positions::{Position, Target};

/// Fixed current epoch for generated snapshots.
const CURRENT_EPOCH: u64 = 20;

/// Fixed "now" for vesting checks.
fn now() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

// Small publisher set so generated positions share pools
fn target_strategy() -> impl Strategy<Value = Target> {
    prop_oneof![
        Just(Target::Voting),
        Just(Target::pool("pub-a")),
        Just(Target::pool("pub-b")),
    ]
}

// Positions valid at CURRENT_EPOCH: deactivation, when present, lies
// between activation and the current epoch
fn position_strategy() -> impl Strategy<Value = Position> {
    (target_strategy(), 0u64..1_000_000_000, 0u64..=CURRENT_EPOCH).prop_flat_map(|(target, amount, activation)| {
        prop_oneof![Just(None), (activation..=CURRENT_EPOCH).prop_map(Some)].prop_map(move |deactivation| Position {
            target: target.clone(),
            amount,
            activation_epoch: activation,
            deactivation_epoch: deactivation,
        })
    })
}

// Unlock entries scattered around `now`
fn unlock_strategy() -> impl Strategy<Value = UnlockEntry> {
    (-60i64..120, 0u64..1_000_000_000).prop_map(|(days, amount)| UnlockEntry {
        date: now() + Duration::days(days),
        amount,
    })
}

fn account_strategy() -> impl Strategy<Value = StakeAccount> {
    (
        0u64..10_000_000_000,
        proptest::collection::vec(position_strategy(), 0..12),
        proptest::collection::vec(unlock_strategy(), 0..6),
    )
        .prop_map(|(custody, positions, unlock_schedule)| StakeAccount {
            custody,
            positions,
            unlock_schedule,
        })
}

fn event_strategy() -> impl Strategy<Value = AccountEvent> {
    let kinds = prop_oneof![
        Just(ActionKind::Claim),
        Just(ActionKind::AddTokens),
        Just(ActionKind::LockedDeposit),
        Just(ActionKind::RewardsCredited),
        Just(ActionKind::Slash),
        Just(ActionKind::StakeCreated),
        Just(ActionKind::StakeFinishedWarmup),
        Just(ActionKind::Unlock),
        Just(ActionKind::UnstakeCreated),
        Just(ActionKind::UnstakeExitedCooldown),
        Just(ActionKind::Withdrawal),
    ];
    (0i64..10_000, kinds, 0u64..1_000_000_000).prop_map(|(minutes, kind, amount)| AccountEvent {
        timestamp: now() + Duration::minutes(minutes),
        kind,
        amount,
    })
}

proptest! {
    #[test]
    fn codec_round_trips_every_amount(x in any::<u64>()) {
        prop_assert_eq!(parse_display_string(&to_display_string(x)), Some(x));
    }

    #[test]
    fn display_never_ends_in_trailing_fraction_zero(x in any::<u64>()) {
        let s = to_display_string(x);
        if s.contains('.') {
            prop_assert!(!s.ends_with('0'));
            prop_assert!(!s.ends_with('.'));
        }
    }

    #[test]
    fn withdrawable_is_min_of_both_programs(account in account_strategy()) {
        let governance = available_to_stake_governance(&account, CURRENT_EPOCH).unwrap();
        let integrity = available_to_stake_integrity(&account, CURRENT_EPOCH, now()).unwrap();
        let withdrawable = available_to_withdraw(&account, CURRENT_EPOCH, now()).unwrap();

        prop_assert_eq!(withdrawable, governance.min(integrity));
        prop_assert!(governance <= account.custody);
        prop_assert!(integrity <= account.custody);
    }

    #[test]
    fn empty_pool_is_always_the_sentinel(
        is_self in any::<bool>(),
        self_stake in any::<u64>(),
        pool_utilization in any::<u64>(),
        delegation_fee_bps in 0u64..30_000,
        stake_delta in any::<u64>(),
    ) {
        let params = RewardParams {
            yield_rate_bps: 10,
            max_apy_bps: 1_000,
            claim_expiry_days: 365,
        };
        let apy = estimate_apy(
            &ApyInputs {
                is_self,
                self_stake,
                pool_capacity: 0,
                pool_utilization,
                delegation_fee_bps,
                stake_delta,
            },
            &params,
        );
        prop_assert_eq!(apy, PoolApy::EmptyPool);
    }

    #[test]
    fn apy_never_exceeds_program_cap(
        is_self in any::<bool>(),
        self_stake in any::<u64>(),
        pool_capacity in 1u64..,
        pool_utilization in any::<u64>(),
        delegation_fee_bps in 0u64..30_000,
    ) {
        let params = RewardParams {
            yield_rate_bps: 10,
            max_apy_bps: 1_000,
            claim_expiry_days: 365,
        };
        let apy = estimate_apy(
            &ApyInputs {
                is_self,
                self_stake,
                pool_capacity,
                pool_utilization,
                delegation_fee_bps,
                stake_delta: 0,
            },
            &params,
        );
        prop_assert!(apy.as_bps().unwrap() <= params.max_apy_bps);
    }

    #[test]
    fn history_reconstruction_is_idempotent(log in proptest::collection::vec(event_strategy(), 0..40)) {
        let first = serde_json::to_vec(&build_history(&log)).unwrap();
        let second = serde_json::to_vec(&build_history(&log)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn history_output_is_chronological(log in proptest::collection::vec(event_strategy(), 0..40)) {
        let entries = build_history(&log);
        prop_assert!(entries.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        prop_assert_eq!(entries.len(), log.len());
    }
}
