//! Balance aggregation across positions, custody, and the vesting schedule
//!
//! Turns the raw snapshot (custody balance, position list, unlock schedule)
//! into the balances a user sees: per-state bucket totals for each target,
//! plus the three derived quantities — available to stake in governance,
//! available to stake in the integrity program, and available to withdraw.
//!
//! Key design decisions:
//! - All sums use saturating arithmetic; final outputs are clamped at zero
//! - "Locked" means not yet vested (unlock schedule), independent of the
//!   staking lifecycle
//! - A token is withdrawable only if it is simultaneously free of both
//!   staking programs, hence the min() at the end

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::amount::Amount;
use crate::positions::{Position, PositionState, Target};

/// One entry of the vesting timetable: `amount` unlocks at `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockEntry {
    pub date: DateTime<Utc>,
    pub amount: Amount,
}

/// Point-in-time snapshot of one stake account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StakeAccount {
    /// Total tokens held in custody, staked or not.
    pub custody: Amount,
    pub positions: Vec<Position>,
    /// Vesting timetable, independent of staking lifecycle.
    pub unlock_schedule: Vec<UnlockEntry>,
}

/// Sum of position amounts matching both a target and a lifecycle state.
///
/// Positions for other targets are skipped; an empty match sums to zero.
/// Classification errors (corrupt epoch pairs) propagate.
pub fn sum_by_target_and_state(
    positions: &[Position],
    target: &Target,
    state: PositionState,
    current_epoch: u64,
) -> Result<Amount> {
    let mut total = 0u64;
    for p in positions {
        if p.target != *target {
            continue;
        }
        if p.state(current_epoch)? == state {
            total = total.saturating_add(p.amount);
        }
    }
    Ok(total)
}

/// Per-state totals for one target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceBuckets {
    pub warmup: Amount,
    pub staked: Amount,
    pub cooldown_phase1: Amount,
    pub cooldown_phase2: Amount,
}

impl BalanceBuckets {
    /// Everything still committed to the target (withdrawn amounts have
    /// already left the buckets).
    pub fn total(&self) -> Amount {
        self.warmup
            .saturating_add(self.staked)
            .saturating_add(self.cooldown_phase1)
            .saturating_add(self.cooldown_phase2)
    }
}

/// Fill all four buckets for a target in one pass over the positions.
pub fn buckets_for_target(positions: &[Position], target: &Target, current_epoch: u64) -> Result<BalanceBuckets> {
    let mut buckets = BalanceBuckets::default();

    for p in positions {
        if p.target != *target {
            continue;
        }
        match p.state(current_epoch)? {
            PositionState::Warmup => buckets.warmup = buckets.warmup.saturating_add(p.amount),
            PositionState::Staked => buckets.staked = buckets.staked.saturating_add(p.amount),
            PositionState::CooldownPhase1 => {
                buckets.cooldown_phase1 = buckets.cooldown_phase1.saturating_add(p.amount)
            }
            PositionState::CooldownPhase2 => {
                buckets.cooldown_phase2 = buckets.cooldown_phase2.saturating_add(p.amount)
            }
            PositionState::Withdrawn => {}
        }
    }

    Ok(buckets)
}

/// Publisher keys that appear in the position list, deduplicated and ordered.
pub fn publishers_in(positions: &[Position]) -> Vec<String> {
    let keys: BTreeSet<&str> = positions
        .iter()
        .filter_map(|p| match &p.target {
            Target::IntegrityPool { publisher } => Some(publisher.as_str()),
            Target::Voting => None,
        })
        .collect();

    keys.into_iter().map(String::from).collect()
}

/// Tokens still locked by the vesting timetable: entries dated after `now`.
pub fn locked_vesting(unlock_schedule: &[UnlockEntry], now: DateTime<Utc>) -> Amount {
    unlock_schedule
        .iter()
        .filter(|e| e.date > now)
        .fold(0u64, |acc, e| acc.saturating_add(e.amount))
}

/// Custody minus everything committed to governance voting.
pub fn available_to_stake_governance(account: &StakeAccount, current_epoch: u64) -> Result<Amount> {
    let committed = buckets_for_target(&account.positions, &Target::Voting, current_epoch)?.total();
    Ok(account.custody.saturating_sub(committed))
}

/// Custody minus unvested tokens and everything committed to any
/// publisher's pool.
pub fn available_to_stake_integrity(account: &StakeAccount, current_epoch: u64, now: DateTime<Utc>) -> Result<Amount> {
    let locked = locked_vesting(&account.unlock_schedule, now);

    let mut committed = 0u64;
    for publisher in publishers_in(&account.positions) {
        let buckets = buckets_for_target(&account.positions, &Target::pool(publisher), current_epoch)?;
        committed = committed.saturating_add(buckets.total());
    }

    Ok(account.custody.saturating_sub(locked).saturating_sub(committed))
}

/// Tokens free of both programs at once.
pub fn available_to_withdraw(account: &StakeAccount, current_epoch: u64, now: DateTime<Utc>) -> Result<Amount> {
    let governance = available_to_stake_governance(account, current_epoch)?;
    let integrity = available_to_stake_integrity(account, current_epoch, now)?;
    Ok(governance.min(integrity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn position(target: Target, amount: Amount, activation: u64, deactivation: Option<u64>) -> Position {
        Position {
            target,
            amount,
            activation_epoch: activation,
            deactivation_epoch: deactivation,
        }
    }

    /// 100 tokens custody, one 40-token governance position staked since
    /// epoch 3.
    fn sample_account() -> StakeAccount {
        StakeAccount {
            custody: 100_000_000,
            positions: vec![position(Target::Voting, 40_000_000, 3, None)],
            unlock_schedule: vec![],
        }
    }

    #[test]
    fn test_governance_aggregation_scenario() {
        let account = sample_account();
        let staked = sum_by_target_and_state(&account.positions, &Target::Voting, PositionState::Staked, 5).unwrap();
        let warmup = sum_by_target_and_state(&account.positions, &Target::Voting, PositionState::Warmup, 5).unwrap();

        assert_eq!(staked, 40_000_000);
        assert_eq!(warmup, 0);
        assert_eq!(available_to_stake_governance(&account, 5).unwrap(), 60_000_000);
    }

    #[test]
    fn test_no_matching_positions_sums_to_zero() {
        let account = sample_account();
        let sum =
            sum_by_target_and_state(&account.positions, &Target::pool("pub-a"), PositionState::Staked, 5).unwrap();
        assert_eq!(sum, 0);
    }

    #[test]
    fn test_withdrawn_positions_leave_all_buckets() {
        let positions = vec![position(Target::Voting, 25_000_000, 3, Some(5))];
        // Epoch 7: past both cooldown phases
        let buckets = buckets_for_target(&positions, &Target::Voting, 7).unwrap();
        assert_eq!(buckets, BalanceBuckets::default());
        assert_eq!(buckets.total(), 0);
    }

    #[test]
    fn test_buckets_single_pass_matches_per_state_sums() {
        let positions = vec![
            position(Target::Voting, 10_000_000, 9, None),       // warmup at epoch 8
            position(Target::Voting, 20_000_000, 1, None),       // staked
            position(Target::Voting, 5_000_000, 1, Some(8)),     // cooldown1 at epoch 8
            position(Target::Voting, 7_000_000, 1, Some(7)),     // cooldown2 at epoch 8
            position(Target::pool("pub-a"), 3_000_000, 1, None), // other target
        ];

        let buckets = buckets_for_target(&positions, &Target::Voting, 8).unwrap();
        assert_eq!(buckets.warmup, 10_000_000);
        assert_eq!(buckets.staked, 20_000_000);
        assert_eq!(buckets.cooldown_phase1, 5_000_000);
        assert_eq!(buckets.cooldown_phase2, 7_000_000);
        assert_eq!(buckets.total(), 42_000_000);

        for (state, expected) in [
            (PositionState::Warmup, 10_000_000),
            (PositionState::Staked, 20_000_000),
            (PositionState::CooldownPhase1, 5_000_000),
            (PositionState::CooldownPhase2, 7_000_000),
        ] {
            assert_eq!(
                sum_by_target_and_state(&positions, &Target::Voting, state, 8).unwrap(),
                expected
            );
        }
    }

    #[test]
    fn test_locked_vesting_counts_only_future_entries() {
        let now = Utc::now();
        let schedule = vec![
            UnlockEntry {
                date: now - Duration::days(1),
                amount: 10_000_000,
            },
            UnlockEntry {
                date: now + Duration::days(30),
                amount: 20_000_000,
            },
            UnlockEntry {
                date: now + Duration::days(60),
                amount: 5_000_000,
            },
        ];

        assert_eq!(locked_vesting(&schedule, now), 25_000_000);
    }

    #[test]
    fn test_integrity_available_subtracts_vesting_and_pools() {
        let now = Utc::now();
        let account = StakeAccount {
            custody: 100_000_000,
            positions: vec![
                position(Target::pool("pub-a"), 30_000_000, 2, None),
                // Governance positions do not reduce the integrity side
                position(Target::Voting, 50_000_000, 2, None),
            ],
            unlock_schedule: vec![UnlockEntry {
                date: now + Duration::days(10),
                amount: 20_000_000,
            }],
        };

        assert_eq!(available_to_stake_integrity(&account, 5, now).unwrap(), 50_000_000);
        assert_eq!(available_to_stake_governance(&account, 5).unwrap(), 50_000_000);
        assert_eq!(available_to_withdraw(&account, 5, now).unwrap(), 50_000_000);
    }

    #[test]
    fn test_withdraw_is_min_of_both_programs() {
        let now = Utc::now();
        let account = StakeAccount {
            custody: 100_000_000,
            positions: vec![position(Target::Voting, 80_000_000, 2, None)],
            unlock_schedule: vec![UnlockEntry {
                date: now + Duration::days(10),
                amount: 30_000_000,
            }],
        };

        // Governance side: 100 - 80 = 20; integrity side: 100 - 30 = 70
        assert_eq!(available_to_stake_governance(&account, 5).unwrap(), 20_000_000);
        assert_eq!(available_to_stake_integrity(&account, 5, now).unwrap(), 70_000_000);
        assert_eq!(available_to_withdraw(&account, 5, now).unwrap(), 20_000_000);
    }

    #[test]
    fn test_overcommitted_snapshot_clamps_to_zero() {
        // Mid-transition snapshot where positions momentarily exceed custody
        let account = StakeAccount {
            custody: 10_000_000,
            positions: vec![position(Target::Voting, 15_000_000, 1, None)],
            unlock_schedule: vec![],
        };
        assert_eq!(available_to_stake_governance(&account, 5).unwrap(), 0);
    }

    #[test]
    fn test_publishers_in_deduplicates() {
        let positions = vec![
            position(Target::pool("pub-b"), 1, 1, None),
            position(Target::pool("pub-a"), 1, 1, None),
            position(Target::pool("pub-b"), 1, 2, None),
            position(Target::Voting, 1, 1, None),
        ];
        assert_eq!(publishers_in(&positions), vec!["pub-a".to_string(), "pub-b".to_string()]);
    }

    #[test]
    fn test_corrupt_position_propagates_error() {
        let positions = vec![position(Target::Voting, 1_000_000, 5, Some(4))];
        assert!(buckets_for_target(&positions, &Target::Voting, 10).is_err());
    }
}
