//! Claimable reward tracking and forfeiture dates
//!
//! Rewards accrue per epoch as discrete chunks. A chunk stays claimable for
//! a fixed number of days after the start of the epoch it was earned in
//! (configurable; see [`crate::config::RewardParams`]), then is forfeited.
//! Forfeiture is normal expiry, not an error: expired chunks silently leave
//! the total. The claim action itself is an external transaction; this
//! module only computes the pre-claim totals, which the caller recomputes
//! from a fresh snapshot after a claim succeeds.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::config::RewardParams;
use crate::epochs::EpochSchedule;

/// One unclaimed reward, keyed by the epoch it was earned in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimableRewardChunk {
    pub amount: Amount,
    pub earned_epoch: u64,
}

impl ClaimableRewardChunk {
    /// Instant at which this chunk is forfeited. The boundary is exclusive:
    /// the chunk is claimable while `now < expiry`.
    pub fn expiry(&self, schedule: &EpochSchedule, params: &RewardParams) -> DateTime<Utc> {
        schedule.epoch_start(self.earned_epoch) + Duration::days(params.claim_expiry_days)
    }

    /// Whether the chunk can still be claimed at `now`.
    pub fn is_claimable(&self, schedule: &EpochSchedule, params: &RewardParams, now: DateTime<Utc>) -> bool {
        now < self.expiry(schedule, params)
    }
}

/// Sum of all chunks still claimable at `now`.
pub fn total_claimable(
    chunks: &[ClaimableRewardChunk],
    schedule: &EpochSchedule,
    params: &RewardParams,
    now: DateTime<Utc>,
) -> Amount {
    chunks
        .iter()
        .filter(|c| c.is_claimable(schedule, params, now))
        .fold(0u64, |acc, c| acc.saturating_add(c.amount))
}

/// Earliest forfeiture date among chunks still claimable at `now`, if any.
pub fn nearest_expiry(
    chunks: &[ClaimableRewardChunk],
    schedule: &EpochSchedule,
    params: &RewardParams,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    chunks
        .iter()
        .filter(|c| c.is_claimable(schedule, params, now))
        .map(|c| c.expiry(schedule, params))
        .min()
}

/// Pre-claim view of the reward balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimableSummary {
    pub total: Amount,
    pub nearest_expiry: Option<DateTime<Utc>>,
}

impl ClaimableSummary {
    pub fn build(
        chunks: &[ClaimableRewardChunk],
        schedule: &EpochSchedule,
        params: &RewardParams,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            total: total_claimable(chunks, schedule, params, now),
            nearest_expiry: nearest_expiry(chunks, schedule, params, now),
        }
    }
}
