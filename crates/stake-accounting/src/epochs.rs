//! Epoch clock: mapping between epoch ordinals and calendar instants
//!
//! Epochs are fixed 7-day windows counted from a single anchor instant that
//! every account and position shares. The anchor is explicit configuration
//! (see [`crate::config`]) so tests can substitute their own schedule.

use anyhow::{Result, bail};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Length of one epoch.
pub const EPOCH_DURATION_DAYS: i64 = 7;

/// Weekly epoch schedule anchored at a fixed genesis instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochSchedule {
    /// Start of epoch 0. Every epoch boundary falls at `genesis + n * 7d`.
    pub genesis: DateTime<Utc>,
}

impl Default for EpochSchedule {
    /// Anchor at the Unix epoch: 1970-01-01 00:00 UTC, a Thursday, so every
    /// weekly boundary lands on Thursday midnight UTC.
    fn default() -> Self {
        Self {
            genesis: DateTime::UNIX_EPOCH,
        }
    }
}

impl EpochSchedule {
    pub fn new(genesis: DateTime<Utc>) -> Self {
        Self { genesis }
    }

    /// Instant at which the given epoch begins.
    pub fn epoch_start(&self, epoch: u64) -> DateTime<Utc> {
        self.genesis + Duration::days(EPOCH_DURATION_DAYS * epoch as i64)
    }

    /// Epoch ordinal covering `now`.
    ///
    /// `now` before the genesis anchor indicates a misconfigured schedule and
    /// is rejected rather than mapped to a negative ordinal.
    pub fn epoch_at(&self, now: DateTime<Utc>) -> Result<u64> {
        let elapsed = now - self.genesis;
        if elapsed < Duration::zero() {
            bail!(
                "time {} predates the epoch anchor {}",
                now.to_rfc3339(),
                self.genesis.to_rfc3339()
            );
        }

        Ok((elapsed.num_days() / EPOCH_DURATION_DAYS) as u64)
    }
}
