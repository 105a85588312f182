//! Annualized yield estimation for publisher pools
//!
//! Rewards accrue per epoch at a program-wide rate on stake up to each
//! pool's capacity. Stake beyond capacity earns nothing extra, so the
//! per-token rate dilutes linearly once a pool is over-subscribed: more
//! tokens chasing the same reward pool.
//!
//! All rates are integer basis points with u128 intermediates; floats are
//! for display rounding only.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::config::RewardParams;

/// Epochs per year at one week per epoch.
pub const EPOCHS_PER_YEAR: u64 = 52;

/// Basis-point denominator (100% = 10_000 bps).
pub const BPS_DENOMINATOR: u64 = 10_000;

/// One point of a publisher's historical APY series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApyHistoryPoint {
    pub date: NaiveDate,
    pub apy_bps: u64,
}

/// Pool metadata for one publisher, as fetched from the ledger collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publisher {
    pub identity: String,
    pub self_stake: Amount,
    /// Stake ceiling eligible for the full reward rate.
    pub pool_capacity: Amount,
    /// Total delegated stake currently in the pool.
    pub pool_utilization: Amount,
    /// Share of delegator rewards the publisher retains.
    pub delegation_fee_bps: u64,
    pub quality_ranking: u32,
    pub apy_history: Vec<ApyHistoryPoint>,
}

impl Publisher {
    /// APY on the publisher's own stake, optionally previewing `delta`
    /// additional tokens.
    pub fn self_apy(&self, params: &RewardParams, delta: Amount) -> PoolApy {
        estimate_apy(
            &ApyInputs {
                is_self: true,
                self_stake: self.self_stake,
                pool_capacity: self.pool_capacity,
                pool_utilization: self.pool_utilization,
                delegation_fee_bps: self.delegation_fee_bps,
                stake_delta: delta,
            },
            params,
        )
    }

    /// APY for a delegator to this pool, optionally previewing `delta`
    /// additional tokens ("APY after staking").
    pub fn delegator_apy(&self, params: &RewardParams, delta: Amount) -> PoolApy {
        estimate_apy(
            &ApyInputs {
                is_self: false,
                self_stake: self.self_stake,
                pool_capacity: self.pool_capacity,
                pool_utilization: self.pool_utilization,
                delegation_fee_bps: self.delegation_fee_bps,
                stake_delta: delta,
            },
            params,
        )
    }
}

/// Inputs to one APY estimate.
#[derive(Debug, Clone, Copy)]
pub struct ApyInputs {
    /// Publisher's own stake (true) vs a delegator's stake (false).
    pub is_self: bool,
    pub self_stake: Amount,
    pub pool_capacity: Amount,
    pub pool_utilization: Amount,
    pub delegation_fee_bps: u64,
    /// Hypothetical additional stake for "APY after staking" previews.
    pub stake_delta: Amount,
}

/// An annualized yield estimate, or the empty-pool sentinel.
///
/// A pool with zero capacity has no defined rate; that is a normal state
/// (displayed as "empty pool"), distinct from a 0% rate and never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolApy {
    EmptyPool,
    Bps(u64),
}

impl PoolApy {
    pub fn as_bps(&self) -> Option<u64> {
        match self {
            PoolApy::EmptyPool => None,
            PoolApy::Bps(bps) => Some(*bps),
        }
    }

    /// Percentage as f64 (for display only).
    pub fn as_percent(&self) -> Option<f64> {
        self.as_bps().map(|bps| bps as f64 / 100.0)
    }
}

impl std::fmt::Display for PoolApy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoolApy::EmptyPool => write!(f, "empty pool"),
            PoolApy::Bps(bps) => write!(f, "{}.{:02}%", bps / 100, bps % 100),
        }
    }
}

/// Annualized per-token rate over a stake pool of size `stake` against
/// `capacity`: the full rate at or under capacity, diluted by
/// `capacity / stake` above it. An empty pool side (`stake == 0`) earns the
/// full rate — the first token in is fully covered.
fn per_token_rate_bps(annual_bps: u64, stake: Amount, capacity: Amount) -> u64 {
    if stake == 0 || stake <= capacity {
        return annual_bps;
    }

    let eligible = capacity.min(stake) as u128;
    ((annual_bps as u128 * eligible) / stake as u128) as u64
}

/// Estimate the annualized reward rate for a pool participant.
///
/// Self case: the rate on `self_stake + delta`, before delegation-fee
/// income. Delegator case: the pool-level rate apportioned across
/// `pool_utilization + delta`, net of the publisher's fee. Both are capped
/// by the program-wide maximum.
pub fn estimate_apy(inputs: &ApyInputs, params: &RewardParams) -> PoolApy {
    if inputs.pool_capacity == 0 {
        return PoolApy::EmptyPool;
    }

    let annual_bps = params.yield_rate_bps.saturating_mul(EPOCHS_PER_YEAR);

    let rate = if inputs.is_self {
        let stake = inputs.self_stake.saturating_add(inputs.stake_delta);
        per_token_rate_bps(annual_bps, stake, inputs.pool_capacity)
    } else {
        let stake = inputs.pool_utilization.saturating_add(inputs.stake_delta);
        let gross = per_token_rate_bps(annual_bps, stake, inputs.pool_capacity);
        let fee = inputs.delegation_fee_bps.min(BPS_DENOMINATOR);
        ((gross as u128 * (BPS_DENOMINATOR - fee) as u128) / BPS_DENOMINATOR as u128) as u64
    };

    PoolApy::Bps(rate.min(params.max_apy_bps))
}
