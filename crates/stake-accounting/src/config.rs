//! Configuration for the accounting engine
//!
//! Global program parameters arrive either from the ledger collaborator or
//! from a `config.toml`. Everything the engine consumes is explicit — in
//! particular the epoch anchor, so tests can substitute their own schedule.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;

use crate::epochs::EpochSchedule;

// =============================================================================
// File-based Configuration (config.toml)
// =============================================================================

/// Configuration loaded from config.toml
#[derive(Debug, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub rewards: RewardsConfig,
}

/// Epoch schedule section
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Start of epoch 0, RFC 3339 (default: the Unix epoch)
    #[serde(default = "default_genesis")]
    pub genesis: DateTime<Utc>,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            genesis: default_genesis(),
        }
    }
}

/// Reward parameters section
#[derive(Debug, Clone, Deserialize)]
pub struct RewardsConfig {
    /// Per-epoch reward rate in basis points (default: 10 = 0.10%/epoch)
    #[serde(default = "default_yield_rate_bps")]
    pub yield_rate_bps: u64,
    /// Program-wide annual rate ceiling in basis points (default: 1000 = 10%)
    #[serde(default = "default_max_apy_bps")]
    pub max_apy_bps: u64,
    /// Days from an epoch's start until its rewards are forfeited
    /// (default: 365)
    #[serde(default = "default_claim_expiry_days")]
    pub claim_expiry_days: i64,
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            yield_rate_bps: default_yield_rate_bps(),
            max_apy_bps: default_max_apy_bps(),
            claim_expiry_days: default_claim_expiry_days(),
        }
    }
}

fn default_genesis() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

fn default_yield_rate_bps() -> u64 {
    10
}

fn default_max_apy_bps() -> u64 {
    1_000
}

fn default_claim_expiry_days() -> i64 {
    365
}

impl FileConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content).with_context(|| {
            "Failed to parse config.toml. Check for:\n\
             - Invalid TOML syntax (missing quotes, brackets, etc.)\n\
             - schedule.genesis not in RFC 3339 format\n\
             - Incorrect data types (strings vs numbers)"
        })
    }
}

// =============================================================================
// Runtime Parameters
// =============================================================================

/// Reward parameters the yield calculator and rewards tracker consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardParams {
    /// Per-epoch reward rate cap, in basis points.
    pub yield_rate_bps: u64,
    /// Program-wide maximum annualized rate, in basis points.
    pub max_apy_bps: u64,
    /// Days from the earning epoch's start until forfeiture. Kept
    /// configurable until the exact cutoff rule is confirmed against the
    /// program rules.
    pub claim_expiry_days: i64,
}

/// All global parameters bundled for one snapshot evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    pub schedule: EpochSchedule,
    pub rewards: RewardParams,
}

impl Params {
    /// Build runtime parameters from a parsed config file
    pub fn from_file(file_config: &FileConfig) -> Self {
        Self {
            schedule: EpochSchedule::new(file_config.schedule.genesis),
            rewards: RewardParams {
                yield_rate_bps: file_config.rewards.yield_rate_bps,
                max_apy_bps: file_config.rewards.max_apy_bps,
                claim_expiry_days: file_config.rewards.claim_expiry_days,
            },
        }
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::from_file(&FileConfig {
            schedule: ScheduleConfig::default(),
            rewards: RewardsConfig::default(),
        })
    }
}
