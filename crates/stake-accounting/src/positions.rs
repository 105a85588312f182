//! Stake position records and lifecycle classification
//!
//! A position commits part of an account's custody balance to one staking
//! target: governance voting, or a specific publisher's integrity pool. Its
//! lifecycle state is derived, never stored — the on-chain record carries
//! only the activation epoch and (after an unstake request) the deactivation
//! epoch, and this module classifies the pair against the current epoch.
//!
//! Key design decisions:
//! - Targets are a sum type with structural equality; publisher keys are
//!   plain strings, keeping this crate free of ledger SDK dependencies
//! - Classification is a stateless pure function over epoch ordinals
//! - A deactivation epoch before the activation epoch, or ahead of the
//!   current epoch, indicates a corrupt snapshot and is rejected

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::amount::Amount;

/// What a position's tokens are committed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    /// Staking for governance voting power; no slashing exposure.
    Voting,
    /// Delegation to one publisher's integrity pool.
    IntegrityPool { publisher: String },
}

impl Target {
    /// Target for a publisher's pool, by key.
    pub fn pool(publisher: impl Into<String>) -> Self {
        Self::IntegrityPool {
            publisher: publisher.into(),
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Voting => write!(f, "voting"),
            Target::IntegrityPool { publisher } => write!(f, "pool:{}", publisher),
        }
    }
}

/// One stake commitment owned by a stake account.
///
/// Created when a stake/delegate action is submitted; `amount` and
/// `deactivation_epoch` change only through further on-chain actions. This
/// engine never mutates a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub target: Target,
    pub amount: Amount,
    pub activation_epoch: u64,
    /// Set once an unstake has been requested; the epoch the request lands in.
    pub deactivation_epoch: Option<u64>,
}

impl Position {
    /// Lifecycle state of this position at `current_epoch`.
    pub fn state(&self, current_epoch: u64) -> Result<PositionState> {
        classify(current_epoch, self.activation_epoch, self.deactivation_epoch)
    }
}

/// Lifecycle state of a position relative to the current epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionState {
    /// Committed but not yet active for rewards or voting.
    Warmup,
    /// Active: earning rewards / counting toward voting power.
    Staked,
    /// First cooldown epoch after an unstake request; still earning and
    /// still exposed to slashing.
    CooldownPhase1,
    /// Second cooldown epoch; no longer earning, no longer slashable.
    CooldownPhase2,
    /// Cooldown complete; the amount has moved to the freely-withdrawable
    /// balance and the position no longer counts in any bucket.
    Withdrawn,
}

impl std::fmt::Display for PositionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionState::Warmup => write!(f, "warmup"),
            PositionState::Staked => write!(f, "staked"),
            PositionState::CooldownPhase1 => write!(f, "cooldown1"),
            PositionState::CooldownPhase2 => write!(f, "cooldown2"),
            PositionState::Withdrawn => write!(f, "withdrawn"),
        }
    }
}

impl FromStr for PositionState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "warmup" => Ok(PositionState::Warmup),
            "staked" => Ok(PositionState::Staked),
            "cooldown1" => Ok(PositionState::CooldownPhase1),
            "cooldown2" => Ok(PositionState::CooldownPhase2),
            "withdrawn" => Ok(PositionState::Withdrawn),
            _ => bail!("Invalid position state: {}", s),
        }
    }
}

/// Classify a position's activation/deactivation epochs against the current
/// epoch.
///
/// Without a deactivation epoch the position is warming up until its
/// activation epoch arrives, then staked indefinitely. With one, the
/// position walks the two cooldown epochs and is withdrawn afterward.
pub fn classify(current_epoch: u64, activation_epoch: u64, deactivation_epoch: Option<u64>) -> Result<PositionState> {
    let Some(deactivation) = deactivation_epoch else {
        return Ok(if current_epoch < activation_epoch {
            PositionState::Warmup
        } else {
            PositionState::Staked
        });
    };

    if deactivation < activation_epoch {
        bail!(
            "deactivation epoch {} precedes activation epoch {}",
            deactivation,
            activation_epoch
        );
    }

    if current_epoch < deactivation {
        // Unstake requests land in the current epoch, so a snapshot can
        // never honestly carry a future deactivation.
        bail!(
            "deactivation epoch {} is ahead of current epoch {}",
            deactivation,
            current_epoch
        );
    }

    Ok(if current_epoch == deactivation {
        PositionState::CooldownPhase1
    } else if current_epoch == deactivation + 1 {
        PositionState::CooldownPhase2
    } else {
        PositionState::Withdrawn
    })
}
