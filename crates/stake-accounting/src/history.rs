//! Account history reconstruction from the immutable event log
//!
//! A pure fold: sort the raw events by timestamp (log order breaks ties),
//! then walk forward once, applying each event's effect to four running
//! totals. Entries are derived, read-only projections — never mutated, only
//! recomputed from a fresh log fetch, so reconstruction is idempotent by
//! construction.
//!
//! Running totals carried through the fold:
//! - `account_total_after`: all tokens held in the account's custody
//! - `available_rewards_after`: accrued rewards not yet claimed into custody
//! - `available_to_withdraw_after`: tokens free of both staking programs
//! - `locked_after`: tokens still locked by the vesting timetable

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::amount::Amount;

/// Kind of action recorded in the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Claim,
    AddTokens,
    LockedDeposit,
    RewardsCredited,
    Slash,
    StakeCreated,
    StakeFinishedWarmup,
    Unlock,
    UnstakeCreated,
    UnstakeExitedCooldown,
    Withdrawal,
}

impl ActionKind {
    /// Human-readable label for timeline rendering.
    pub fn label(&self) -> &'static str {
        match self {
            ActionKind::Claim => "Rewards claimed",
            ActionKind::AddTokens => "Tokens deposited",
            ActionKind::LockedDeposit => "Locked tokens deposited",
            ActionKind::RewardsCredited => "Rewards credited",
            ActionKind::Slash => "Stake slashed",
            ActionKind::StakeCreated => "Stake created",
            ActionKind::StakeFinishedWarmup => "Warmup complete",
            ActionKind::Unlock => "Tokens unlocked",
            ActionKind::UnstakeCreated => "Unstake requested",
            ActionKind::UnstakeExitedCooldown => "Cooldown complete",
            ActionKind::Withdrawal => "Tokens withdrawn",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One record of the immutable on-chain event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEvent {
    pub timestamp: DateTime<Utc>,
    pub kind: ActionKind,
    pub amount: Amount,
}

/// One row of the reconstructed, human-readable timeline.
///
/// Serialized for the app layer; never deserialized back — entries are
/// always recomputed from a fresh log fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountHistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub kind: ActionKind,
    pub label: &'static str,
    pub amount: Amount,
    pub account_total_after: Amount,
    pub available_rewards_after: Amount,
    pub available_to_withdraw_after: Amount,
    pub locked_after: Amount,
}

/// Running totals carried through the fold.
#[derive(Debug, Clone, Copy, Default)]
struct RunningTotals {
    account_total: Amount,
    available_rewards: Amount,
    available_to_withdraw: Amount,
    locked: Amount,
}

impl RunningTotals {
    /// Apply one event's effect. All arithmetic saturates: a log replayed
    /// from an arbitrary starting point must clamp rather than wrap.
    fn apply(&mut self, event: &AccountEvent) {
        let a = event.amount;
        match event.kind {
            ActionKind::AddTokens => {
                self.account_total = self.account_total.saturating_add(a);
                self.available_to_withdraw = self.available_to_withdraw.saturating_add(a);
            }
            ActionKind::LockedDeposit => {
                self.account_total = self.account_total.saturating_add(a);
                self.locked = self.locked.saturating_add(a);
            }
            ActionKind::RewardsCredited => {
                self.available_rewards = self.available_rewards.saturating_add(a);
            }
            ActionKind::Claim => {
                // Claimed rewards move from the reward balance into custody
                self.available_rewards = self.available_rewards.saturating_sub(a);
                self.account_total = self.account_total.saturating_add(a);
                self.available_to_withdraw = self.available_to_withdraw.saturating_add(a);
            }
            ActionKind::Slash => {
                // Slashed from staked tokens, which were not withdrawable
                self.account_total = self.account_total.saturating_sub(a);
            }
            ActionKind::StakeCreated => {
                self.available_to_withdraw = self.available_to_withdraw.saturating_sub(a);
            }
            ActionKind::StakeFinishedWarmup | ActionKind::UnstakeCreated => {
                // Lifecycle transitions; no balance moves
            }
            ActionKind::Unlock => {
                self.locked = self.locked.saturating_sub(a);
                self.available_to_withdraw = self.available_to_withdraw.saturating_add(a);
            }
            ActionKind::UnstakeExitedCooldown => {
                self.available_to_withdraw = self.available_to_withdraw.saturating_add(a);
            }
            ActionKind::Withdrawal => {
                self.account_total = self.account_total.saturating_sub(a);
                self.available_to_withdraw = self.available_to_withdraw.saturating_sub(a);
            }
        }
    }
}

/// Reconstruct the chronological timeline from a raw event log.
///
/// Events need not arrive pre-sorted; the sort is stable, so log order is
/// the tie-break for equal timestamps.
pub fn build_history(events: &[AccountEvent]) -> Vec<AccountHistoryEntry> {
    let mut ordered: Vec<&AccountEvent> = events.iter().collect();
    ordered.sort_by_key(|e| e.timestamp);

    let mut totals = RunningTotals::default();
    let mut entries = Vec::with_capacity(ordered.len());

    for event in ordered {
        totals.apply(event);
        entries.push(AccountHistoryEntry {
            timestamp: event.timestamp,
            kind: event.kind,
            label: event.kind.label(),
            amount: event.amount,
            account_total_after: totals.account_total,
            available_rewards_after: totals.available_rewards,
            available_to_withdraw_after: totals.available_to_withdraw,
            locked_after: totals.locked,
        });
    }

    entries
}
