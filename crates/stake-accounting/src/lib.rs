//! Read-side accounting for the token staking programs.
//!
//! Pure, deterministic derivation of user-visible balances from an
//! already-fetched ledger snapshot: lifecycle classification of stake
//! positions against the current epoch, per-target balance aggregation,
//! lossless minor-unit/decimal conversion, pool yield estimation,
//! claimable-reward expiry, and account-history reconstruction.
//!
//! This crate performs no I/O. The enclosing system fetches snapshots
//! (positions, custody balance, unlock schedule, pool metadata, event log)
//! and a single `now`, calls in here, and renders the results; it refreshes
//! and rebuilds after every mutating action. All functions are synchronous
//! and referentially transparent, so a stale or mid-epoch-transition
//! snapshot is never an error — the next refresh converges.

pub mod amount;
pub mod apy;
pub mod balances;
pub mod config;
pub mod epochs;
pub mod history;
pub mod positions;
pub mod rewards;
pub mod summary;

pub use amount::{Amount, DECIMALS, parse_display_string, to_display_string};
pub use apy::{ApyInputs, PoolApy, Publisher, estimate_apy};
pub use balances::{BalanceBuckets, StakeAccount, UnlockEntry};
pub use config::{FileConfig, Params, RewardParams};
pub use epochs::EpochSchedule;
pub use history::{AccountEvent, AccountHistoryEntry, ActionKind, build_history};
pub use positions::{Position, PositionState, Target, classify};
pub use rewards::{ClaimableRewardChunk, ClaimableSummary};
pub use summary::{AccountSummary, SnapshotData, build_account_summary};
