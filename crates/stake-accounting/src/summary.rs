//! Full account summary: everything the application layer consumes
//!
//! One pure function assembles the per-refresh view from a single snapshot:
//! governance and per-publisher balance buckets, the three derived
//! availability figures, and the claimable-reward totals. The enclosing
//! system fetches a fresh snapshot on its own schedule and rebuilds; no
//! state is kept here.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::amount::Amount;
use crate::apy::{PoolApy, Publisher};
use crate::balances::{
    BalanceBuckets, StakeAccount, available_to_stake_governance, available_to_stake_integrity, available_to_withdraw,
    buckets_for_target, locked_vesting, publishers_in,
};
use crate::config::Params;
use crate::positions::Target;
use crate::rewards::{ClaimableRewardChunk, ClaimableSummary};

/// Bundled snapshot inputs to reduce function argument counts.
pub struct SnapshotData<'a> {
    pub account: &'a StakeAccount,
    /// Pool metadata for publishers the app wants summarized; publishers
    /// appearing only in positions get balance buckets but no APY.
    pub publishers: &'a [Publisher],
    pub reward_chunks: &'a [ClaimableRewardChunk],
    pub now: DateTime<Utc>,
}

/// Balance and yield view of one publisher's pool.
#[derive(Debug, Clone, Serialize)]
pub struct PublisherPoolSummary {
    pub publisher: String,
    pub buckets: BalanceBuckets,
    /// Publisher-side APY; absent for publishers without pool metadata.
    pub self_apy: Option<PoolApy>,
    /// Delegator-side APY, net of the delegation fee; absent likewise.
    pub delegator_apy: Option<PoolApy>,
}

/// Everything a refresh produces for one account.
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub current_epoch: u64,
    pub governance: BalanceBuckets,
    pub pools: Vec<PublisherPoolSummary>,
    pub available_to_stake_governance: Amount,
    pub available_to_stake_integrity: Amount,
    pub available_to_withdraw: Amount,
    pub locked_vesting: Amount,
    pub claimable: ClaimableSummary,
}

/// Build the complete summary from one internally-consistent snapshot.
pub fn build_account_summary(data: &SnapshotData<'_>, params: &Params) -> Result<AccountSummary> {
    let current_epoch = params.schedule.epoch_at(data.now)?;
    let account = data.account;

    let governance = buckets_for_target(&account.positions, &Target::Voting, current_epoch)?;

    // Union of publishers with metadata and publishers present in positions,
    // metadata order first
    let mut pool_keys: Vec<String> = data.publishers.iter().map(|p| p.identity.clone()).collect();
    for key in publishers_in(&account.positions) {
        if !pool_keys.contains(&key) {
            pool_keys.push(key);
        }
    }

    let mut pools = Vec::with_capacity(pool_keys.len());
    for key in pool_keys {
        let buckets = buckets_for_target(&account.positions, &Target::pool(key.clone()), current_epoch)?;
        let metadata = data.publishers.iter().find(|p| p.identity == key);

        pools.push(PublisherPoolSummary {
            self_apy: metadata.map(|p| p.self_apy(&params.rewards, 0)),
            delegator_apy: metadata.map(|p| p.delegator_apy(&params.rewards, 0)),
            publisher: key,
            buckets,
        });
    }

    Ok(AccountSummary {
        current_epoch,
        governance,
        pools,
        available_to_stake_governance: available_to_stake_governance(account, current_epoch)?,
        available_to_stake_integrity: available_to_stake_integrity(account, current_epoch, data.now)?,
        available_to_withdraw: available_to_withdraw(account, current_epoch, data.now)?,
        locked_vesting: locked_vesting(&account.unlock_schedule, data.now),
        claimable: ClaimableSummary::build(data.reward_chunks, &params.schedule, &params.rewards, data.now),
    })
}
