//! LeaseSync: reconcile the router's static leases with a desired list
//!
//! Deletions are issued before additions so a MAC moving to a new IP is
//! never bound twice on the router. The first failing call aborts the run.

use std::collections::BTreeSet;
use std::time::Duration;

use super::{LiveboxClient, StaticLeaseApi};
use crate::config::Config;
use crate::error::Result;
use crate::models::StaticLease;

/// Diff between the router's current leases and the desired ones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeasePlan {
    pub to_delete: BTreeSet<StaticLease>,
    pub to_add: BTreeSet<StaticLease>,
    pub unchanged: BTreeSet<StaticLease>,
}

impl LeasePlan {
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty() && self.to_add.is_empty()
    }
}

/// Outcome of a sync run
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub deleted: Vec<StaticLease>,
    pub added: Vec<StaticLease>,
    pub unchanged: usize,
    /// Lease table as re-read from the router after applying
    pub final_leases: Vec<StaticLease>,
}

/// Compute the plan. A MAC present on both sides with a different IP yields
/// one delete and one add, never an in-place update.
pub fn plan<'a, C, D>(current: C, desired: D) -> LeasePlan
where
    C: IntoIterator<Item = &'a StaticLease>,
    D: IntoIterator<Item = &'a StaticLease>,
{
    let current: BTreeSet<StaticLease> = current.into_iter().cloned().collect();
    let desired: BTreeSet<StaticLease> = desired.into_iter().cloned().collect();

    LeasePlan {
        to_delete: current.difference(&desired).cloned().collect(),
        to_add: desired.difference(&current).cloned().collect(),
        unchanged: current.intersection(&desired).cloned().collect(),
    }
}

/// Execute a plan: all deletions, then all additions
pub async fn apply<A: StaticLeaseApi + ?Sized>(
    api: &A,
    plan: &LeasePlan,
) -> Result<(Vec<StaticLease>, Vec<StaticLease>)> {
    let mut deleted = Vec::with_capacity(plan.to_delete.len());
    for lease in &plan.to_delete {
        tracing::info!("[LeaseSync] Deleting {}", lease);
        api.delete_lease(lease).await?;
        deleted.push(lease.clone());
    }

    let mut added = Vec::with_capacity(plan.to_add.len());
    for lease in &plan.to_add {
        tracing::info!("[LeaseSync] Adding {}", lease);
        api.add_lease(lease).await?;
        added.push(lease.clone());
    }

    Ok((deleted, added))
}

/// List, diff, apply, then re-list for the report
pub async fn reconcile<A: StaticLeaseApi + ?Sized>(
    api: &A,
    desired: &[StaticLease],
) -> Result<SyncReport> {
    let current = api.list_leases().await?;
    let plan = plan(&current, desired);
    log_plan(&plan);

    let (deleted, added) = apply(api, &plan).await?;
    let final_leases = api.list_leases().await?;

    Ok(SyncReport {
        deleted,
        added,
        unchanged: plan.unchanged.len(),
        final_leases,
    })
}

/// Authenticate against the configured router and sync its leases.
///
/// With `sync.dry_run` the plan is computed and logged but nothing is changed.
pub async fn run(config: &Config) -> Result<SyncReport> {
    let router = &config.router;
    let mut client = LiveboxClient::new(
        &router.base_url,
        router.timeout_secs.map(Duration::from_secs),
    )?;
    client.authenticate(&router.username, &router.password).await?;

    if config.sync.dry_run {
        return dry_run(&client, &config.leases).await;
    }

    reconcile(&client, &config.leases).await
}

async fn dry_run<A: StaticLeaseApi + ?Sized>(
    api: &A,
    desired: &[StaticLease],
) -> Result<SyncReport> {
    let current = api.list_leases().await?;
    let plan = plan(&current, desired);
    log_plan(&plan);

    for lease in &plan.to_delete {
        tracing::info!("[LeaseSync] (dry run) would delete {}", lease);
    }
    for lease in &plan.to_add {
        tracing::info!("[LeaseSync] (dry run) would add {}", lease);
    }

    Ok(SyncReport {
        deleted: Vec::new(),
        added: Vec::new(),
        unchanged: plan.unchanged.len(),
        final_leases: current,
    })
}

fn log_plan(plan: &LeasePlan) {
    if plan.is_empty() {
        tracing::info!(
            "[LeaseSync] Router already in sync ({} leases)",
            plan.unchanged.len()
        );
    } else {
        tracing::info!(
            "[LeaseSync] Plan: {} to delete, {} to add, {} unchanged",
            plan.to_delete.len(),
            plan.to_add.len(),
            plan.unchanged.len()
        );
    }
}
