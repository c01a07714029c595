//! Livebox sysbus integration module
//!
//! - `client`: Low-level API client (session handling, HTTP requests)
//! - `sync`: Static lease reconciliation

pub mod client;
pub mod sync;

pub use client::LiveboxClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::StaticLease;

/// Static lease operations the reconciler drives
#[async_trait]
pub trait StaticLeaseApi: Send + Sync {
    /// Fetch the leases currently configured on the router
    async fn list_leases(&self) -> Result<Vec<StaticLease>>;

    /// Add a MAC → IPv4 binding
    async fn add_lease(&self, lease: &StaticLease) -> Result<()>;

    /// Remove the binding for the lease's MAC
    async fn delete_lease(&self, lease: &StaticLease) -> Result<()>;
}
