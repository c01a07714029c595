//! livebox-lease-sync - DHCP static lease reconciler
//!
//! Logs into a Livebox, compares its static DHCP leases with the list in
//! the configuration, deletes the obsolete ones and adds the missing ones.

mod config;
mod error;
mod livebox;
mod models;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::livebox::sync::SyncReport;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "livebox_lease_sync=info".into()),
        )
        .init();

    let config = config::Config::load()?;
    tracing::info!(
        "Configuration loaded: {} desired leases for {}",
        config.leases.len(),
        config.router.base_url
    );

    let report = livebox::sync::run(&config).await?;
    print_report(&report);

    Ok(())
}

fn print_report(report: &SyncReport) {
    tracing::info!(
        "Sync finished: {} deleted, {} added, {} unchanged",
        report.deleted.len(),
        report.added.len(),
        report.unchanged
    );

    if report.final_leases.is_empty() {
        println!("No static leases.");
        return;
    }

    println!("{:<20} {:<16}", "MAC Address", "IP Address");
    println!("{}", "-".repeat(36));
    for lease in &report.final_leases {
        println!("{:<20} {:<16}", lease.mac(), lease.ipv4());
    }
}
