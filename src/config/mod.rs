//! Configuration module

use std::collections::HashSet;
use std::net::Ipv4Addr;

use serde::Deserialize;

use crate::error::{Result, SyncError};
use crate::models::StaticLease;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    /// Desired static leases. An empty list removes every lease on the router.
    #[serde(default)]
    pub leases: Vec<StaticLease>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouterConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Per-request timeout. No timeout is applied when absent.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            username: default_username(),
            password: String::new(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncConfig {
    /// Compute and log the plan without touching the router.
    #[serde(default)]
    pub dry_run: bool,
}

fn default_base_url() -> String {
    "http://192.168.1.1".to_string()
}

fn default_username() -> String {
    "admin".to_string()
}

impl Config {
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("LEASESYNC").separator("__"))
            .build()
            .map_err(|e| SyncError::Config(e.to_string()))?;

        Self::from_settings(settings)
    }

    fn from_settings(settings: config::Config) -> Result<Self> {
        let config: Config = settings
            .try_deserialize()
            .map_err(|e| SyncError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.router.base_url).map_err(|e| {
            SyncError::Config(format!("invalid router.base_url '{}': {}", self.router.base_url, e))
        })?;

        if self.router.password.is_empty() {
            return Err(SyncError::Config("router.password is required".to_string()));
        }

        let mut seen_macs = HashSet::new();
        for lease in &self.leases {
            if !is_valid_mac(lease.mac()) {
                return Err(SyncError::Config(format!(
                    "lease {}: MAC must be six colon-separated hex octets",
                    lease
                )));
            }
            if lease.ipv4().parse::<Ipv4Addr>().is_err() {
                return Err(SyncError::Config(format!(
                    "lease {}: '{}' is not an IPv4 address",
                    lease,
                    lease.ipv4()
                )));
            }
            if !seen_macs.insert(lease.mac()) {
                return Err(SyncError::Config(format!(
                    "duplicate desired lease for MAC {}",
                    lease.mac()
                )));
            }
        }

        Ok(())
    }
}

fn is_valid_mac(mac: &str) -> bool {
    let octets: Vec<&str> = mac.split(':').collect();
    octets.len() == 6
        && octets
            .iter()
            .all(|o| o.len() == 2 && o.chars().all(|c| c.is_ascii_hexdigit()))
}
