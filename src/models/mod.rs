//! Data models

use std::fmt;

use serde::Deserialize;

/// A fixed MAC → IPv4 binding on the router's DHCP server.
///
/// Both fields are compared exactly as given: `"AA:BB:.."` and `"aa:bb:.."`
/// are different leases.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
pub struct StaticLease {
    mac: String,
    ipv4: String,
}

impl StaticLease {
    pub fn new(mac: impl Into<String>, ipv4: impl Into<String>) -> Self {
        Self {
            mac: mac.into(),
            ipv4: ipv4.into(),
        }
    }

    pub fn mac(&self) -> &str {
        &self.mac
    }

    pub fn ipv4(&self) -> &str {
        &self.ipv4
    }
}

impl fmt::Display for StaticLease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.mac, self.ipv4)
    }
}
