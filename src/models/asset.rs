//! Asset inventory entities: hosts and their network interfaces.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A host in the asset inventory, keyed by its address.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Host {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A network interface attached to a host.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Interface {
    pub id: Uuid,
    pub host_id: Uuid,
    pub ipv4_address: String,
    /// Hostnames reported for this address, in first-seen order.
    pub hostnames: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Host {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }
}

impl Interface {
    pub fn new(host_id: Uuid, address: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            host_id,
            ipv4_address: address.to_string(),
            hostnames: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Add a hostname resolution unless it is already recorded.
    ///
    /// Returns `true` when the hostname was new.
    pub fn add_hostname(&mut self, hostname: &str) -> bool {
        if hostname.is_empty() || self.hostnames.iter().any(|h| h == hostname) {
            return false;
        }
        self.hostnames.push(hostname.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_hostname_ignores_duplicates() {
        let host = Host::new("10.0.0.5");
        let mut iface = Interface::new(host.id, "10.0.0.5");
        assert!(iface.add_hostname("alpha.example.com"));
        assert!(!iface.add_hostname("alpha.example.com"));
        assert!(iface.add_hostname("www.example.com"));
        assert_eq!(iface.hostnames, vec!["alpha.example.com", "www.example.com"]);
    }

    #[test]
    fn add_hostname_ignores_empty() {
        let mut iface = Interface::new(Uuid::new_v4(), "10.0.0.5");
        assert!(!iface.add_hostname(""));
        assert!(iface.hostnames.is_empty());
    }
}
