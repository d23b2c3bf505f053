//! Asset inventory collaborator.
//!
//! The host application owns the real inventory; the plugin only needs two
//! idempotent upserts. `InMemoryAssetStore` stands in for the host when the
//! plugin runs on its own.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::errors::PluginError;
use crate::models::asset::{Host, Interface};

/// Idempotent host/interface registration offered by the host application.
pub trait AssetStore {
    /// Ensure a host for `address` exists and return its id.
    fn ensure_host(&mut self, address: &str) -> Result<Uuid, PluginError>;

    /// Ensure an interface for `address` on `host_id` exists, associating
    /// `hostname` with it, and return the interface id.
    fn ensure_interface(
        &mut self,
        host_id: Uuid,
        address: &str,
        hostname: &str,
    ) -> Result<Uuid, PluginError>;
}

/// In-process inventory keyed by address.
#[derive(Debug, Default)]
pub struct InMemoryAssetStore {
    hosts: Vec<Host>,
    interfaces: Vec<Interface>,
    host_index: HashMap<String, usize>,
    interface_index: HashMap<(Uuid, String), usize>,
}

/// Serializable view of the inventory.
#[derive(Debug, Serialize)]
pub struct Inventory<'a> {
    pub hosts: &'a [Host],
    pub interfaces: &'a [Interface],
}

impl InMemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hosts(&self) -> &[Host] {
        &self.hosts
    }

    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    pub fn host_by_name(&self, name: &str) -> Option<&Host> {
        self.host_index.get(name).map(|&i| &self.hosts[i])
    }

    pub fn interfaces_of(&self, host_id: Uuid) -> impl Iterator<Item = &Interface> {
        self.interfaces.iter().filter(move |i| i.host_id == host_id)
    }

    pub fn inventory(&self) -> Inventory<'_> {
        Inventory {
            hosts: &self.hosts,
            interfaces: &self.interfaces,
        }
    }
}

impl AssetStore for InMemoryAssetStore {
    fn ensure_host(&mut self, address: &str) -> Result<Uuid, PluginError> {
        if let Some(&i) = self.host_index.get(address) {
            return Ok(self.hosts[i].id);
        }

        let host = Host::new(address);
        let id = host.id;
        tracing::debug!(host_id = %id, address, "Created host");
        self.host_index.insert(address.to_string(), self.hosts.len());
        self.hosts.push(host);
        Ok(id)
    }

    fn ensure_interface(
        &mut self,
        host_id: Uuid,
        address: &str,
        hostname: &str,
    ) -> Result<Uuid, PluginError> {
        if !self.hosts.iter().any(|h| h.id == host_id) {
            return Err(PluginError::Store(format!("unknown host id {host_id}")));
        }

        let key = (host_id, address.to_string());
        let index = match self.interface_index.get(&key) {
            Some(&i) => i,
            None => {
                let iface = Interface::new(host_id, address);
                tracing::debug!(interface_id = %iface.id, %host_id, address, "Created interface");
                self.interface_index.insert(key, self.interfaces.len());
                self.interfaces.push(iface);
                self.interfaces.len() - 1
            }
        };

        let iface = &mut self.interfaces[index];
        iface.add_hostname(hostname);
        Ok(iface.id)
    }
}
