//! Plugin services: report location, DNS resolution, asset registration.

pub mod asset_store;
pub mod ingestion;
pub mod locator;
pub mod plugin;
pub mod resolver;
