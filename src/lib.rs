pub mod config;
pub mod errors;
pub mod models;
pub mod parsers;
pub mod services;

pub use errors::PluginError;
pub use models::record::{Record, ScanMode};
pub use services::asset_store::{AssetStore, InMemoryAssetStore};
pub use services::plugin::{GoohostPlugin, RunOutcome};
