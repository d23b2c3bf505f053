use std::env;
use std::path::PathBuf;

use crate::errors::PluginError;
use crate::models::record::ScanMode;

/// Plugin configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct PluginConfig {
    pub scan_mode: ScanMode,
    pub working_dir: Option<PathBuf>,
    pub command: Option<String>,
    pub username: String,
}

impl PluginConfig {
    pub fn from_env() -> Result<Self, PluginError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PluginError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            scan_mode: lookup("GOOHOST_SCAN_TYPE")
                .map(|v| v.parse::<ScanMode>())
                .transpose()?
                .unwrap_or_default(),
            working_dir: lookup("GOOHOST_WORKING_DIR")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
            command: lookup("GOOHOST_COMMAND").filter(|v| !v.trim().is_empty()),
            username: lookup("USER").unwrap_or_else(|| "unknown".to_string()),
        })
    }
}
