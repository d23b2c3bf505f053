//! Scan modes and the records parsed out of a goohost report.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::errors::PluginError;
use crate::services::resolver::Resolution;

/// goohost scan type, selecting the report line format.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// `<hostname> <ip>` per line.
    Ip,
    /// `<hostname>` per line, resolved through DNS.
    #[default]
    Host,
    /// Unparsed lines. Never submitted to the asset store.
    Raw,
}

impl ScanMode {
    /// Whether records of this mode are registered in the asset inventory.
    pub fn is_ingestible(&self) -> bool {
        matches!(self, Self::Ip | Self::Host)
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip => write!(f, "ip"),
            Self::Host => write!(f, "host"),
            Self::Raw => write!(f, "raw"),
        }
    }
}

impl FromStr for ScanMode {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ip" => Ok(Self::Ip),
            "host" => Ok(Self::Host),
            // goohost's mail scan lists e-mail addresses; nothing to ingest.
            "raw" | "mail" => Ok(Self::Raw),
            other => Err(PluginError::Config(format!("unknown scan type: {other}"))),
        }
    }
}

/// One parsed report line.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Record {
    /// IP or HOST mode line.
    Host {
        host: String,
        ip: String,
        /// Present for HOST mode lines only.
        #[serde(skip_serializing_if = "Option::is_none")]
        resolution: Option<Resolution>,
    },
    /// RAW mode line.
    Raw { line: String },
}

impl Record {
    /// Address and hostname for ingestible records.
    pub fn host_and_ip(&self) -> Option<(&str, &str)> {
        match self {
            Self::Host { host, ip, .. } => Some((host.as_str(), ip.as_str())),
            Self::Raw { .. } => None,
        }
    }
}
