//! Ingestion of parsed records into the asset inventory.
//!
//! Each IP/HOST record becomes a host keyed by its address plus an
//! interface carrying the reported hostname. Malformed lines are skipped
//! and reported; I/O and store failures abort the pass, leaving whatever
//! was already registered in place.

use serde::Serialize;

use crate::errors::PluginError;
use crate::models::record::Record;
use crate::parsers::ParseError;
use crate::services::asset_store::AssetStore;

/// Summary of an ingestion pass.
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct IngestionResult {
    pub source_tool: String,
    pub total_parsed: usize,
    /// `ensure_host` calls made; repeated addresses count each time.
    pub hosts_registered: usize,
    pub interfaces_registered: usize,
    /// Hostnames that did not resolve and were stored as-is.
    pub unresolved: usize,
    #[serde(rename = "errors")]
    pub error_count: usize,
    pub error_details: Vec<ParseError>,
}

/// Register every record in `store`.
///
/// RAW records carry no address and are never submitted.
pub fn ingest<I, S>(
    records: I,
    store: &mut S,
    source_tool: &str,
) -> Result<IngestionResult, PluginError>
where
    I: IntoIterator<Item = Result<Record, PluginError>>,
    S: AssetStore + ?Sized,
{
    let mut result = IngestionResult {
        source_tool: source_tool.to_string(),
        ..Default::default()
    };

    for item in records {
        let record = match item {
            Ok(record) => record,
            Err(PluginError::MalformedLine(err)) => {
                tracing::warn!(line = err.line, reason = %err.message, "Skipping malformed report line");
                result.error_details.push(err);
                continue;
            }
            Err(e) => return Err(e),
        };

        result.total_parsed += 1;
        if let Record::Host {
            resolution: Some(res),
            ..
        } = &record
        {
            if !res.is_resolved() {
                result.unresolved += 1;
            }
        }

        let Some((hostname, address)) = record.host_and_ip() else {
            continue;
        };

        let host_id = store.ensure_host(address)?;
        result.hosts_registered += 1;
        store.ensure_interface(host_id, address, hostname)?;
        result.interfaces_registered += 1;
    }

    result.error_count = result.error_details.len();

    tracing::info!(
        source_tool,
        total_parsed = result.total_parsed,
        hosts = result.hosts_registered,
        errors = result.error_count,
        "Ingestion complete"
    );

    Ok(result)
}
