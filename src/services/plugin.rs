//! Host-facing goohost plugin.
//!
//! The host application calls `process_command_string` before running a
//! command and `parse_output_string` with the captured stdout afterwards.
//! The plugin finds the report goohost wrote, parses it for the configured
//! scan mode and registers the results in the host's asset store.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::errors::PluginError;
use crate::models::record::{Record, ScanMode};
use crate::parsers::GoohostParser;
use crate::services::asset_store::AssetStore;
use crate::services::ingestion::{self, IngestionResult};
use crate::services::locator::ReportLocator;
use crate::services::resolver::{Resolver, SystemResolver};

pub const PLUGIN_ID: &str = "Goohost";
pub const PLUGIN_NAME: &str = "Goohost XML Output Plugin";
pub const PLUGIN_VERSION: &str = "0.0.1";

static COMMAND_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(sudo goohost\.sh|goohost\.sh|sh goohost\.sh|\./goohost\.sh)")
        .expect("command pattern is valid")
});

/// Result of handing captured output to the plugin.
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// No report yet: the marker is missing or the file does not exist.
    NotReady,
    /// IP or HOST mode records were registered in the asset store.
    Ingested(IngestionResult),
    /// RAW mode: the lines are handed back and nothing is registered.
    Raw { path: PathBuf, lines: Vec<String> },
}

/// goohost output plugin.
pub struct GoohostPlugin<R = SystemResolver> {
    mode: ScanMode,
    resolver: R,
    locator: ReportLocator,
    current_path: Option<PathBuf>,
}

impl GoohostPlugin<SystemResolver> {
    pub fn new(mode: ScanMode) -> Self {
        Self::with_resolver(mode, SystemResolver::new())
    }
}

impl<R: Resolver> GoohostPlugin<R> {
    pub fn with_resolver(mode: ScanMode, resolver: R) -> Self {
        Self {
            mode,
            resolver,
            locator: ReportLocator::new(),
            current_path: None,
        }
    }

    pub fn id(&self) -> &str {
        PLUGIN_ID
    }

    pub fn name(&self) -> &str {
        PLUGIN_NAME
    }

    pub fn version(&self) -> &str {
        PLUGIN_VERSION
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// The located report path, once known.
    pub fn report_path(&self) -> Option<&Path> {
        self.locator.location()
    }

    /// Whether `command` is a goohost invocation this plugin handles.
    pub fn matches_command(&self, command: &str) -> bool {
        COMMAND_PATTERN.is_match(command)
    }

    /// Reject commands this plugin does not handle.
    pub fn validate_command(&self, command: &str) -> Result<(), PluginError> {
        if self.matches_command(command) {
            Ok(())
        } else {
            Err(PluginError::Validation(format!(
                "not a goohost command: {command}"
            )))
        }
    }

    /// Record the directory the next command runs from.
    pub fn process_command_string(&mut self, username: &str, current_path: &Path, command: &str) {
        tracing::debug!(
            username,
            path = %current_path.display(),
            command,
            "Processing goohost command"
        );
        self.current_path = Some(current_path.to_path_buf());
    }

    /// Locate, parse and ingest the report announced in `output`.
    ///
    /// The captured output itself is not parsed; it only tells where the
    /// report was written.
    pub fn parse_output_string<S>(
        &mut self,
        output: &str,
        store: &mut S,
    ) -> Result<RunOutcome, PluginError>
    where
        S: AssetStore + ?Sized,
    {
        let working_dir = self.working_dir()?;
        let Some(path) = self.locator.locate(output, &working_dir).map(Path::to_path_buf) else {
            tracing::debug!("No results marker in captured output yet");
            return Ok(RunOutcome::NotReady);
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Report not written yet");
            return Ok(RunOutcome::NotReady);
        }

        let parser = GoohostParser::new(self.mode, &self.resolver);
        let records = parser.parse(&path)?;

        if !self.mode.is_ingestible() {
            let mut lines = Vec::new();
            for record in records {
                if let Record::Raw { line } = record? {
                    lines.push(line);
                }
            }
            tracing::debug!(path = %path.display(), lines = lines.len(), "Raw goohost report read");
            return Ok(RunOutcome::Raw { path, lines });
        }

        tracing::info!(path = %path.display(), mode = %self.mode, "Ingesting goohost report");
        let result = ingestion::ingest(records, store, parser.source_tool())?;
        Ok(RunOutcome::Ingested(result))
    }

    fn working_dir(&self) -> Result<PathBuf, PluginError> {
        match &self.current_path {
            Some(path) => Ok(path.clone()),
            None => std::env::current_dir().map_err(|e| PluginError::io(".", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::asset_store::InMemoryAssetStore;
    use crate::services::resolver::Resolution;
    use std::fs;

    struct NoDns;

    impl Resolver for NoDns {
        fn resolve(&self, _hostname: &str) -> Resolution {
            Resolution::Unresolved
        }
    }

    #[test]
    fn identity() {
        let plugin = GoohostPlugin::new(ScanMode::Host);
        assert_eq!(plugin.id(), "Goohost");
        assert_eq!(plugin.name(), "Goohost XML Output Plugin");
        assert_eq!(plugin.version(), "0.0.1");
        assert_eq!(plugin.mode(), ScanMode::Host);
    }

    #[test]
    fn matches_goohost_commands() {
        let plugin = GoohostPlugin::new(ScanMode::Host);
        assert!(plugin.matches_command("goohost.sh -t example.com -m host"));
        assert!(plugin.matches_command("sudo goohost.sh -t example.com"));
        assert!(plugin.matches_command("sh goohost.sh -t example.com"));
        assert!(plugin.matches_command("./goohost.sh -t example.com"));
        assert!(!plugin.matches_command("nmap -sV example.com"));
        assert!(!plugin.matches_command("cat goohost.sh"));
    }

    #[test]
    fn leading_whitespace_is_not_a_goohost_command() {
        let plugin = GoohostPlugin::new(ScanMode::Host);
        assert!(!plugin.matches_command("  goohost.sh -t example.com"));
    }

    #[test]
    fn validate_command_rejects_other_tools() {
        let plugin = GoohostPlugin::new(ScanMode::Ip);
        assert!(plugin.validate_command("goohost.sh -t example.com -m ip").is_ok());

        let err = plugin.validate_command("nmap -sV example.com").unwrap_err();
        assert!(matches!(err, PluginError::Validation(_)));
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(
            err.to_string(),
            "Validation error: not a goohost command: nmap -sV example.com"
        );
    }

    #[test]
    fn not_ready_without_marker() {
        let dir = tempfile::tempdir().unwrap();
        let mut plugin = GoohostPlugin::with_resolver(ScanMode::Ip, NoDns);
        plugin.process_command_string("alice", dir.path(), "goohost.sh -t example.com -m ip");
        let mut store = InMemoryAssetStore::new();

        let outcome = plugin.parse_output_string("Searching...\n", &mut store).unwrap();
        assert_eq!(outcome, RunOutcome::NotReady);
        assert!(plugin.report_path().is_none());
    }

    #[test]
    fn not_ready_until_file_exists() {
        let dir = tempfile::tempdir().unwrap();
        let mut plugin = GoohostPlugin::with_resolver(ScanMode::Ip, NoDns);
        plugin.process_command_string("alice", dir.path(), "goohost.sh -t example.com -m ip");
        let mut store = InMemoryAssetStore::new();
        let output = "Results saved in file report-example.com.txt\n";

        let outcome = plugin.parse_output_string(output, &mut store).unwrap();
        assert_eq!(outcome, RunOutcome::NotReady);
        assert_eq!(
            plugin.report_path(),
            Some(dir.path().join("report-example.com.txt").as_path())
        );

        fs::write(
            dir.path().join("report-example.com.txt"),
            "alpha.example.com 10.0.0.5\n",
        )
        .unwrap();
        let outcome = plugin.parse_output_string(output, &mut store).unwrap();
        assert!(matches!(outcome, RunOutcome::Ingested(ref r) if r.hosts_registered == 1));
    }

    #[test]
    fn raw_mode_returns_lines_without_touching_store() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("mails.txt"), "a@example.com\nb@example.com\n").unwrap();
        let mut plugin = GoohostPlugin::with_resolver(ScanMode::Raw, NoDns);
        plugin.process_command_string("alice", dir.path(), "goohost.sh -t example.com -m mail");
        let mut store = InMemoryAssetStore::new();

        let outcome = plugin
            .parse_output_string("Results saved in file mails.txt", &mut store)
            .unwrap();
        match outcome {
            RunOutcome::Raw { lines, .. } => assert_eq!(lines, vec!["a@example.com", "b@example.com"]),
            other => panic!("expected raw outcome, got {other:?}"),
        }
        assert!(store.hosts().is_empty());
    }

    #[test]
    fn outcome_serializes_with_status() {
        let json = serde_json::to_value(RunOutcome::NotReady).unwrap();
        assert_eq!(json["status"], "not_ready");
    }
}
