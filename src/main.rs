use std::io::{self, Read};
use std::process::ExitCode;

use goohost_plugin::config::PluginConfig;
use goohost_plugin::errors::{Envelope, PluginError};
use goohost_plugin::services::asset_store::{InMemoryAssetStore, Inventory};
use goohost_plugin::{GoohostPlugin, RunOutcome};
use mimalloc::MiMalloc;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// M-MIMALLOC-APP: Use mimalloc as global allocator for improved performance.
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// What a run hands back to the host application.
#[derive(Serialize)]
struct RunReport<'a> {
    plugin: &'a str,
    outcome: RunOutcome,
    inventory: Inventory<'a>,
}

fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "goohost_plugin=info".into()))
        .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
        .init();

    let config = match PluginConfig::from_env() {
        Ok(config) => config,
        Err(e) => return Ok(fail(&e)),
    };

    let mut plugin = GoohostPlugin::new(config.scan_mode);
    let command = config
        .command
        .clone()
        .unwrap_or_else(|| "goohost.sh".to_string());
    if let Err(e) = plugin.validate_command(&command) {
        return Ok(fail(&e));
    }

    let working_dir = match config.working_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    plugin.process_command_string(&config.username, &working_dir, &command);

    let mut output = String::new();
    io::stdin().read_to_string(&mut output)?;

    tracing::info!(
        mode = %config.scan_mode,
        working_dir = %working_dir.display(),
        "Starting goohost plugin run"
    );

    let mut store = InMemoryAssetStore::new();
    let outcome = match plugin.parse_output_string(&output, &mut store) {
        Ok(outcome) => outcome,
        Err(e) => return Ok(fail(&e)),
    };

    let report = RunReport {
        plugin: plugin.id(),
        outcome,
        inventory: store.inventory(),
    };
    println!("{}", serde_json::to_string_pretty(&Envelope::success(report))?);

    Ok(ExitCode::SUCCESS)
}

/// Report a failed run on stdout and pick the exit code.
fn fail(err: &PluginError) -> ExitCode {
    tracing::error!(code = err.code(), error = %err, "Plugin run failed");
    match serde_json::to_string_pretty(&Envelope::from_error(err)) {
        Ok(body) => println!("{body}"),
        Err(e) => tracing::error!(error = %e, "Failed to serialize error envelope"),
    }
    ExitCode::FAILURE
}
