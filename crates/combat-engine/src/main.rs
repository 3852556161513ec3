//! Combat engine replay binary.
//!
//! Replays a scenario of host notifications against an in-memory host and
//! prints a JSON report of the deaths, cancellations and drops it saw.
//!
//! ```text
//! combat-engine [SCENARIO] [CONFIG]
//! ```
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `CONFIG` (default `combat-config.yaml`, or
//!    built-in defaults when that file does not exist)
//! 2. Initialize structured logging (`RUST_LOG`, else the configured level)
//! 3. Load the scenario from `SCENARIO` (default `demos/duel.yaml`)
//! 4. Replay it
//! 5. Print the report

mod error;
mod replay;
mod scenario;

use std::path::{Path, PathBuf};

use combat_core::CombatConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::scenario::Scenario;

const DEFAULT_SCENARIO: &str = "demos/duel.yaml";
const DEFAULT_CONFIG: &str = "combat-config.yaml";

/// Application entry point for the combat engine.
///
/// # Errors
///
/// Returns an error if configuration or the scenario cannot be loaded, or
/// the replay fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let scenario_path = args
        .next()
        .map_or_else(|| PathBuf::from(DEFAULT_SCENARIO), PathBuf::from);
    let config_path = args
        .next()
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);

    // 1. Load configuration.
    let config = load_config(&config_path)?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(
        retention_ticks = config.tracker.retention_ticks,
        max_entries = config.tracker.max_entries,
        tick_interval_ms = config.scheduler.tick_interval_ms,
        "Configuration loaded"
    );

    // 3. Load the scenario.
    let scenario = Scenario::from_file(&scenario_path).map_err(EngineError::from)?;
    info!(path = %scenario_path.display(), "Scenario loaded");

    // 4. Replay.
    let report = replay::replay(&config, &scenario).await?;

    // 5. Print the report.
    let json = serde_json::to_string_pretty(&report).map_err(EngineError::from)?;
    println!("{json}");

    info!("combat-engine finished");
    Ok(())
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist.
fn load_config(path: &Path) -> Result<CombatConfig, EngineError> {
    if path.exists() {
        Ok(CombatConfig::from_file(path)?)
    } else {
        Ok(CombatConfig::default())
    }
}
