//! Daisyworld engine binary.
//!
//! This is the main entry point that wires together configuration, the
//! simulation runner, and record output. It runs the primary simulation,
//! writes its record stream for the chart renderer, and optionally runs a
//! luminosity sweep.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `daisyworld-config.yaml` (or `DAISYWORLD_CONFIG`);
//!    the file is required
//! 2. Initialize structured logging (tracing)
//! 3. Validate configuration
//! 4. Install the Ctrl-C handler that raises the shared cancel signal
//! 5. Run the primary simulation into the configured output file
//! 6. Run the luminosity sweep, if configured
//! 7. Log the results

mod error;
mod output;
mod sweep;

use std::path::{Path, PathBuf};

use daisyworld_core::config::LoggingConfig;
use daisyworld_core::runner;
use daisyworld_core::{CancelSignal, SimulationConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

/// Environment variable naming the configuration file.
const CONFIG_PATH_ENV: &str = "DAISYWORLD_CONFIG";

/// Configuration file used when `DAISYWORLD_CONFIG` is not set.
const DEFAULT_CONFIG_PATH: &str = "daisyworld-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the output file cannot be
/// written, or the primary run hits a domain error.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = config_path();
    let config = load_config(&config_path)?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!(path = %config_path.display(), "daisyworld-engine starting");

    // 3. Validate before anything runs.
    config.validate().map_err(EngineError::from)?;
    info!(
        tick_count = config.run.tick_count,
        luminosity = config.planet.solar_luminosity,
        output = %config.output.path,
        sweep_points = config.sweep.luminosities.len(),
        "Configuration loaded"
    );

    // 4. Ctrl-C stops every run at its next tick boundary.
    let cancel = CancelSignal::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, stopping at next tick");
                cancel.request_stop();
            }
        });
    }

    // 5. Primary run.
    let primary_config = config.clone();
    let primary_cancel = cancel.clone();
    let result = tokio::task::spawn_blocking(move || {
        let path = PathBuf::from(&primary_config.output.path);
        output::run_to_file(&primary_config, &path, &primary_cancel)
    })
    .await
    .map_err(|e| EngineError::Worker {
        message: format!("{e}"),
    })??;
    runner::log_simulation_end(&result);

    // 6. Luminosity sweep.
    if !config.sweep.luminosities.is_empty() && !cancel.is_stop_requested() {
        let points = sweep::run_sweep(&config, &cancel).await?;
        sweep::log_sweep(&points);
    }

    // 7. Done.
    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "daisyworld-engine shutdown complete"
    );

    Ok(())
}

/// Resolve the configuration file path from the environment.
fn config_path() -> PathBuf {
    std::env::var(CONFIG_PATH_ENV).map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// Load the simulation configuration.
///
/// The file must exist and state every required model parameter.
fn load_config(path: &Path) -> Result<SimulationConfig, EngineError> {
    if !path.exists() {
        return Err(EngineError::MissingConfig {
            path: path.display().to_string(),
        });
    }
    Ok(SimulationConfig::from_file(path)?)
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `logging.level`.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}
