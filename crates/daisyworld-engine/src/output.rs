//! Record output to files.
//!
//! Opens the configured output file, wraps it in the sink matching
//! `output.format`, and drives a run into it.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use daisyworld_core::config::OutputFormat;
use daisyworld_core::{
    CancelSignal, CsvSink, JsonLinesSink, SimulationConfig, SimulationResult, run_with_sink,
};
use tracing::info;

use crate::error::EngineError;

/// Run `config` and write its records to `path`.
///
/// # Errors
///
/// Returns [`EngineError::Output`] if the file cannot be created, or
/// [`EngineError::Runner`] if the run or a write fails.
pub fn run_to_file(
    config: &SimulationConfig,
    path: &Path,
    cancel: &CancelSignal,
) -> Result<SimulationResult, EngineError> {
    let file = File::create(path).map_err(|source| EngineError::Output {
        path: path.display().to_string(),
        source,
    })?;
    let writer = BufWriter::new(file);

    let result = match config.output.format {
        OutputFormat::Csv => {
            let mut sink = CsvSink::new(writer).with_percent(config.output.percent);
            run_with_sink(config, &mut sink, cancel)?
        }
        OutputFormat::JsonLines => {
            let mut sink = JsonLinesSink::new(writer);
            run_with_sink(config, &mut sink, cancel)?
        }
    };

    info!(
        path = %path.display(),
        records = result.records.len(),
        "Records written"
    );
    Ok(result)
}

/// Output path for one sweep run: the base file name with the luminosity
/// appended to its stem (`world stats.csv` -> `world stats-L1.2.csv`).
pub fn sweep_output_path(base: &Path, luminosity: f64) -> PathBuf {
    let stem = base
        .file_stem()
        .map_or_else(|| "sweep".to_owned(), |s| s.to_string_lossy().into_owned());
    let file_name = base.extension().map_or_else(
        || format!("{stem}-L{luminosity}"),
        |ext| format!("{stem}-L{luminosity}.{}", ext.to_string_lossy()),
    );
    base.with_file_name(file_name)
}
