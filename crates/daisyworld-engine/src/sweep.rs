//! Luminosity sweep: independent runs that differ only in solar luminosity.
//!
//! Each run is CPU-bound and self-contained, so every luminosity gets its
//! own blocking worker. All workers share one [`CancelSignal`]; raising it
//! stops every run at its next tick boundary.

use std::path::{Path, PathBuf};

use daisyworld_core::{CancelSignal, SimulationConfig, SimulationResult};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::error::EngineError;
use crate::output;

/// Outcome of one sweep run.
#[derive(Debug)]
pub struct SweepPoint {
    /// Solar luminosity of this run.
    pub luminosity: f64,
    /// File the records were written to.
    pub path: PathBuf,
    /// Run result, or the error that stopped it.
    pub outcome: Result<SimulationResult, EngineError>,
}

/// Run every configured luminosity in parallel.
///
/// A failing point (e.g. zero luminosity) does not stop the others; its
/// error is kept in [`SweepPoint::outcome`]. Points are returned in
/// ascending luminosity order.
///
/// The configuration is validated before any worker starts; a luminosity
/// listed twice would map two workers onto the same output file.
///
/// # Errors
///
/// Returns [`EngineError::Config`] if the configuration is invalid, or
/// [`EngineError::Worker`] if a worker task panics.
pub async fn run_sweep(
    config: &SimulationConfig,
    cancel: &CancelSignal,
) -> Result<Vec<SweepPoint>, EngineError> {
    config.validate()?;
    let base = Path::new(&config.output.path);
    let mut workers = JoinSet::new();

    for &luminosity in &config.sweep.luminosities {
        let point_config = config.with_luminosity(luminosity);
        let path = output::sweep_output_path(base, luminosity);
        let cancel = cancel.clone();
        workers.spawn_blocking(move || {
            let outcome = output::run_to_file(&point_config, &path, &cancel);
            SweepPoint {
                luminosity,
                path,
                outcome,
            }
        });
    }

    info!(points = workers.len(), "Luminosity sweep started");

    let mut points = Vec::with_capacity(workers.len());
    while let Some(joined) = workers.join_next().await {
        let point = joined.map_err(|e| EngineError::Worker {
            message: format!("{e}"),
        })?;
        points.push(point);
    }

    points.sort_by(|a, b| a.luminosity.total_cmp(&b.luminosity));
    Ok(points)
}

/// Log one line per sweep point: the luminosity-response curve.
pub fn log_sweep(points: &[SweepPoint]) {
    for point in points {
        match &point.outcome {
            Ok(result) => {
                if let Some(record) = result.final_record() {
                    info!(
                        luminosity = point.luminosity,
                        white = record.white_fraction,
                        black = record.black_fraction,
                        temperature = record.planetary_temperature,
                        end_reason = ?result.end_reason,
                        path = %point.path.display(),
                        "Sweep point"
                    );
                }
            }
            Err(e) => {
                warn!(
                    luminosity = point.luminosity,
                    error = %e,
                    "Sweep point failed"
                );
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sweep_config(name: &str, luminosities: Vec<f64>) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.run.tick_count = 50;
        config.sweep.luminosities = luminosities;
        config.output.path = std::env::temp_dir()
            .join(format!("daisyworld-sweep-{}-{name}.csv", std::process::id()))
            .display()
            .to_string();
        config
    }

    fn cleanup(points: &[SweepPoint]) {
        for point in points {
            let _ = std::fs::remove_file(&point.path);
        }
    }

    #[tokio::test]
    async fn sweep_returns_points_in_luminosity_order() {
        let config = sweep_config("order", vec![1.2, 0.8, 1.0]);
        let points = run_sweep(&config, &CancelSignal::new()).await.unwrap();
        log_sweep(&points);
        cleanup(&points);

        let order: Vec<f64> = points.iter().map(|p| p.luminosity).collect();
        assert_eq!(order.len(), 3);
        assert!(order.windows(2).all(|w| w.first() < w.get(1)));
        assert!(points.iter().all(|p| p.outcome.is_ok()));
    }

    #[tokio::test]
    async fn sweep_point_matches_single_run() {
        let config = sweep_config("match", vec![1.1]);
        let points = run_sweep(&config, &CancelSignal::new()).await.unwrap();
        cleanup(&points);

        let expected = daisyworld_core::run(&config.with_luminosity(1.1)).unwrap();
        let point = points.first().unwrap();
        let result = point.outcome.as_ref().unwrap();
        assert!(
            result
                .final_record()
                .unwrap()
                .bitwise_eq(expected.last().unwrap())
        );
    }

    #[tokio::test]
    async fn failing_point_does_not_stop_the_sweep() {
        let config = sweep_config("fail", vec![0.0, 1.0]);
        let points = run_sweep(&config, &CancelSignal::new()).await.unwrap();
        cleanup(&points);

        let dark = points.first().unwrap();
        assert!(matches!(dark.outcome, Err(EngineError::Runner { .. })));
        assert!(points.get(1).unwrap().outcome.is_ok());
    }

    #[tokio::test]
    async fn cancelled_sweep_returns_partial_runs() {
        let config = sweep_config("cancel", vec![0.9, 1.1]);
        let cancel = CancelSignal::new();
        cancel.request_stop();

        let points = run_sweep(&config, &cancel).await.unwrap();
        cleanup(&points);

        for point in &points {
            let result = point.outcome.as_ref().unwrap();
            assert_eq!(result.records.len(), 1);
        }
    }

    #[tokio::test]
    async fn repeated_luminosity_is_rejected_before_any_file_is_written() {
        let config = sweep_config("repeat", vec![1.0; 8]);
        let result = run_sweep(&config, &CancelSignal::new()).await;

        assert!(matches!(result, Err(EngineError::Config { .. })));
        let path = output::sweep_output_path(Path::new(&config.output.path), 1.0);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn every_point_writes_its_own_file() {
        let config = sweep_config("distinct", vec![0.8, 0.9, 1.0, 1.1]);
        let points = run_sweep(&config, &CancelSignal::new()).await.unwrap();
        cleanup(&points);

        let mut paths: Vec<&PathBuf> = points.iter().map(|p| &p.path).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 4);
    }

    #[tokio::test]
    async fn empty_sweep_runs_nothing() {
        let config = sweep_config("empty", Vec::new());
        let points = run_sweep(&config, &CancelSignal::new()).await.unwrap();
        assert!(points.is_empty());
    }
}
