//! Simulation run orchestration.
//!
//! This module provides [`run_with_sink`], which drives one complete run:
//!
//! - **Init**: validate the configuration and build a [`SimulationClock`].
//! - **Iterate**: emit the tick-0 snapshot, then advance the clock until it
//!   completes, forwarding every record to the [`OutputSink`].
//! - **Cancel**: a raised [`CancelSignal`] is honoured at the next tick
//!   boundary; the partial record sequence is returned, not an error.
//! - **Terminate**: finalize the sink and report the result.
//!
//! [`run`] is the convenience form returning just the record sequence.
//!
//! Runs share no state, so any number of them can execute in parallel.

use daisyworld_types::TickRecord;
use tracing::{info, warn};

use crate::cancel::CancelSignal;
use crate::clock::SimulationClock;
use crate::config::{ConfigError, SimulationConfig};
use crate::energy::EnergyError;
use crate::sink::{MemorySink, OutputSink, SinkError};
use crate::tick::TickError;

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The configuration was rejected before any tick ran.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// A tick hit a physically invalid state and the run was aborted.
    #[error("domain error at tick {}: {source}", .last_record.tick)]
    Domain {
        /// The last record that was successfully produced.
        last_record: TickRecord,
        /// The underlying energy error.
        source: EnergyError,
    },

    /// The tick counter overflowed.
    #[error("tick counter overflow after tick {}", .last_record.tick)]
    TickOverflow {
        /// The last record that was successfully produced.
        last_record: TickRecord,
    },

    /// The output sink failed.
    #[error("sink error: {source}")]
    Sink {
        /// The underlying sink error.
        #[from]
        source: SinkError,
    },
}

impl RunnerError {
    /// The last valid record, for errors raised mid-run.
    pub const fn last_record(&self) -> Option<&TickRecord> {
        match self {
            Self::Domain { last_record, .. } | Self::TickOverflow { last_record } => {
                Some(last_record)
            }
            Self::Config { .. } | Self::Sink { .. } => None,
        }
    }
}

/// Reason why the simulation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEndReason {
    /// Every configured tick was executed.
    Completed,
    /// A [`CancelSignal`] stopped the run early.
    Cancelled,
}

/// Result of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// Every record emitted, starting with the tick-0 snapshot.
    pub records: Vec<TickRecord>,
    /// Number of ticks executed (excluding the snapshot).
    pub total_ticks: u64,
    /// Number of coverage drift corrections applied.
    pub drift_corrections: u64,
}

impl SimulationResult {
    /// The last record emitted.
    pub fn final_record(&self) -> Option<&TickRecord> {
        self.records.last()
    }
}

/// Run a simulation to completion and return its record sequence.
///
/// The sequence has `tick_count + 1` entries, including the tick-0 snapshot.
///
/// # Errors
///
/// Returns [`RunnerError::Config`] for invalid parameters or
/// [`RunnerError::Domain`] if a tick has no physical solution.
pub fn run(config: &SimulationConfig) -> Result<Vec<TickRecord>, RunnerError> {
    let mut sink = MemorySink::new();
    let result = run_with_sink(config, &mut sink, &CancelSignal::new())?;
    Ok(result.records)
}

/// Run a simulation, delivering each record to `sink`.
///
/// The sink receives the tick-0 snapshot first and then one record per
/// executed tick. It is finalized when the run completes or is cancelled.
/// On error it is left unfinalized.
///
/// # Errors
///
/// Returns [`RunnerError`] if the configuration is invalid, a tick fails,
/// or the sink fails.
pub fn run_with_sink(
    config: &SimulationConfig,
    sink: &mut dyn OutputSink,
    cancel: &CancelSignal,
) -> Result<SimulationResult, RunnerError> {
    let mut clock = SimulationClock::new(config.clone())?;

    info!(
        tick_count = clock.tick_count(),
        luminosity = config.planet.solar_luminosity,
        initial_white = config.planet.initial_white_fraction,
        initial_black = config.planet.initial_black_fraction,
        "Simulation starting"
    );

    let initial = clock.current_record();
    sink.accept(&initial)?;
    let mut records = vec![initial];
    let mut total_ticks: u64 = 0;

    let end_reason = loop {
        if clock.tick() >= clock.tick_count() {
            clock.finish();
            break SimulationEndReason::Completed;
        }

        // --- Check cancellation (tick boundary) ---
        if cancel.is_stop_requested() {
            info!(tick = clock.tick(), "Cancellation requested");
            break SimulationEndReason::Cancelled;
        }

        // --- Execute tick ---
        let record = clock.advance().map_err(|err| tick_failure(err, &clock))?;
        total_ticks = total_ticks.saturating_add(1);

        sink.accept(&record)?;
        records.push(record);
    };

    sink.finalize()?;

    Ok(SimulationResult {
        end_reason,
        records,
        total_ticks,
        drift_corrections: clock.drift_corrections(),
    })
}

fn tick_failure(err: TickError, clock: &SimulationClock) -> RunnerError {
    let last_record = clock.current_record();
    match err {
        TickError::Energy { source, .. } => RunnerError::Domain {
            last_record,
            source,
        },
        TickError::TickOverflow => RunnerError::TickOverflow { last_record },
    }
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        drift_corrections = result.drift_corrections,
        "Simulation ended"
    );

    if let Some(record) = result.final_record() {
        info!(
            tick = record.tick,
            white = record.white_fraction,
            black = record.black_fraction,
            temperature = record.planetary_temperature,
            "Final tick record"
        );
    } else {
        warn!("Simulation ended with no records");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config_with_ticks(tick_count: u64) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.run.tick_count = tick_count;
        config
    }

    /// Sink that raises a cancel signal after a number of records.
    struct CancelAfter {
        remaining: usize,
        signal: CancelSignal,
        finalized: bool,
    }

    impl OutputSink for CancelAfter {
        fn accept(&mut self, _record: &TickRecord) -> Result<(), SinkError> {
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                self.signal.request_stop();
            }
            Ok(())
        }

        fn finalize(&mut self) -> Result<(), SinkError> {
            self.finalized = true;
            Ok(())
        }
    }

    /// Sink whose writes always fail.
    struct BrokenSink;

    impl OutputSink for BrokenSink {
        fn accept(&mut self, _record: &TickRecord) -> Result<(), SinkError> {
            Err(std::io::Error::other("disk full").into())
        }

        fn finalize(&mut self) -> Result<(), SinkError> {
            Ok(())
        }
    }

    #[test]
    fn run_emits_tick_count_plus_one_records() {
        let records = run(&config_with_ticks(10)).unwrap();
        assert_eq!(records.len(), 11);
        for (expected, record) in (0_u64..).zip(&records) {
            assert_eq!(record.tick, expected);
        }
    }

    #[test]
    fn sink_receives_records_in_order_and_is_finalized() {
        let mut sink = MemorySink::new();
        let result =
            run_with_sink(&config_with_ticks(5), &mut sink, &CancelSignal::new()).unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::Completed);
        assert_eq!(result.total_ticks, 5);
        assert!(sink.is_finalized());
        assert_eq!(sink.records().len(), result.records.len());
        for (a, b) in sink.records().iter().zip(&result.records) {
            assert!(a.bitwise_eq(b));
        }
    }

    #[test]
    fn cancelled_before_first_tick_returns_snapshot_only() {
        let signal = CancelSignal::new();
        signal.request_stop();
        let mut sink = MemorySink::new();

        let result = run_with_sink(&config_with_ticks(50), &mut sink, &signal).unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::Cancelled);
        assert_eq!(result.total_ticks, 0);
        assert_eq!(result.records.len(), 1);
        assert!(sink.is_finalized());
    }

    #[test]
    fn cancelled_mid_run_returns_partial_sequence() {
        let signal = CancelSignal::new();
        let mut sink = CancelAfter {
            remaining: 4,
            signal: signal.clone(),
            finalized: false,
        };

        let result = run_with_sink(&config_with_ticks(50), &mut sink, &signal).unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::Cancelled);
        // Snapshot plus three ticks reached the sink before the stop.
        assert_eq!(result.records.len(), 4);
        assert_eq!(result.total_ticks, 3);
        assert!(sink.finalized);
    }

    #[test]
    fn invalid_config_fails_before_any_record() {
        let mut config = config_with_ticks(5);
        config.populations.white.growth_width = -1.0;
        let mut sink = MemorySink::new();

        let result = run_with_sink(&config, &mut sink, &CancelSignal::new());

        assert!(matches!(result, Err(RunnerError::Config { .. })));
        assert!(sink.records().is_empty());
    }

    #[test]
    fn domain_error_reports_last_valid_record() {
        let config = config_with_ticks(5).with_luminosity(0.0);
        let mut sink = MemorySink::new();

        let err = run_with_sink(&config, &mut sink, &CancelSignal::new()).unwrap_err();

        assert!(matches!(err, RunnerError::Domain { .. }));
        assert_eq!(err.last_record().map(|r| r.tick), Some(0));
        assert_eq!(sink.records().len(), 1);
        assert!(!sink.is_finalized());
    }

    #[test]
    fn sink_failure_aborts_run() {
        let result = run_with_sink(&config_with_ticks(5), &mut BrokenSink, &CancelSignal::new());
        assert!(matches!(result, Err(RunnerError::Sink { .. })));
    }

    #[test]
    fn log_simulation_end_handles_results() {
        let mut sink = MemorySink::new();
        let result =
            run_with_sink(&config_with_ticks(2), &mut sink, &CancelSignal::new()).unwrap();
        log_simulation_end(&result);
        assert_eq!(result.final_record().map(|r| r.tick), Some(2));
    }
}
