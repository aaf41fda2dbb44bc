//! A single tick: the transition from tick `t` to tick `t + 1`.
//!
//! Each tick runs three phases in a fixed order:
//!
//! 1. **Energy balance** -- compute planetary and local temperatures from
//!    the tick-`t` coverage.
//! 2. **Population update** -- derive the tick-`t + 1` coverage from those
//!    temperatures and the tick-`t` bare fraction.
//! 3. **Planet temperature** -- rebalance energy over the tick-`t + 1`
//!    coverage, so every record pairs coverage with its own temperature.
//!
//! A tick either returns a complete new state or an error; the input state
//! is never modified.

use daisyworld_types::PlanetState;
use tracing::warn;

use crate::config::SimulationConfig;
use crate::energy::{self, EnergyError, PlanetaryTemperature};
use crate::population::{self, DriftCorrection};

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// The energy balance had no physical solution.
    #[error("energy balance failed at tick {tick}: {source}")]
    Energy {
        /// The tick whose state could not be advanced.
        tick: u64,
        /// The underlying energy error.
        source: EnergyError,
    },

    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,
}

/// Result of a successful tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// The new planet state (tick `t + 1`).
    pub state: PlanetState,
    /// The temperatures that drove the transition (tick-`t` coverage).
    pub temperature: PlanetaryTemperature,
    /// Coverage corrections applied during the update.
    pub corrections: Vec<DriftCorrection>,
}

/// Execute one tick from `state`.
///
/// # Errors
///
/// Returns [`TickError::Energy`] if the energy balance is undefined for the
/// current state, or [`TickError::TickOverflow`] if the tick counter is
/// exhausted.
pub fn run_tick(state: &PlanetState, config: &SimulationConfig) -> Result<TickOutcome, TickError> {
    let next_tick = state.tick.checked_add(1).ok_or(TickError::TickOverflow)?;

    // --- Phase 1: Energy balance ---
    let energy_failure = |source| TickError::Energy {
        tick: state.tick,
        source,
    };
    let temperature = energy::compute_temperature(state, config).map_err(energy_failure)?;

    // --- Phase 2: Population update ---
    let step = population::step(state, &temperature, config, config.run.time_step);

    // --- Phase 3: Planet temperature for the new coverage ---
    let mut next = PlanetState {
        tick: next_tick,
        white_fraction: step.white_fraction,
        black_fraction: step.black_fraction,
        planetary_temperature: temperature.planetary,
    };
    next.planetary_temperature = energy::compute_temperature(&next, config)
        .map_err(energy_failure)?
        .planetary;

    for correction in &step.corrections {
        log_correction(next_tick, correction);
    }

    Ok(TickOutcome {
        state: next,
        temperature,
        corrections: step.corrections,
    })
}

fn log_correction(tick: u64, correction: &DriftCorrection) {
    match *correction {
        DriftCorrection::ClampedLow { species, value } => {
            warn!(tick, %species, value, "Coverage fell below zero, clamped");
        }
        DriftCorrection::ClampedHigh { species, value } => {
            warn!(tick, %species, value, "Coverage rose above one, clamped");
        }
        DriftCorrection::Renormalized { total } => {
            warn!(tick, total, "Combined coverage exceeded one, renormalized");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn tick_advances_counter_and_rebalances_temperature() {
        let config = SimulationConfig::default();
        let state = PlanetState::initial(0.2, 0.2, 15.0);
        let outcome = run_tick(&state, &config).unwrap();

        assert_eq!(outcome.state.tick, 1);
        // Growth was driven by tick-0 coverage (A = 0.5).
        assert!((outcome.temperature.planetary - 26.724).abs() < 0.01);
        // The new state carries the temperature of its own coverage.
        let own = energy::compute_temperature(&outcome.state, &config).unwrap();
        assert!((outcome.state.planetary_temperature - own.planetary).abs() < f64::EPSILON);
        assert!((outcome.state.planetary_temperature - 25.4755).abs() < 0.001);
    }

    #[test]
    fn tick_leaves_input_untouched() {
        let config = SimulationConfig::default();
        let state = PlanetState::initial(0.2, 0.2, 15.0);
        let before = state;
        let _ = run_tick(&state, &config).unwrap();
        assert!(state.record().bitwise_eq(&before.record()));
    }

    #[test]
    fn zero_luminosity_fails_with_tick_number() {
        let config = SimulationConfig::default().with_luminosity(0.0);
        let state = PlanetState::initial(0.2, 0.2, 15.0);
        let result = run_tick(&state, &config);
        assert!(matches!(result, Err(TickError::Energy { tick: 0, .. })));
    }

    #[test]
    fn tick_overflow_is_reported() {
        let config = SimulationConfig::default();
        let mut state = PlanetState::initial(0.2, 0.2, 15.0);
        state.tick = u64::MAX;
        assert!(matches!(
            run_tick(&state, &config),
            Err(TickError::TickOverflow)
        ));
    }

    /// Writer that appends formatted log lines to a shared buffer.
    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn drift_corrections_are_logged_as_warnings() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();

        let mut config = SimulationConfig::default();
        config.populations.black.death_rate = 2.5;
        let state = PlanetState::initial(0.2, 0.2, 15.0);
        let outcome = tracing::subscriber::with_default(subscriber, || {
            run_tick(&state, &config).unwrap()
        });

        assert_eq!(outcome.corrections.len(), 1);
        let text = logs.text();
        assert!(text.contains("WARN"), "{text}");
        assert!(text.contains("Coverage fell below zero, clamped"), "{text}");
        assert!(text.contains("species=black"), "{text}");
        assert!(text.contains("tick=1"), "{text}");
    }

    #[test]
    fn drift_corrections_are_returned() {
        let mut config = SimulationConfig::default();
        config.populations.black.death_rate = 2.5;
        let state = PlanetState::initial(0.2, 0.2, 15.0);
        let outcome = run_tick(&state, &config).unwrap();
        assert!(outcome.state.black_fraction.abs() < f64::EPSILON);
        assert_eq!(outcome.corrections.len(), 1);
    }
}
