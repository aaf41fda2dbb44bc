//! Simulation clock: tick counter, run phase, and the current planet state.
//!
//! The clock is the single owner of the [`PlanetState`] for a run. It moves
//! through three phases:
//!
//! ```text
//! Initialized --advance--> Running --advance (tick == tick_count)--> Completed
//! ```
//!
//! - Every executing [`advance`](SimulationClock::advance) runs one tick and
//!   returns the new [`TickRecord`].
//! - The clock completes as soon as the tick counter reaches `tick_count`.
//!   With `tick_count == 0` the first `advance` completes without running
//!   any dynamics.
//! - Once completed, `advance` keeps returning the last record.
//! - A failed tick leaves the state and phase untouched.
//!
//! The tick-0 state carries the equilibrium temperature of the initial
//! coverage. When the energy balance has no solution (zero luminosity),
//! `planet.initial_temperature` stands in and the first tick fails.

use daisyworld_types::{PlanetState, TickRecord};
use tracing::{debug, warn};

use crate::config::{ConfigError, SimulationConfig};
use crate::energy;
use crate::tick::{self, TickError};

/// Lifecycle phase of a [`SimulationClock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockPhase {
    /// Constructed; no tick has executed yet.
    Initialized,
    /// At least one tick has executed and more remain.
    Running,
    /// The tick budget is exhausted. Terminal.
    Completed,
}

/// Discrete simulation clock owning the planet state for one run.
#[derive(Debug, Clone)]
pub struct SimulationClock {
    /// Validated run configuration.
    config: SimulationConfig,

    /// Current planet state.
    state: PlanetState,

    /// Current lifecycle phase.
    phase: ClockPhase,

    /// Number of drift corrections applied so far.
    drift_corrections: u64,
}

impl SimulationClock {
    /// Create a clock at tick 0 from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if any parameter is out of range.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let planet = &config.planet;
        let mut state = PlanetState::initial(
            planet.initial_white_fraction,
            planet.initial_black_fraction,
            planet.initial_temperature,
        );
        state.planetary_temperature = energy::compute_temperature(&state, &config).map_or_else(
            |e| {
                warn!(
                    error = %e,
                    fallback = planet.initial_temperature,
                    "No equilibrium for initial coverage, using initial temperature"
                );
                planet.initial_temperature
            },
            |temperature| temperature.planetary,
        );
        Ok(Self {
            config,
            state,
            phase: ClockPhase::Initialized,
            drift_corrections: 0,
        })
    }

    /// Advance by one tick and return the resulting record.
    ///
    /// When the clock is (or becomes) [`ClockPhase::Completed`] without
    /// executing a tick, the current record is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`TickError`] if the tick could not be executed. The clock is
    /// left exactly as it was before the call.
    pub fn advance(&mut self) -> Result<TickRecord, TickError> {
        if self.phase == ClockPhase::Completed {
            return Ok(self.state.record());
        }
        if self.state.tick >= self.config.run.tick_count {
            self.finish();
            return Ok(self.state.record());
        }

        let outcome = tick::run_tick(&self.state, &self.config)?;

        let corrections = u64::try_from(outcome.corrections.len()).unwrap_or(u64::MAX);
        self.drift_corrections = self.drift_corrections.saturating_add(corrections);
        self.state = outcome.state;
        debug_assert!(self.state.coverage_is_valid(), "{:?}", self.state);
        self.phase = if self.state.tick >= self.config.run.tick_count {
            ClockPhase::Completed
        } else {
            ClockPhase::Running
        };

        debug!(
            tick = self.state.tick,
            white = self.state.white_fraction,
            black = self.state.black_fraction,
            temperature = self.state.planetary_temperature,
            albedo = outcome.temperature.albedo,
            "Tick complete"
        );

        Ok(self.state.record())
    }

    /// Move the clock into [`ClockPhase::Completed`] without running a tick.
    ///
    /// Used once the tick budget is exhausted; later [`advance`](Self::advance)
    /// calls return the current record.
    pub const fn finish(&mut self) {
        self.phase = ClockPhase::Completed;
    }

    /// Return the current tick number.
    pub const fn tick(&self) -> u64 {
        self.state.tick
    }

    /// Return the current lifecycle phase.
    pub const fn phase(&self) -> ClockPhase {
        self.phase
    }

    /// Whether the clock has reached its terminal phase.
    pub const fn is_completed(&self) -> bool {
        matches!(self.phase, ClockPhase::Completed)
    }

    /// Return the current planet state.
    pub const fn state(&self) -> &PlanetState {
        &self.state
    }

    /// Snapshot of the current state.
    pub const fn current_record(&self) -> TickRecord {
        self.state.record()
    }

    /// Number of drift corrections applied since tick 0.
    pub const fn drift_corrections(&self) -> u64 {
        self.drift_corrections
    }

    /// Configured tick budget.
    pub const fn tick_count(&self) -> u64 {
        self.config.run.tick_count
    }

    /// Return the configuration this clock runs with.
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }
}
