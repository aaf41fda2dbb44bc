//! Energy balance, population dynamics, and run orchestration for the
//! Daisyworld simulation.
//!
//! Two daisy populations of different albedo compete for bare ground on a
//! planet whose temperature depends on how much sunlight the surface
//! reflects. Each tick computes the temperature from the current coverage,
//! then grows or shrinks each population according to its local
//! temperature. The coupling regulates the planetary temperature.
//!
//! # Modules
//!
//! - [`cancel`] -- [`CancelSignal`], a shared flag checked between ticks.
//! - [`clock`] -- [`SimulationClock`], the tick counter and phase state
//!   machine that owns the planet state.
//! - [`config`] -- Configuration loading from `daisyworld-config.yaml` into
//!   strongly-typed structs, plus range validation.
//! - [`energy`] -- Planetary albedo, radiative-equilibrium temperature, and
//!   local temperatures.
//! - [`population`] -- Growth rates, coverage update, and drift correction.
//! - [`runner`] -- [`run`] and [`run_with_sink`]: one complete run.
//! - [`sink`] -- [`OutputSink`] and its CSV, JSON-lines, and in-memory forms.
//! - [`tick`] -- A single energy-then-population transition.
//!
//! [`CancelSignal`]: cancel::CancelSignal
//! [`SimulationClock`]: clock::SimulationClock
//! [`run`]: runner::run
//! [`run_with_sink`]: runner::run_with_sink
//! [`OutputSink`]: sink::OutputSink

pub mod cancel;
pub mod clock;
pub mod config;
pub mod energy;
pub mod population;
pub mod runner;
pub mod sink;
pub mod tick;

pub use cancel::CancelSignal;
pub use clock::{ClockPhase, SimulationClock};
pub use config::{ConfigError, SimulationConfig};
pub use runner::{RunnerError, SimulationEndReason, SimulationResult, run, run_with_sink};
pub use sink::{CsvSink, JsonLinesSink, MemorySink, NoOpSink, OutputSink, SinkError};
