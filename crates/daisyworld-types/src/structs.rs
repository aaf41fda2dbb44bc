//! Core state structs for the Daisyworld simulation.
//!
//! Covers the mutable [`PlanetState`] owned by the clock, the immutable
//! [`TickRecord`] snapshots it emits, and the per-population
//! [`PopulationParams`] that stay constant for a run.

use serde::{Deserialize, Serialize};

use crate::enums::Species;

/// Tolerance used when checking the coverage invariant.
pub const COVERAGE_TOLERANCE: f64 = 1e-9;

// ---------------------------------------------------------------------------
// PlanetState
// ---------------------------------------------------------------------------

/// The planet at one tick: daisy coverage and its equilibrium temperature.
///
/// Bare ground is never stored; it is always `1 - white - black`, so the
/// three fractions sum to exactly one by construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetState {
    /// Tick number (0 is the initial state).
    pub tick: u64,
    /// Fraction of the surface covered by white daisies.
    pub white_fraction: f64,
    /// Fraction of the surface covered by black daisies.
    pub black_fraction: f64,
    /// Planetary mean temperature in degrees Celsius.
    pub planetary_temperature: f64,
}

impl PlanetState {
    /// Create the tick-0 state.
    pub const fn initial(white_fraction: f64, black_fraction: f64, temperature: f64) -> Self {
        Self {
            tick: 0,
            white_fraction,
            black_fraction,
            planetary_temperature: temperature,
        }
    }

    /// Fraction of uncolonized ground.
    pub const fn bare_fraction(&self) -> f64 {
        1.0 - self.white_fraction - self.black_fraction
    }

    /// Coverage fraction of the given species.
    pub const fn fraction(&self, species: Species) -> f64 {
        match species {
            Species::White => self.white_fraction,
            Species::Black => self.black_fraction,
        }
    }

    /// Whether both fractions are in `[0, 1]` and their sum does not exceed 1.
    pub fn coverage_is_valid(&self) -> bool {
        let in_range = |f: f64| (0.0..=1.0).contains(&f);
        in_range(self.white_fraction)
            && in_range(self.black_fraction)
            && self.white_fraction + self.black_fraction <= 1.0 + COVERAGE_TOLERANCE
    }

    /// Immutable snapshot of this state.
    pub const fn record(&self) -> TickRecord {
        TickRecord {
            tick: self.tick,
            white_fraction: self.white_fraction,
            black_fraction: self.black_fraction,
            planetary_temperature: self.planetary_temperature,
        }
    }
}

// ---------------------------------------------------------------------------
// TickRecord
// ---------------------------------------------------------------------------

/// Immutable per-tick snapshot delivered to output sinks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    /// Tick number.
    pub tick: u64,
    /// White daisy coverage fraction.
    pub white_fraction: f64,
    /// Black daisy coverage fraction.
    pub black_fraction: f64,
    /// Planetary temperature in degrees Celsius.
    pub planetary_temperature: f64,
}

impl TickRecord {
    /// Whether two records are bit-for-bit identical (NaN-safe, unlike `==`).
    pub const fn bitwise_eq(&self, other: &Self) -> bool {
        self.tick == other.tick
            && self.white_fraction.to_bits() == other.white_fraction.to_bits()
            && self.black_fraction.to_bits() == other.black_fraction.to_bits()
            && self.planetary_temperature.to_bits() == other.planetary_temperature.to_bits()
    }
}

impl From<PlanetState> for TickRecord {
    fn from(state: PlanetState) -> Self {
        state.record()
    }
}

// ---------------------------------------------------------------------------
// PopulationParams
// ---------------------------------------------------------------------------

/// Growth and death parameters for one population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationParams {
    /// Surface albedo of this population (0 = absorbs all, 1 = reflects all).
    pub albedo: f64,
    /// Fraction of coverage lost per unit time.
    pub death_rate: f64,
    /// Local temperature (Celsius) at which growth peaks.
    pub optimal_temperature: f64,
    /// Half-width (Celsius) of the band outside which growth is zero.
    pub growth_width: f64,
}
