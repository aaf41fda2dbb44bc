//! Population dynamics: growth, death, and competition for bare ground.
//!
//! Each population grows at a rate that is a parabola of its local
//! temperature, peaking at `optimal_temperature` and reaching zero at
//! `optimal_temperature +/- growth_width`. Coverage changes as
//!
//! ```text
//! d(alpha)/dt = alpha * bare * growth(T_local) - alpha * death_rate
//! ```
//!
//! where `bare` is the uncolonized fraction from the previous tick. Both
//! populations read the same `bare`, so neither species gets first pick of
//! free ground.
//!
//! The explicit update can overshoot `[0, 1]` or push the combined coverage
//! past 1. Such results are pulled back and reported as [`DriftCorrection`]s.

use daisyworld_types::{PlanetState, PopulationParams, Species};

use crate::config::SimulationConfig;
use crate::energy::PlanetaryTemperature;

/// A numeric correction applied to keep coverage within bounds.
///
/// Corrections are not errors: the run continues with the corrected values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DriftCorrection {
    /// A fraction fell below zero and was raised to zero.
    ClampedLow {
        /// The affected population.
        species: Species,
        /// The value before clamping.
        value: f64,
    },
    /// A fraction rose above one and was lowered to one.
    ClampedHigh {
        /// The affected population.
        species: Species,
        /// The value before clamping.
        value: f64,
    },
    /// Combined coverage exceeded one and both fractions were rescaled.
    Renormalized {
        /// Combined coverage before rescaling.
        total: f64,
    },
}

/// New coverage fractions produced by one step.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationStep {
    /// White daisy coverage after the step.
    pub white_fraction: f64,
    /// Black daisy coverage after the step.
    pub black_fraction: f64,
    /// Growth rate applied to white daisies.
    pub white_growth: f64,
    /// Growth rate applied to black daisies.
    pub black_growth: f64,
    /// Corrections applied to keep coverage in bounds (usually empty).
    pub corrections: Vec<DriftCorrection>,
}

/// Growth rate at a local temperature, clamped to `[0, 1]`.
pub fn growth_rate(local_temperature: f64, params: &PopulationParams) -> f64 {
    let deviation = (local_temperature - params.optimal_temperature) / params.growth_width;
    let rate = 1.0 - deviation * deviation;
    if rate.is_nan() {
        return 0.0;
    }
    rate.clamp(0.0, 1.0)
}

/// Net rate of change of one population's coverage.
pub const fn net_rate(fraction: f64, bare: f64, growth: f64, death_rate: f64) -> f64 {
    fraction * bare * growth - fraction * death_rate
}

/// Advance both populations by one step of length `dt`.
///
/// Uses the local temperatures from `temps` (computed from the same
/// `state`) and the shared prior-tick bare fraction.
pub fn step(
    state: &PlanetState,
    temps: &PlanetaryTemperature,
    config: &SimulationConfig,
    dt: f64,
) -> PopulationStep {
    let bare = state.bare_fraction().max(0.0);
    let mut corrections = Vec::new();

    let mut advance = |species: Species| {
        let params = config.population(species);
        let fraction = state.fraction(species);
        let growth = growth_rate(temps.local(species), params);
        let raw = fraction + dt * net_rate(fraction, bare, growth, params.death_rate);
        (clamp_fraction(species, raw, &mut corrections), growth)
    };

    let (mut white_fraction, white_growth) = advance(Species::White);
    let (mut black_fraction, black_growth) = advance(Species::Black);

    let total = white_fraction + black_fraction;
    if total > 1.0 {
        white_fraction /= total;
        black_fraction /= total;
        corrections.push(DriftCorrection::Renormalized { total });
    }

    PopulationStep {
        white_fraction,
        black_fraction,
        white_growth,
        black_growth,
        corrections,
    }
}

fn clamp_fraction(species: Species, value: f64, corrections: &mut Vec<DriftCorrection>) -> f64 {
    if value.is_nan() || value < 0.0 {
        corrections.push(DriftCorrection::ClampedLow { species, value });
        0.0
    } else if value > 1.0 {
        corrections.push(DriftCorrection::ClampedHigh { species, value });
        1.0
    } else {
        value
    }
}
