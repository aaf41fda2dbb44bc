//! Radiative energy balance: planetary albedo and temperatures.
//!
//! The planet absorbs `solar_flux * solar_luminosity * (1 - A)` where `A` is
//! the coverage-weighted albedo, and radiates as a black body. Solving
//! `sigma * T^4 = absorbed` gives the planetary temperature in closed form.
//!
//! Local temperatures diverge from the planetary mean in proportion to how
//! far a population's albedo is from the planetary albedo. Dark daisies sit
//! warmer than the planet, light daisies cooler. That split is what lets the
//! two populations regulate the climate between them.

use daisyworld_types::{PlanetState, Species};

use crate::config::SimulationConfig;

/// Offset between Kelvin and Celsius.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Physically invalid intermediate states.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum EnergyError {
    /// The planet absorbs no energy, so radiative equilibrium has no solution.
    #[error("absorbed flux {absorbed} W/m^2 is not positive (luminosity {luminosity}, albedo {albedo})")]
    NonPositiveAbsorption {
        /// Absorbed flux in W/m^2.
        absorbed: f64,
        /// Solar luminosity multiplier in force.
        luminosity: f64,
        /// Planetary albedo in force.
        albedo: f64,
    },

    /// The equilibrium temperature came out NaN or infinite.
    #[error("equilibrium temperature is not finite (absorbed flux {absorbed} W/m^2)")]
    NonFinite {
        /// Absorbed flux in W/m^2.
        absorbed: f64,
    },
}

/// Result of one energy-balance evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetaryTemperature {
    /// Coverage-weighted planetary albedo.
    pub albedo: f64,
    /// Absorbed flux in W/m^2.
    pub absorbed: f64,
    /// Planetary mean temperature in Celsius.
    pub planetary: f64,
    /// Local temperature over white daisies, in Celsius.
    pub white_local: f64,
    /// Local temperature over black daisies, in Celsius.
    pub black_local: f64,
}

impl PlanetaryTemperature {
    /// Local temperature experienced by one species.
    pub const fn local(&self, species: Species) -> f64 {
        match species {
            Species::White => self.white_local,
            Species::Black => self.black_local,
        }
    }
}

/// Coverage-weighted albedo of the planet.
pub const fn planetary_albedo(state: &PlanetState, config: &SimulationConfig) -> f64 {
    state.bare_fraction() * config.planet.bare_albedo
        + state.white_fraction * config.population(Species::White).albedo
        + state.black_fraction * config.population(Species::Black).albedo
}

/// Radiative-equilibrium temperature, in Celsius, for a given absorbed flux.
///
/// # Errors
///
/// Returns [`EnergyError::NonPositiveAbsorption`] if `absorbed <= 0`, or
/// [`EnergyError::NonFinite`] if the result is not a finite number.
pub fn equilibrium_temperature(
    absorbed: f64,
    stefan_boltzmann: f64,
    luminosity: f64,
    albedo: f64,
) -> Result<f64, EnergyError> {
    if absorbed.is_nan() || absorbed <= 0.0 {
        return Err(EnergyError::NonPositiveAbsorption {
            absorbed,
            luminosity,
            albedo,
        });
    }
    let kelvin = (absorbed / stefan_boltzmann).powf(0.25);
    let celsius = kelvin - KELVIN_OFFSET;
    if celsius.is_finite() {
        Ok(celsius)
    } else {
        Err(EnergyError::NonFinite { absorbed })
    }
}

/// Local temperature over a surface of the given albedo.
pub const fn local_temperature(
    planetary: f64,
    planetary_albedo: f64,
    albedo: f64,
    heating: f64,
) -> f64 {
    planetary + heating * (planetary_albedo - albedo)
}

/// Compute planetary and per-population temperatures for the given coverage.
///
/// # Errors
///
/// Returns [`EnergyError`] if the absorbed flux is not positive (e.g. zero
/// luminosity) or the equilibrium temperature is not finite.
pub fn compute_temperature(
    state: &PlanetState,
    config: &SimulationConfig,
) -> Result<PlanetaryTemperature, EnergyError> {
    let planet = &config.planet;
    let albedo = planetary_albedo(state, config);
    let absorbed = planet.solar_flux * planet.solar_luminosity * (1.0 - albedo);
    let planetary = equilibrium_temperature(
        absorbed,
        planet.stefan_boltzmann_constant,
        planet.solar_luminosity,
        albedo,
    )?;

    let local = |species: Species| {
        local_temperature(
            planetary,
            albedo,
            config.population(species).albedo,
            planet.local_heating,
        )
    };

    Ok(PlanetaryTemperature {
        albedo,
        absorbed,
        planetary,
        white_local: local(Species::White),
        black_local: local(Species::Black),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn state(white: f64, black: f64) -> PlanetState {
        PlanetState::initial(white, black, 15.0)
    }

    #[test]
    fn albedo_is_coverage_weighted() {
        let config = SimulationConfig::default();
        // Bare ground only.
        assert!((planetary_albedo(&state(0.0, 0.0), &config) - 0.5).abs() < 1e-12);
        // All white.
        assert!((planetary_albedo(&state(1.0, 0.0), &config) - 0.75).abs() < 1e-12);
        // 0.2 * 0.75 + 0.2 * 0.25 + 0.6 * 0.5 = 0.5
        assert!((planetary_albedo(&state(0.2, 0.2), &config) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn bare_planet_equilibrium() {
        let config = SimulationConfig::default();
        let temps = compute_temperature(&state(0.0, 0.0), &config).unwrap();
        // (917 * 0.5 / 5.67e-8)^0.25 - 273.15 ~= 26.72 C
        assert!((temps.planetary - 26.724).abs() < 0.01, "{}", temps.planetary);
        assert!((temps.absorbed - 458.5).abs() < 1e-9);
    }

    #[test]
    fn emitted_flux_balances_absorbed() {
        let config = SimulationConfig::default();
        let temps = compute_temperature(&state(0.3, 0.1), &config).unwrap();
        let kelvin = temps.planetary + KELVIN_OFFSET;
        let emitted = config.planet.stefan_boltzmann_constant * kelvin.powi(4);
        assert!((emitted - temps.absorbed).abs() < 1e-6);
    }

    #[test]
    fn dark_surfaces_run_warmer() {
        let config = SimulationConfig::default();
        let temps = compute_temperature(&state(0.2, 0.2), &config).unwrap();
        assert!(temps.black_local > temps.planetary);
        assert!(temps.white_local < temps.planetary);
        // Symmetric albedos around 0.5 with A = 0.5 give +/- 5 C.
        assert!((temps.local(Species::Black) - temps.planetary - 5.0).abs() < 1e-9);
        assert!((temps.planetary - temps.local(Species::White) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn higher_luminosity_is_hotter() {
        let config = SimulationConfig::default();
        let dim = compute_temperature(&state(0.2, 0.2), &config.with_luminosity(0.8)).unwrap();
        let bright = compute_temperature(&state(0.2, 0.2), &config.with_luminosity(1.2)).unwrap();
        assert!(bright.planetary > dim.planetary);
    }

    #[test]
    fn zero_luminosity_is_a_domain_error() {
        let config = SimulationConfig::default().with_luminosity(0.0);
        let result = compute_temperature(&state(0.2, 0.2), &config);
        assert!(matches!(
            result,
            Err(EnergyError::NonPositiveAbsorption { .. })
        ));
    }

    #[test]
    fn fully_reflective_planet_is_a_domain_error() {
        let mut config = SimulationConfig::default();
        config.planet.bare_albedo = 1.0;
        let result = compute_temperature(&state(0.0, 0.0), &config);
        assert!(result.is_err());
    }

    #[test]
    fn non_finite_absorption_is_rejected() {
        assert!(equilibrium_temperature(f64::NAN, 5.67e-8, 1.0, 0.5).is_err());
        assert!(matches!(
            equilibrium_temperature(f64::INFINITY, 5.67e-8, 1.0, 0.5),
            Err(EnergyError::NonFinite { .. })
        ));
    }
}
