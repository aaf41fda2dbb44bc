//! Configuration loading and typed config structures for the Daisyworld simulation.
//!
//! The canonical configuration lives in `daisyworld-config.yaml` at the
//! project root. This module defines strongly-typed structs that mirror the
//! YAML structure, a loader that reads the file, and [`SimulationConfig::validate`]
//! which rejects out-of-range parameters before any tick runs.
//!
//! The model parameters are required: initial coverage, bare albedo, solar
//! luminosity, tick count, and every per-population field. A document that
//! omits any of them fails to parse. The radiative constants, time step,
//! output, sweep, and logging sections are optional and default to the
//! classic Watson-Lovelock calibration. [`SimulationConfig::default`] gives
//! that full calibration for programmatic use.

use std::path::Path;

use daisyworld_types::{PopulationParams, Species};
use serde::Deserialize;

/// Environment variable that overrides [`OutputConfig::path`].
pub const OUTPUT_PATH_ENV: &str = "DAISYWORLD_OUTPUT";

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A parameter is outside its permitted range.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field (e.g. `populations.white.death_rate`).
        field: String,
        /// Explanation of what is wrong with the value.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `daisyworld-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Initial coverage and radiative parameters of the planet.
    pub planet: PlanetConfig,

    /// Run length and integration step.
    pub run: RunConfig,

    /// Per-population growth and death parameters.
    pub populations: PopulationsConfig,

    /// Where and how the record stream is written.
    #[serde(default)]
    pub output: OutputConfig,

    /// Optional luminosity sweep run alongside the primary run.
    #[serde(default)]
    pub sweep: SweepConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `DAISYWORLD_OUTPUT` overrides `output.path` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML or a
    /// required field is missing.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.output.apply_env_overrides();
        Ok(config)
    }

    /// Check every parameter against its permitted range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.planet.validate()?;
        self.run.validate()?;
        for species in Species::ALL {
            validate_population(species, self.populations.get(species))?;
        }
        for (i, luminosity) in self.sweep.luminosities.iter().enumerate() {
            let field = format!("sweep.luminosities[{i}]");
            require_finite(&field, *luminosity)?;
            require(*luminosity >= 0.0, &field, "luminosity must be non-negative")?;
            let repeated = self
                .sweep
                .luminosities
                .iter()
                .take(i)
                .any(|earlier| earlier.to_bits() == luminosity.to_bits());
            require(!repeated, &field, "luminosity is listed more than once")?;
        }
        Ok(())
    }

    /// Parameters of one population.
    pub const fn population(&self, species: Species) -> &PopulationParams {
        self.populations.get(species)
    }

    /// A copy of this configuration with a different solar luminosity.
    #[must_use]
    pub fn with_luminosity(&self, luminosity: f64) -> Self {
        let mut config = self.clone();
        config.planet.solar_luminosity = luminosity;
        config
    }
}

/// Planet-level parameters: initial coverage and the radiative balance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlanetConfig {
    /// White daisy coverage at tick 0.
    pub initial_white_fraction: f64,

    /// Black daisy coverage at tick 0.
    pub initial_black_fraction: f64,

    /// Albedo of uncolonized ground.
    pub bare_albedo: f64,

    /// Luminosity multiplier applied to `solar_flux` (1.0 = present-day sun).
    pub solar_luminosity: f64,

    /// Incoming stellar flux at unit luminosity, in W/m^2.
    #[serde(default = "default_solar_flux")]
    pub solar_flux: f64,

    /// Stefan-Boltzmann constant, in W m^-2 K^-4.
    #[serde(default = "default_stefan_boltzmann")]
    pub stefan_boltzmann_constant: f64,

    /// Degrees of local warming per unit of albedo below the planetary mean.
    #[serde(default = "default_local_heating")]
    pub local_heating: f64,

    /// Temperature (Celsius) of the tick-0 snapshot when the initial
    /// coverage has no radiative equilibrium.
    #[serde(default = "default_initial_temperature")]
    pub initial_temperature: f64,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            initial_white_fraction: default_initial_fraction(),
            initial_black_fraction: default_initial_fraction(),
            bare_albedo: default_bare_albedo(),
            solar_luminosity: default_solar_luminosity(),
            solar_flux: default_solar_flux(),
            stefan_boltzmann_constant: default_stefan_boltzmann(),
            local_heating: default_local_heating(),
            initial_temperature: default_initial_temperature(),
        }
    }
}

impl PlanetConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        require_unit("planet.initial_white_fraction", self.initial_white_fraction)?;
        require_unit("planet.initial_black_fraction", self.initial_black_fraction)?;
        require(
            self.initial_white_fraction + self.initial_black_fraction <= 1.0,
            "planet.initial_black_fraction",
            "initial white and black coverage must not exceed 1",
        )?;
        require_unit("planet.bare_albedo", self.bare_albedo)?;

        require_finite("planet.solar_luminosity", self.solar_luminosity)?;
        require(
            self.solar_luminosity >= 0.0,
            "planet.solar_luminosity",
            "luminosity must be non-negative",
        )?;
        require_positive("planet.solar_flux", self.solar_flux)?;
        require_positive(
            "planet.stefan_boltzmann_constant",
            self.stefan_boltzmann_constant,
        )?;
        require_finite("planet.local_heating", self.local_heating)?;
        require_finite("planet.initial_temperature", self.initial_temperature)
    }
}

/// Run length and integration settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunConfig {
    /// Number of ticks to execute after the initial snapshot.
    pub tick_count: u64,

    /// Integration step per tick for the coverage update.
    #[serde(default = "default_time_step")]
    pub time_step: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tick_count: default_tick_count(),
            time_step: default_time_step(),
        }
    }
}

impl RunConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        require_positive("run.time_step", self.time_step)
    }
}

/// Parameters for both populations.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PopulationsConfig {
    /// White daisies.
    pub white: PopulationParams,

    /// Black daisies.
    pub black: PopulationParams,
}

impl Default for PopulationsConfig {
    fn default() -> Self {
        Self {
            white: default_white(),
            black: default_black(),
        }
    }
}

impl PopulationsConfig {
    /// Parameters of one population.
    pub const fn get(&self, species: Species) -> &PopulationParams {
        match species {
            Species::White => &self.white,
            Species::Black => &self.black,
        }
    }
}

/// Record stream encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Headerless `white,black,temperature` rows.
    #[default]
    Csv,
    /// One JSON object per line.
    JsonLines,
}

/// Output settings for the engine binary.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutputConfig {
    /// File the primary run is written to.
    #[serde(default = "default_output_path")]
    pub path: String,

    /// Record encoding.
    #[serde(default)]
    pub format: OutputFormat,

    /// Write coverage as percentages (0-100) instead of fractions.
    #[serde(default)]
    pub percent: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            format: OutputFormat::default(),
            percent: false,
        }
    }
}

impl OutputConfig {
    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var(OUTPUT_PATH_ENV) {
            self.path = path;
        }
    }
}

/// Luminosity sweep: independent runs that differ only in solar luminosity.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SweepConfig {
    /// Luminosity values to run. Empty disables the sweep.
    #[serde(default)]
    pub luminosities: Vec<f64>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON-formatted log lines.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn validate_population(species: Species, params: &PopulationParams) -> Result<(), ConfigError> {
    let field = |name: &str| format!("populations.{species}.{name}");
    require_unit(&field("albedo"), params.albedo)?;
    require_positive(&field("death_rate"), params.death_rate)?;
    require_finite(&field("optimal_temperature"), params.optimal_temperature)?;
    require_positive(&field("growth_width"), params.growth_width)
}

fn require(condition: bool, field: &str, reason: &str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field: field.to_owned(),
            reason: reason.to_owned(),
        })
    }
}

fn require_finite(field: &str, value: f64) -> Result<(), ConfigError> {
    require(value.is_finite(), field, "must be a finite number")
}

fn require_positive(field: &str, value: f64) -> Result<(), ConfigError> {
    require_finite(field, value)?;
    require(value > 0.0, field, "must be greater than zero")
}

fn require_unit(field: &str, value: f64) -> Result<(), ConfigError> {
    require_finite(field, value)?;
    require((0.0..=1.0).contains(&value), field, "must be within [0, 1]")
}

// ---------------------------------------------------------------------------
// Default value functions (serde defaults and the `Default` impls)
// ---------------------------------------------------------------------------

const fn default_initial_fraction() -> f64 {
    0.2
}

const fn default_bare_albedo() -> f64 {
    0.5
}

const fn default_solar_luminosity() -> f64 {
    1.0
}

const fn default_solar_flux() -> f64 {
    917.0
}

const fn default_stefan_boltzmann() -> f64 {
    5.67e-8
}

const fn default_local_heating() -> f64 {
    20.0
}

const fn default_initial_temperature() -> f64 {
    15.0
}

const fn default_tick_count() -> u64 {
    100
}

const fn default_time_step() -> f64 {
    1.0
}

const fn default_white() -> PopulationParams {
    PopulationParams {
        albedo: 0.75,
        death_rate: 0.3,
        optimal_temperature: 22.5,
        growth_width: 17.5,
    }
}

const fn default_black() -> PopulationParams {
    PopulationParams {
        albedo: 0.25,
        death_rate: 0.3,
        optimal_temperature: 22.5,
        growth_width: 17.5,
    }
}

fn default_output_path() -> String {
    "world stats.csv".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}
