//! Error types for the Daisyworld engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and simulation execution.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// No configuration file exists at the resolved path.
    #[error("config file not found: {path}")]
    MissingConfig {
        /// Path that was looked up.
        path: String,
    },

    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: daisyworld_core::ConfigError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: daisyworld_core::RunnerError,
    },

    /// The output file could not be created.
    #[error("cannot create output file {path}: {source}")]
    Output {
        /// Path of the output file.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A blocking simulation worker panicked or was aborted.
    #[error("worker error: {message}")]
    Worker {
        /// Description of the worker failure.
        message: String,
    },
}
