//! Shared type definitions for the Daisyworld simulation.
//!
//! This crate is the single source of truth for the data model passed
//! between the simulation engine and anything consuming its output.
//!
//! # Modules
//!
//! - [`enums`] -- The two competing populations ([`Species`]).
//! - [`structs`] -- Planet state, per-tick records, and population parameters.

pub mod enums;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::Species;
pub use structs::{PlanetState, PopulationParams, TickRecord};
