//! Enumeration types for the Daisyworld simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two surface-albedo populations competing for bare ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    /// High-albedo daisies. Cool their surroundings.
    White,
    /// Low-albedo daisies. Warm their surroundings.
    Black,
}

impl Species {
    /// Both species in output column order (white first).
    pub const ALL: [Self; 2] = [Self::White, Self::Black];

    /// Lowercase name used in logs and config keys.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn species_serializes_snake_case() {
        let json = serde_json::to_string(&Species::White).unwrap();
        assert_eq!(json, "\"white\"");
        let back: Species = serde_json::from_str("\"black\"").unwrap();
        assert_eq!(back, Species::Black);
    }

    #[test]
    fn column_order_is_white_then_black() {
        assert_eq!(Species::ALL, [Species::White, Species::Black]);
        assert_eq!(Species::Black.to_string(), "black");
    }
}
