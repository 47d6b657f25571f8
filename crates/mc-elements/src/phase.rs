//! Phase state of the alloy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aggregate state the interaction constants are evaluated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseState {
    Liquid,
    Solid,
}

impl PhaseState {
    /// Scale applied to the hybridization term R/P.
    pub fn hybridization_scale(self) -> f64 {
        match self {
            PhaseState::Liquid => 0.73,
            PhaseState::Solid => 1.0,
        }
    }

    /// Divisor α in the excess-entropy relation 1/τ = (1/α)(1/T_mA + 1/T_mB).
    pub fn entropy_divisor(self) -> f64 {
        match self {
            PhaseState::Liquid => 14.0,
            PhaseState::Solid => 15.1,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            PhaseState::Liquid => "liquid",
            PhaseState::Solid => "solid",
        }
    }
}

impl fmt::Display for PhaseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PhaseState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "liquid" | "l" | "liq" => Ok(PhaseState::Liquid),
            "solid" | "s" | "sol" => Ok(PhaseState::Solid),
            other => Err(format!("unknown phase state '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_constants() {
        assert_eq!(PhaseState::Liquid.hybridization_scale(), 0.73);
        assert_eq!(PhaseState::Solid.hybridization_scale(), 1.0);
        assert_eq!(PhaseState::Liquid.entropy_divisor(), 14.0);
        assert_eq!(PhaseState::Solid.entropy_divisor(), 15.1);
    }

    #[test]
    fn parse_phase() {
        assert_eq!("Liquid".parse::<PhaseState>(), Ok(PhaseState::Liquid));
        assert_eq!(" s ".parse::<PhaseState>(), Ok(PhaseState::Solid));
        assert!("gas".parse::<PhaseState>().is_err());
    }
}
