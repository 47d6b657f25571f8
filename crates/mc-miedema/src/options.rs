//! Model options and evaluation conditions.

use mc_core::units::{Temperature, k};
use mc_elements::PhaseState;
use serde::{Deserialize, Serialize};

/// Short-range order of the alloy, mapped onto the order parameter λ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderState {
    Disordered,
    Amorphous,
    Ordered,
}

impl OrderState {
    pub fn lambda(self) -> f64 {
        match self {
            OrderState::Disordered => 0.0,
            OrderState::Amorphous => 5.0,
            OrderState::Ordered => 8.0,
        }
    }
}

/// Options of the binary interaction model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelOptions {
    /// Scale interaction energies by the Tanaka excess-entropy factor (1 − T/τ).
    pub excess_entropy: bool,
    /// Order parameter λ of the (1 + λ(c_A c_B)²) term.
    pub lambda: f64,
    /// Solve the volume-in-alloy fixed point. Hydrogen always does.
    pub volume_in_alloy: bool,
    /// Simpson intervals for the similarity integrals.
    pub integration_intervals: usize,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            excess_entropy: false,
            lambda: OrderState::Disordered.lambda(),
            volume_in_alloy: true,
            integration_intervals: 50,
        }
    }
}

impl ModelOptions {
    pub fn with_order(mut self, order: OrderState) -> Self {
        self.lambda = order.lambda();
        self
    }

    pub fn with_excess_entropy(mut self, on: bool) -> Self {
        self.excess_entropy = on;
        self
    }
}

/// Temperature and phase state a quantity is evaluated at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conditions {
    pub t: Temperature,
    pub state: PhaseState,
}

impl Conditions {
    pub fn new(t: Temperature, state: PhaseState) -> Self {
        Self { t, state }
    }

    pub fn liquid(t_k: f64) -> Self {
        Self::new(k(t_k), PhaseState::Liquid)
    }

    pub fn solid(t_k: f64) -> Self {
        Self::new(k(t_k), PhaseState::Solid)
    }

    /// Temperature in kelvin.
    pub fn t_k(&self) -> f64 {
        self.t.value
    }

    /// Same temperature, other phase.
    pub fn with_state(self, state: PhaseState) -> Self {
        Self { state, ..self }
    }

    /// Same phase, other temperature.
    pub fn at(self, t_k: f64) -> Self {
        Self { t: k(t_k), ..self }
    }
}
