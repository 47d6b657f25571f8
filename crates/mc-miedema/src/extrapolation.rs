//! Activity interaction coefficients of a solvent with one or two solutes.
//!
//! First-order coefficients have a closed form from the subregular binaries
//! and the geometric weights; second-order coefficients are derived from the
//! full excess energy [`ExcessModel`] of the system.

use crate::excess::ExcessModel;
use crate::options::{Conditions, ModelOptions};
use crate::pair::PairInteractionModel;
use crate::weights::GeoModel;
use mc_core::units::constants::R_J_PER_MOL_K;
use mc_elements::Element;

/// The six directional weights of a solvent k with solutes i and j.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalWeights {
    /// α_{k→i,(ij)}
    pub k_to_i: f64,
    /// α_{k→j,(ij)}
    pub k_to_j: f64,
    /// α_{j→i,(ik)}
    pub j_to_i: f64,
    /// α_{j→k,(ik)}
    pub j_to_k: f64,
    /// α_{i→j,(jk)}
    pub i_to_j: f64,
    /// α_{i→k,(jk)}
    pub i_to_k: f64,
}

#[derive(Debug, Default)]
pub struct GeometricExtrapolationModel {
    pair: PairInteractionModel,
    geo: GeoModel,
}

impl GeometricExtrapolationModel {
    pub fn new(options: ModelOptions, geo: GeoModel) -> Self {
        Self::with_pair(PairInteractionModel::new(options), geo)
    }

    pub fn with_pair(pair: PairInteractionModel, geo: GeoModel) -> Self {
        Self { pair, geo }
    }

    pub fn pair(&self) -> &PairInteractionModel {
        &self.pair
    }

    pub fn geo(&self) -> GeoModel {
        self.geo
    }

    fn rt_kj(cond: &Conditions) -> f64 {
        R_J_PER_MOL_K * cond.t_k() / 1000.0
    }

    /// ln γ° of `solute` infinitely dilute in `solvent`, transition enthalpy included.
    pub fn infinite_dilution_term(&self, solvent: &Element, solute: &Element, cond: &Conditions) -> f64 {
        if solvent.symbol() == solute.symbol() {
            return 0.0;
        }
        self.pair.dilution_heat(solute, solvent, cond) / Self::rt_kj(cond)
    }

    pub fn directional_weights(&self, k: &Element, i: &Element, j: &Element, cond: &Conditions) -> DirectionalWeights {
        let (k_to_i, k_to_j) = self.geo.shares(&self.pair, k, i, j, cond);
        let (j_to_i, j_to_k) = self.geo.shares(&self.pair, j, i, k, cond);
        let (i_to_j, i_to_k) = self.geo.shares(&self.pair, i, j, k, cond);
        DirectionalWeights {
            k_to_i,
            k_to_j,
            j_to_i,
            j_to_k,
            i_to_j,
            i_to_k,
        }
    }

    /// ε_i^j of solutes i and j in solvent k.
    ///
    /// ```text
    /// ε = 1000 (ω_ij − ω_ik − ω_jk + Δω_ik + Δω_jk) / RT
    /// ω_ij  = H(i in j) α_{k→j,(ij)} + H(j in i) α_{k→i,(ij)}
    /// ω_ik  = H(i in k),  Δω_ik = α_{j→i,(ik)} (H(k in i) − H(i in k))
    /// ω_jk  = H(j in k),  Δω_jk = α_{i→j,(jk)} (H(k in j) − H(j in k))
    /// ```
    ///
    /// For i = j this reduces to (2 H(k in i) − 4 H(i in k)) / RT.
    pub fn first_order_interaction(&self, k: &Element, i: &Element, j: &Element, cond: &Conditions) -> f64 {
        let h = |p: &Element, q: &Element| self.pair.interaction_heat(p, q, cond);
        let (h_ik, h_ki) = (h(i, k), h(k, i));
        if i.symbol() == j.symbol() {
            return 1000.0 * (2.0 * h_ki - 4.0 * h_ik) / (R_J_PER_MOL_K * cond.t_k());
        }
        let (h_jk, h_kj) = (h(j, k), h(k, j));
        let w = self.directional_weights(k, i, j, cond);

        let omega_ij = h(i, j) * w.k_to_j + h(j, i) * w.k_to_i;
        let d_omega_ik = w.j_to_i * (h_ki - h_ik);
        let d_omega_jk = w.i_to_j * (h_kj - h_jk);
        let sum = omega_ij - h_ik - h_jk + d_omega_ik + d_omega_jk;
        tracing::trace!(k = k.symbol(), i = i.symbol(), j = j.symbol(), omega_ij, sum, "first-order");
        sum / Self::rt_kj(cond)
    }

    /// Excess energy of the solvent followed by the given solutes.
    pub fn excess_model(&self, solvent: &Element, solutes: &[&Element], cond: &Conditions) -> ExcessModel {
        let mut elements = vec![solvent.clone()];
        for s in solutes {
            if elements.iter().all(|e| e.symbol() != s.symbol()) {
                elements.push((*s).clone());
            }
        }
        ExcessModel::new(&self.pair, self.geo, &elements, cond)
    }

    /// ρ_i^{ii}.
    pub fn second_order_self(&self, k: &Element, i: &Element, cond: &Conditions) -> f64 {
        let q = self.excess_model(k, &[i], cond);
        q.rho_self(0, 1, 1)
    }

    /// ρ_i^{ij}.
    pub fn second_order_cross(&self, k: &Element, i: &Element, j: &Element, cond: &Conditions) -> f64 {
        if i.symbol() == j.symbol() {
            return self.second_order_self(k, i, cond);
        }
        let q = self.excess_model(k, &[i, j], cond);
        q.rho_cross(0, 1, 1, 2)
    }

    /// ρ_i^{jj}.
    pub fn second_order_mixed(&self, k: &Element, i: &Element, j: &Element, cond: &Conditions) -> f64 {
        if i.symbol() == j.symbol() {
            return self.second_order_self(k, i, cond);
        }
        let q = self.excess_model(k, &[i, j], cond);
        q.rho_self(0, 1, 2)
    }

    /// ρ_i^{jl} for two solutes j ≠ l that both differ from i.
    pub fn second_order_pair(&self, k: &Element, i: &Element, j: &Element, l: &Element, cond: &Conditions) -> f64 {
        if j.symbol() == l.symbol() {
            return self.second_order_mixed(k, i, j, cond);
        }
        if i.symbol() == j.symbol() {
            return self.second_order_cross(k, i, l, cond);
        }
        if i.symbol() == l.symbol() {
            return self.second_order_cross(k, i, j, cond);
        }
        let q = self.excess_model(k, &[i, j, l], cond);
        q.rho_cross(0, 1, 2, 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc_elements::{BuiltinElements, ElementStore};

    fn el(s: &str) -> Element {
        BuiltinElements.element(s)
    }

    #[test]
    fn pure_solvent_has_zero_infinite_dilution_term() {
        let m = GeometricExtrapolationModel::default();
        let fe = el("Fe");
        assert_eq!(m.infinite_dilution_term(&fe, &fe, &Conditions::liquid(1873.0)), 0.0);
    }

    #[test]
    fn carbon_in_iron_is_repelled_by_transition_enthalpy() {
        let m = GeometricExtrapolationModel::default();
        let cond = Conditions::liquid(1873.0);
        let with = m.infinite_dilution_term(&el("Fe"), &el("C"), &cond);
        let without = m.pair().interaction_heat(&el("C"), &el("Fe"), &cond) / (R_J_PER_MOL_K * 1873.0 / 1000.0);
        assert!(with > without);
    }

    #[test]
    fn self_interaction_uses_both_dilution_limits() {
        let m = GeometricExtrapolationModel::default();
        let cond = Conditions::liquid(1873.0);
        let (fe, si) = (el("Fe"), el("Si"));
        let a = m.pair().interaction_heat(&si, &fe, &cond);
        let b = m.pair().interaction_heat(&fe, &si, &cond);
        let expected = 1000.0 * (2.0 * b - 4.0 * a) / (R_J_PER_MOL_K * 1873.0);
        assert!((m.first_order_interaction(&fe, &si, &si, &cond) - expected).abs() < 1e-12);
    }

    #[test]
    fn directional_weights_are_normalized() {
        let m = GeometricExtrapolationModel::new(ModelOptions::default(), GeoModel::Gsm);
        let w = m.directional_weights(&el("Fe"), &el("C"), &el("Si"), &Conditions::liquid(1873.0));
        for (a, b) in [(w.k_to_i, w.k_to_j), (w.j_to_i, w.j_to_k), (w.i_to_j, w.i_to_k)] {
            assert!((a + b - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn second_order_self_is_finite() {
        let m = GeometricExtrapolationModel::default();
        let rho = m.second_order_self(&el("Fe"), &el("Si"), &Conditions::liquid(1873.0));
        assert!(rho.is_finite());
    }

    #[test]
    fn unknown_solute_is_nan() {
        let m = GeometricExtrapolationModel::default();
        let cond = Conditions::liquid(1873.0);
        assert!(m.first_order_interaction(&el("Fe"), &el("Xx"), &el("Si"), &cond).is_nan());
        assert!(m.infinite_dilution_term(&el("Fe"), &el("Xx"), &cond).is_nan());
    }
}
