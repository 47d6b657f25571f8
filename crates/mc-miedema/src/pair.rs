//! Miedema binary interaction model.
//!
//! All energies are in kJ/mol. Every quantity is a pure function of its
//! element arguments, the evaluation conditions and the model options; the
//! only state the model carries is the similarity-integral cache.

use crate::options::{Conditions, ModelOptions};
use crate::similarity::SimilarityKey;
use crate::volume::{alloy_surfaces, pure_surfaces};
use mc_core::MemoCache;
use mc_elements::{Element, HybridClass, PhaseState};

/// P for transition–transition pairs
pub const P_TRANSITION: f64 = 14.1;
/// P for transition–nontransition pairs
pub const P_MIXED: f64 = 12.35;
/// P for nontransition–nontransition pairs
pub const P_NON_TRANSITION: f64 = 10.6;
/// Q/P
pub const Q_OVER_P: f64 = 9.4;

fn p_constant(a: &Element, b: &Element) -> f64 {
    match (a.is_transition(), b.is_transition()) {
        (true, true) => P_TRANSITION,
        (false, false) => P_NON_TRANSITION,
        _ => P_MIXED,
    }
}

/// Hybridization correction R/P.
///
/// Non-zero only for a d-band metal combined with a p-element.
fn hybridization_term(a: &Element, b: &Element, state: PhaseState) -> f64 {
    let (ca, cb) = (a.hybrid_class(), b.hybrid_class());
    if ca == HybridClass::Other || cb == HybridClass::Other || ca == cb {
        return 0.0;
    }
    state.hybridization_scale() * a.hybrid_value() * b.hybrid_value()
}

/// Binary interaction energy f(A,B).
///
/// ```text
/// f = 2P · (−(ΔΦ)² + (Q/P)(Δn)² − R/P) / (1/n_A + 1/n_B)
/// ```
///
/// with n = n_ws^(1/3). Symmetric in A and B.
pub fn pair_energy(a: &Element, b: &Element, state: PhaseState) -> f64 {
    let dphi = a.phi() - b.phi();
    let dn = a.nws13() - b.nws13();
    let bracket = -dphi * dphi + Q_OVER_P * dn * dn - hybridization_term(a, b, state);
    2.0 * p_constant(a, b) * bracket / (1.0 / a.nws13() + 1.0 / b.nws13())
}

/// Binary interaction model with memoized similarity integrals.
#[derive(Debug, Default)]
pub struct PairInteractionModel {
    options: ModelOptions,
    pub(crate) similarity_cache: MemoCache<SimilarityKey, f64>,
}

impl PairInteractionModel {
    pub fn new(options: ModelOptions) -> Self {
        Self {
            options,
            similarity_cache: MemoCache::new(),
        }
    }

    pub fn options(&self) -> &ModelOptions {
        &self.options
    }

    /// Number of memoized similarity integrals.
    pub fn cached_integrals(&self) -> usize {
        self.similarity_cache.len()
    }

    pub fn pair_energy(&self, a: &Element, b: &Element, state: PhaseState) -> f64 {
        pair_energy(a, b, state)
    }

    /// Tanaka factor (1 − T/τ), 1/τ = (1/α)(1/T_mA + 1/T_mB); 1 when disabled.
    pub fn excess_entropy_factor(&self, a: &Element, b: &Element, cond: &Conditions) -> f64 {
        if !self.options.excess_entropy {
            return 1.0;
        }
        let inv_tau = (1.0 / a.tm() + 1.0 / b.tm()) / cond.state.entropy_divisor();
        1.0 - cond.t_k() * inv_tau
    }

    /// f(A,B) scaled by the excess-entropy factor.
    pub fn effective_pair_energy(&self, a: &Element, b: &Element, cond: &Conditions) -> f64 {
        pair_energy(a, b, cond.state) * self.excess_entropy_factor(a, b, cond)
    }

    /// Transition enthalpy of an element in the given phase [kJ/mol].
    pub fn transition_enthalpy(&self, e: &Element, state: PhaseState) -> f64 {
        if state == PhaseState::Liquid && e.is_semimetal_without_liquid_transition() {
            return 0.0;
        }
        e.dh_trans()
    }

    /// Chemical heat of one mole of `solute` dissolved in infinitely dilute
    /// `solvent`, without the transition enthalpy:
    /// `f · V_solute^(2/3) · (1 + u·(Φ_solute − Φ_solvent))`.
    pub fn interaction_heat(&self, solute: &Element, solvent: &Element, cond: &Conditions) -> f64 {
        if solute.symbol() == solvent.symbol() {
            return 0.0;
        }
        let volume = solute.v23() * (1.0 + solute.u() * (solute.phi() - solvent.phi()));
        self.effective_pair_energy(solute, solvent, cond) * volume
    }

    /// Dissolution heat of one mole of `solute` in infinitely dilute `solvent`
    /// including its transition enthalpy (zero for liquid Si and Ge).
    pub fn dilution_heat(&self, solute: &Element, solvent: &Element, cond: &Conditions) -> f64 {
        self.interaction_heat(solute, solvent, cond) + self.transition_enthalpy(solute, cond.state)
    }

    /// Mixing energy of `A_xa B_xb` per mole of alloy.
    ///
    /// Chemical part from surface-weighted contacts with the order term
    /// (1 + λ(c_A c_B)²), plus the composition-weighted transition enthalpies.
    pub fn mixing_energy(&self, a: &Element, b: &Element, xa: f64, xb: f64, cond: &Conditions) -> f64 {
        let surfaces = if self.options.volume_in_alloy || a.is_hydrogen() || b.is_hydrogen() {
            alloy_surfaces(a, b, xa, xb)
        } else {
            pure_surfaces(a, b, xa, xb)
        };
        let order = 1.0 + self.options.lambda * (surfaces.c_a * surfaces.c_b).powi(2);
        let chemical = xa * surfaces.c_b * order * self.effective_pair_energy(a, b, cond) * surfaces.v_a;
        let transition = xa * self.transition_enthalpy(a, cond.state)
            + xb * self.transition_enthalpy(b, cond.state);
        chemical + transition
    }

    /// Samples `(x_A, ΔG_mix)` at `points` evenly spaced compositions in [0, 1].
    pub fn mixing_curve(&self, a: &Element, b: &Element, points: usize, cond: &Conditions) -> Vec<(f64, f64)> {
        let n = points.max(2);
        (0..n)
            .map(|i| {
                let x = i as f64 / (n - 1) as f64;
                (x, self.mixing_energy(a, b, x, 1.0 - x, cond))
            })
            .collect()
    }

    /// Elastic size-mismatch energy of `a` dissolved in `b` (solid solutions):
    ///
    /// ```text
    /// ΔH_el = 2 K_A G_B (V_A − V_B)² / (4 G_B V_A + 3 K_A V_B)
    /// ```
    ///
    /// Moduli in GPa and molar volumes in cm³/mol give kJ/mol.
    pub fn elastic_strain_energy(&self, a: &Element, b: &Element) -> f64 {
        let (va, vb) = (a.molar_volume(), b.molar_volume());
        let (ka, gb) = (a.bulk_modulus(), b.shear_modulus());
        2.0 * ka * gb * (va - vb).powi(2) / (4.0 * gb * va + 3.0 * ka * vb)
    }
}
