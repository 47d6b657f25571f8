//! Multicomponent excess energy assembled from subregular binaries.
//!
//! ```text
//! Q(x) = Σ_{p<q} x_p x_q (A_pq X_q + A_qp X_p)
//! X_p  = x_p + Σ_{m∉{p,q}} α_{m→p,(pq)} x_m
//! ```
//!
//! A_pq is the interaction heat of p dissolved in q, so each binary reproduces
//! the Miedema dilution limits at both ends. The composition mapping X hands
//! every other component to the binary's ends according to the geometric
//! weights. ln γ follows from the partial molar form of Q; second-order
//! interaction coefficients are taken from it by central differences, which
//! are exact because Q is a cubic polynomial in x.

use crate::options::Conditions;
use crate::pair::PairInteractionModel;
use crate::weights::GeoModel;
use mc_core::units::constants::R_J_PER_MOL_K;
use mc_elements::Element;

/// Difference step of the second-order coefficients.
const STEP: f64 = 1e-3;
/// Difference step of ε; the central difference carries an h² error here.
const FIRST_ORDER_STEP: f64 = 1e-5;

#[derive(Debug, Clone)]
pub struct ExcessModel {
    symbols: Vec<String>,
    /// A[p][q] [kJ/mol], row-major n×n
    a: Vec<f64>,
    /// α[m][p][q] = α_{m→p,(pq)}, n×n×n
    alpha: Vec<f64>,
    rt_kj: f64,
}

impl ExcessModel {
    /// Build Q for the given components at fixed conditions.
    pub fn new(pair: &PairInteractionModel, geo: GeoModel, elements: &[Element], cond: &Conditions) -> Self {
        let n = elements.len();
        let mut a = vec![0.0; n * n];
        let mut alpha = vec![0.0; n * n * n];
        for (p, ep) in elements.iter().enumerate() {
            for (q, eq) in elements.iter().enumerate() {
                if p == q {
                    continue;
                }
                a[p * n + q] = pair.interaction_heat(ep, eq, cond);
                if p < q {
                    for (m, em) in elements.iter().enumerate() {
                        if m == p || m == q {
                            continue;
                        }
                        let (to_p, to_q) = geo.shares(pair, em, ep, eq, cond);
                        alpha[(m * n + p) * n + q] = to_p;
                        alpha[(m * n + q) * n + p] = to_q;
                    }
                }
            }
        }
        Self {
            symbols: elements.iter().map(|e| e.symbol().to_string()).collect(),
            a,
            alpha,
            rt_kj: R_J_PER_MOL_K * cond.t_k() / 1000.0,
        }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn index_of(&self, symbol: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s == symbol)
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    fn a(&self, p: usize, q: usize) -> f64 {
        self.a[p * self.len() + q]
    }

    fn alpha(&self, m: usize, p: usize, q: usize) -> f64 {
        let n = self.len();
        self.alpha[(m * n + p) * n + q]
    }

    /// ∂X_p/∂x_r inside the binary p–q.
    fn mapped_derivative(&self, p: usize, q: usize, r: usize) -> f64 {
        if r == p {
            1.0
        } else if r == q {
            0.0
        } else {
            self.alpha(r, p, q)
        }
    }

    /// X_p inside the binary p–q.
    fn mapped(&self, p: usize, q: usize, x: &[f64]) -> f64 {
        (0..self.len()).map(|r| self.mapped_derivative(p, q, r) * x[r]).sum()
    }

    /// Q(x) [kJ/mol].
    pub fn excess_energy(&self, x: &[f64]) -> f64 {
        let n = self.len();
        let mut q_total = 0.0;
        for p in 0..n {
            for q in (p + 1)..n {
                let bracket = self.a(p, q) * self.mapped(q, p, x) + self.a(q, p) * self.mapped(p, q, x);
                q_total += x[p] * x[q] * bracket;
            }
        }
        q_total
    }

    /// ∂Q/∂x_r for every component, treating all x as independent.
    pub fn gradient(&self, x: &[f64]) -> Vec<f64> {
        let n = self.len();
        let mut grad = vec![0.0; n];
        for p in 0..n {
            for q in (p + 1)..n {
                let (xp_map, xq_map) = (self.mapped(p, q, x), self.mapped(q, p, x));
                let bracket = self.a(p, q) * xq_map + self.a(q, p) * xp_map;
                for (r, g) in grad.iter_mut().enumerate() {
                    let mut d = 0.0;
                    if r == p {
                        d += x[q] * bracket;
                    }
                    if r == q {
                        d += x[p] * bracket;
                    }
                    d += x[p]
                        * x[q]
                        * (self.a(p, q) * self.mapped_derivative(q, p, r)
                            + self.a(q, p) * self.mapped_derivative(p, q, r));
                    *g += d;
                }
            }
        }
        grad
    }

    /// ln γ_i at composition `x` (indexed like the component list).
    pub fn ln_gamma(&self, i: usize, x: &[f64]) -> f64 {
        let grad = self.gradient(x);
        let weighted: f64 = x.iter().zip(&grad).map(|(xm, g)| xm * g).sum();
        (self.excess_energy(x) + grad[i] - weighted) / self.rt_kj
    }

    /// ln γ_i with the given solute perturbations and the solvent balancing.
    fn dilute_ln_gamma(&self, solvent: usize, i: usize, solutes: &[(usize, f64)]) -> f64 {
        let mut x = vec![0.0; self.len()];
        x[solvent] = 1.0;
        for &(s, v) in solutes {
            x[s] += v;
            x[solvent] -= v;
        }
        self.ln_gamma(i, &x)
    }

    /// ε_i^j = ∂ln γ_i/∂x_j at infinite dilution in `solvent`.
    pub fn epsilon(&self, solvent: usize, i: usize, j: usize) -> f64 {
        let h = FIRST_ORDER_STEP;
        (self.dilute_ln_gamma(solvent, i, &[(j, h)]) - self.dilute_ln_gamma(solvent, i, &[(j, -h)])) / (2.0 * h)
    }

    /// ρ_i^{jj} = ½ ∂²ln γ_i/∂x_j².
    pub fn rho_self(&self, solvent: usize, i: usize, j: usize) -> f64 {
        let h = STEP;
        let plus = self.dilute_ln_gamma(solvent, i, &[(j, h)]);
        let mid = self.dilute_ln_gamma(solvent, i, &[]);
        let minus = self.dilute_ln_gamma(solvent, i, &[(j, -h)]);
        0.5 * (plus - 2.0 * mid + minus) / (h * h)
    }

    /// ρ_i^{jk} = ∂²ln γ_i/∂x_j∂x_k for j ≠ k.
    pub fn rho_cross(&self, solvent: usize, i: usize, j: usize, k: usize) -> f64 {
        let h = STEP;
        let f = |sj: f64, sk: f64| self.dilute_ln_gamma(solvent, i, &[(j, sj * h), (k, sk * h)]);
        (f(1.0, 1.0) - f(1.0, -1.0) - f(-1.0, 1.0) + f(-1.0, -1.0)) / (4.0 * h * h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc_elements::{BuiltinElements, ElementStore};

    fn ternary(geo: GeoModel) -> (PairInteractionModel, ExcessModel, Conditions) {
        let pair = PairInteractionModel::default();
        let cond = Conditions::liquid(1873.0);
        let els: Vec<Element> = ["Fe", "Si", "C"].iter().map(|s| BuiltinElements.element(s)).collect();
        let q = ExcessModel::new(&pair, geo, &els, &cond);
        (pair, q, cond)
    }

    #[test]
    fn pure_components_have_no_excess_energy() {
        let (_, q, _) = ternary(GeoModel::Uem1);
        assert_eq!(q.excess_energy(&[1.0, 0.0, 0.0]), 0.0);
        assert_eq!(q.excess_energy(&[0.0, 0.0, 1.0]), 0.0);
    }

    #[test]
    fn gradient_matches_finite_differences() {
        let (_, q, _) = ternary(GeoModel::Gsm);
        let x = [0.6, 0.3, 0.1];
        let grad = q.gradient(&x);
        for r in 0..3 {
            let h = 1e-6;
            let mut up = x;
            let mut down = x;
            up[r] += h;
            down[r] -= h;
            let fd = (q.excess_energy(&up) - q.excess_energy(&down)) / (2.0 * h);
            assert!((fd - grad[r]).abs() < 1e-6 * grad[r].abs().max(1.0), "r={r}");
        }
    }

    #[test]
    fn dilute_limit_is_interaction_heat() {
        let (pair, q, cond) = ternary(GeoModel::Uem1);
        let fe = BuiltinElements.element("Fe");
        let si = BuiltinElements.element("Si");
        let expected = 1000.0 * pair.interaction_heat(&si, &fe, &cond) / (R_J_PER_MOL_K * 1873.0);
        let got = q.ln_gamma(1, &[1.0, 0.0, 0.0]);
        assert!((got - expected).abs() < 1e-9 * expected.abs());
    }

    #[test]
    fn gibbs_duhem_holds() {
        // Σ x_i dln γ_i = 0 along any composition direction.
        let (_, q, _) = ternary(GeoModel::Uem1);
        let x = [0.7, 0.2, 0.1];
        let dir = [-0.5, 0.3, 0.2];
        let h = 1e-5;
        let shifted = |s: f64| -> Vec<f64> { x.iter().zip(&dir).map(|(a, d)| a + s * d).collect() };
        let sum: f64 = (0..3)
            .map(|i| x[i] * (q.ln_gamma(i, &shifted(h)) - q.ln_gamma(i, &shifted(-h))) / (2.0 * h))
            .sum();
        assert!(sum.abs() < 1e-6, "{sum}");
    }
}
