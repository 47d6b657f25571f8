//! Interaction-coefficient sets and the formalism expansions over them.
//!
//! A [`CoefficientSet`] holds ln γ°, ε and (optionally) ρ for the solutes of
//! one solvent at one temperature. Evaluating a formalism is then a
//! polynomial in the solute mole fractions.

use crate::formalism::Formalism;
use mc_core::{central_difference, simpson};
use serde::Serialize;

/// Step of the dilution-path derivative in the Gibbs–Duhem integral.
const PATH_STEP: f64 = 1e-4;

/// Coefficients of the solutes of one solvent, indexed like `solutes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoefficientSet {
    pub solvent: String,
    pub solutes: Vec<String>,
    /// ln γ°_i
    pub ln_gamma0: Vec<f64>,
    /// ε_i^j as `epsilon[i][j]`
    pub epsilon: Vec<Vec<f64>>,
    /// ρ_i^{jk} as `rho[i][j][k]`, symmetric in j and k. Diagonal entries
    /// `rho[i][j][j]` hold ρ_i^{jj}.
    pub rho: Option<Vec<Vec<Vec<f64>>>>,
}

impl CoefficientSet {
    pub fn len(&self) -> usize {
        self.solutes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutes.is_empty()
    }

    pub fn index_of(&self, symbol: &str) -> Option<usize> {
        self.solutes.iter().position(|s| s == symbol)
    }

    /// Σ_j ε_i^j x_j
    fn first_order_sum(&self, i: usize, x: &[f64]) -> f64 {
        self.epsilon[i].iter().zip(x).map(|(e, xj)| e * xj).sum()
    }

    /// ½ Σ_m Σ_n ε_mn x_m x_n over all solute pairs, self pairs included.
    fn quadratic_form(&self, x: &[f64]) -> f64 {
        let mut sum = 0.0;
        for (m, row) in self.epsilon.iter().enumerate() {
            for (n, e) in row.iter().enumerate() {
                sum += e * x[m] * x[n];
            }
        }
        0.5 * sum
    }

    /// Σ_j ρ_i^{jj} x_j² + Σ_{j<k} ρ_i^{jk} x_j x_k
    fn second_order_sum(&self, i: usize, x: &[f64]) -> f64 {
        let Some(rho) = &self.rho else {
            return f64::NAN;
        };
        let n = self.len();
        let mut sum = 0.0;
        for j in 0..n {
            sum += rho[i][j][j] * x[j] * x[j];
            for k in (j + 1)..n {
                sum += rho[i][j][k] * x[j] * x[k];
            }
        }
        sum
    }

    /// ln γ of solute `i` at solute fractions `x`; the solvent takes the rest.
    pub fn solute_ln_gamma(&self, formalism: Formalism, i: usize, x: &[f64]) -> f64 {
        let base = self.ln_gamma0[i] + self.first_order_sum(i, x);
        match formalism {
            Formalism::Wagner => base,
            Formalism::Pelton => base - self.quadratic_form(x),
            Formalism::Elliott => base + self.second_order_sum(i, x),
        }
    }

    /// Darken quadratic solvent term −½ ΣΣ ε_mn x_m x_n.
    pub fn solvent_ln_gamma_closed_form(&self, x: &[f64]) -> f64 {
        -self.quadratic_form(x)
    }

    /// Solvent ln γ from the Gibbs–Duhem relation, integrated along the
    /// dilution path x(t) = t·x from pure solvent:
    ///
    /// ```text
    /// d ln γ_1/dt = −(1/x_1(t)) Σ_m x_m(t) d ln γ_m(x(t))/dt
    /// ```
    pub fn solvent_ln_gamma_gibbs_duhem(&self, formalism: Formalism, x: &[f64], intervals: usize) -> f64 {
        let total: f64 = x.iter().sum();
        let scaled = |t: f64| -> Vec<f64> { x.iter().map(|v| v * t).collect() };
        let integrand = |t: f64| {
            let x1 = 1.0 - t * total;
            let mut sum = 0.0;
            for (m, xm) in x.iter().enumerate() {
                let slope = central_difference(t, PATH_STEP, |s| self.solute_ln_gamma(formalism, m, &scaled(s)));
                sum += t * xm * slope;
            }
            -sum / x1
        };
        simpson(0.0, 1.0, intervals, integrand)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary() -> CoefficientSet {
        CoefficientSet {
            solvent: "Fe".into(),
            solutes: vec!["Si".into()],
            ln_gamma0: vec![-6.0],
            epsilon: vec![vec![12.0]],
            rho: Some(vec![vec![vec![-4.0]]]),
        }
    }

    fn ternary() -> CoefficientSet {
        CoefficientSet {
            solvent: "Fe".into(),
            solutes: vec!["C".into(), "Si".into()],
            ln_gamma0: vec![-0.6, -6.0],
            epsilon: vec![vec![11.0, 9.0], vec![9.0, 12.0]],
            rho: Some(vec![
                vec![vec![-2.0, 1.0], vec![1.0, 3.0]],
                vec![vec![0.5, 2.0], vec![2.0, -4.0]],
            ]),
        }
    }

    #[test]
    fn formalisms_agree_at_infinite_dilution() {
        let c = ternary();
        for f in Formalism::ALL {
            assert_eq!(c.solute_ln_gamma(f, 1, &[0.0, 0.0]), -6.0);
        }
    }

    #[test]
    fn binary_expansions() {
        let c = binary();
        let x = [0.1];
        assert!((c.solute_ln_gamma(Formalism::Wagner, 0, &x) - (-6.0 + 1.2)).abs() < 1e-12);
        assert!((c.solute_ln_gamma(Formalism::Pelton, 0, &x) - (-6.0 + 1.2 - 0.06)).abs() < 1e-12);
        assert!((c.solute_ln_gamma(Formalism::Elliott, 0, &x) - (-6.0 + 1.2 - 0.04)).abs() < 1e-12);
    }

    #[test]
    fn elliott_keeps_cross_terms() {
        let c = ternary();
        let x = [0.02, 0.05];
        let expected = -0.6 + 11.0 * 0.02 + 9.0 * 0.05 - 2.0 * 0.02 * 0.02 + 1.0 * 0.02 * 0.05 + 3.0 * 0.05 * 0.05;
        assert!((c.solute_ln_gamma(Formalism::Elliott, 0, &x) - expected).abs() < 1e-12);
    }

    #[test]
    fn elliott_without_rho_is_nan() {
        let mut c = binary();
        c.rho = None;
        assert!(c.solute_ln_gamma(Formalism::Elliott, 0, &[0.1]).is_nan());
    }

    #[test]
    fn gibbs_duhem_reproduces_darken_solvent() {
        let c = ternary();
        let x = [0.03, 0.08];
        let closed = c.solvent_ln_gamma_closed_form(&x);
        let integrated = c.solvent_ln_gamma_gibbs_duhem(Formalism::Pelton, &x, 40);
        assert!((closed - integrated).abs() < 1e-8, "{closed} vs {integrated}");
    }

    #[test]
    fn pure_solvent_has_zero_solvent_term() {
        let c = ternary();
        assert_eq!(c.solvent_ln_gamma_closed_form(&[0.0, 0.0]), 0.0);
        assert_eq!(c.solvent_ln_gamma_gibbs_duhem(Formalism::Wagner, &[0.0, 0.0], 10), 0.0);
    }
}
