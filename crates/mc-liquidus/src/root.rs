//! Schröder–van Laar root finding.
//!
//! Solves
//!
//! ```text
//! r(T) = ln a_1(T) − (ΔH_f/R)·(1/T_m − 1/T) = 0
//! ```
//!
//! with Newton–Raphson on a numerically differenced derivative, falling back
//! to bisection when Newton fails to converge.

use mc_core::constants::R_J_PER_MOL_K;
use serde::{Deserialize, Serialize};

/// Root solver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootConfig {
    /// Absolute residual tolerance
    pub residual_tol: f64,
    /// Step (or half-bracket) tolerance [K]
    pub step_tol_k: f64,
    /// Maximum Newton iterations
    pub max_newton_iterations: usize,
    /// Maximum bisection iterations
    pub max_bisection_iterations: usize,
    /// Largest single Newton step [K]
    pub max_step_k: f64,
    /// Forward/backward offset of the numeric derivative [K]
    pub derivative_step_k: f64,
    /// Lowest temperature of the search bracket [K]
    pub floor_k: f64,
    /// Bracket extent below T_m [K]
    pub below_tm_k: f64,
    /// Bracket extent above T_m [K]
    pub above_tm_k: f64,
    /// Skip Newton and bisect directly
    pub newton: bool,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            residual_tol: 1e-6,
            step_tol_k: 0.01,
            max_newton_iterations: 100,
            max_bisection_iterations: 200,
            max_step_k: 500.0,
            derivative_step_k: 0.01,
            floor_k: 200.0,
            below_tm_k: 1500.0,
            above_tm_k: 50.0,
            newton: true,
        }
    }
}

impl RootConfig {
    /// `[max(floor, T_m − below), T_m + above]`
    pub fn bracket(&self, tm_k: f64) -> (f64, f64) {
        ((tm_k - self.below_tm_k).max(self.floor_k), tm_k + self.above_tm_k)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootMethod {
    /// Solvent fraction close enough to 1 that T = T_m
    PureSolvent,
    Newton,
    Bisection,
}

/// Outcome of one root solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RootResult {
    pub t_k: f64,
    pub residual: f64,
    pub iterations: usize,
    pub converged: bool,
    pub method: RootMethod,
}

/// The Schröder–van Laar equation for one solvent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchroederVanLaar {
    pub tm_k: f64,
    /// [J/mol]
    pub fusion_enthalpy: f64,
}

impl SchroederVanLaar {
    /// ln a of the solid-saturated melt at `t_k`.
    pub fn ideal_ln_activity(&self, t_k: f64) -> f64 {
        self.fusion_enthalpy / R_J_PER_MOL_K * (1.0 / self.tm_k - 1.0 / t_k)
    }

    pub fn residual(&self, ln_a: f64, t_k: f64) -> f64 {
        ln_a - self.ideal_ln_activity(t_k)
    }

    /// T at which the ideal relation gives `ln_a`.
    pub fn invert(&self, ln_a: f64) -> f64 {
        1.0 / (1.0 / self.tm_k - R_J_PER_MOL_K * ln_a / self.fusion_enthalpy)
    }

    /// Solve for T with `ln_activity(T)` the solvent's ln a in the melt.
    pub fn solve<F>(&self, ln_activity: F, config: &RootConfig) -> RootResult
    where
        F: Fn(f64) -> f64,
    {
        let r = |t: f64| self.residual(ln_activity(t), t);
        let (lo, hi) = config.bracket(self.tm_k);

        if config.newton {
            // Linearized inversion with the activity frozen at T_m.
            let seed = self.invert(ln_activity(self.tm_k));
            let seed = if seed.is_finite() { seed.clamp(lo, hi) } else { self.tm_k };
            let result = newton(&r, seed, (lo, hi), config);
            if result.converged {
                tracing::debug!(t_k = result.t_k, iterations = result.iterations, "newton converged");
                return result;
            }
            tracing::warn!(
                t_k = result.t_k,
                iterations = result.iterations,
                "newton did not converge, bisecting"
            );
        }
        let result = bisection(&r, (lo, hi), config);
        tracing::debug!(
            t_k = result.t_k,
            iterations = result.iterations,
            converged = result.converged,
            "bisection finished"
        );
        result
    }
}

fn newton<F: Fn(f64) -> f64>(r: &F, seed: f64, (lo, hi): (f64, f64), config: &RootConfig) -> RootResult {
    let h = config.derivative_step_k;
    let mut t = seed;
    let mut value = r(t);
    for iter in 0..config.max_newton_iterations {
        if !value.is_finite() {
            break;
        }
        if value.abs() < config.residual_tol {
            return RootResult {
                t_k: t,
                residual: value,
                iterations: iter,
                converged: true,
                method: RootMethod::Newton,
            };
        }
        let slope = (r(t + h) - r(t - h)) / (2.0 * h);
        if !slope.is_finite() || slope == 0.0 {
            break;
        }
        let step = (-value / slope).clamp(-config.max_step_k, config.max_step_k);
        t = (t + step).clamp(lo, hi);
        value = r(t);
        // Step before bracket clamping.
        if value.is_finite() && (step.abs() < config.step_tol_k || value.abs() < config.residual_tol) {
            return RootResult {
                t_k: t,
                residual: value,
                iterations: iter + 1,
                converged: true,
                method: RootMethod::Newton,
            };
        }
    }
    RootResult {
        t_k: t,
        residual: value,
        iterations: config.max_newton_iterations,
        converged: false,
        method: RootMethod::Newton,
    }
}

/// Widenings tried when the bracket holds no sign change.
const MAX_WIDENINGS: usize = 8;

/// Sign change between two residuals; false when either is NaN.
fn straddles(a: f64, b: f64) -> bool {
    a * b <= 0.0
}

fn bisection<F: Fn(f64) -> f64>(r: &F, (mut lo, mut hi): (f64, f64), config: &RootConfig) -> RootResult {
    let mut r_lo = r(lo);
    let mut r_hi = r(hi);

    let mut widenings = 0;
    while !straddles(r_lo, r_hi) && widenings < MAX_WIDENINGS {
        let width = hi - lo;
        lo = (lo - width).max(1.0);
        hi += width;
        r_lo = r(lo);
        r_hi = r(hi);
        widenings += 1;
    }
    if !straddles(r_lo, r_hi) {
        tracing::warn!(lo, hi, "no sign change in liquidus bracket");
        let (t_k, residual) = if !(r_lo.is_finite() && r_hi.is_finite()) {
            (f64::NAN, f64::NAN)
        } else if r_lo.abs() <= r_hi.abs() {
            (lo, r_lo)
        } else {
            (hi, r_hi)
        };
        return RootResult {
            t_k,
            residual,
            iterations: 0,
            converged: false,
            method: RootMethod::Bisection,
        };
    }

    let mut mid = 0.5 * (lo + hi);
    let mut r_mid = r(mid);
    for iter in 0..config.max_bisection_iterations {
        if r_mid.abs() < config.residual_tol || 0.5 * (hi - lo) < config.step_tol_k {
            return RootResult {
                t_k: mid,
                residual: r_mid,
                iterations: iter,
                converged: true,
                method: RootMethod::Bisection,
            };
        }
        if straddles(r_lo, r_mid) {
            hi = mid;
        } else {
            lo = mid;
            r_lo = r_mid;
        }
        mid = 0.5 * (lo + hi);
        r_mid = r(mid);
    }
    RootResult {
        t_k: mid,
        residual: r_mid,
        iterations: config.max_bisection_iterations,
        converged: false,
        method: RootMethod::Bisection,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn ideal_root_matches_inversion(
            x in 0.6_f64..0.999,
            tm in 600.0_f64..3000.0,
            dh in 5000.0_f64..40000.0,
        ) {
            let svl = SchroederVanLaar { tm_k: tm, fusion_enthalpy: dh };
            let expected = svl.invert(x.ln());
            let (lo, _) = RootConfig::default().bracket(tm);
            prop_assume!(expected > lo);
            for newton in [true, false] {
                let config = RootConfig { newton, ..RootConfig::default() };
                let got = svl.solve(|_| x.ln(), &config);
                prop_assert!(got.converged);
                prop_assert!((got.t_k - expected).abs() < 0.01, "{} vs {}", got.t_k, expected);
            }
        }
    }
}
