//! Volume-in-alloy fixed point.
//!
//! Atomic surfaces shrink or swell with the charge transfer towards the more
//! electronegative partner, and the surface concentrations that weight the
//! contact interactions depend on those corrected surfaces:
//!
//! ```text
//! V_A = V_A⁰ · (1 + u_A · c_B · (Φ_A − Φ_B))
//! c_A = x_A V_A / (x_A V_A + x_B V_B)
//! ```
//!
//! The pair is solved by direct iteration, bounded by an iteration cap and a
//! wall-clock limit. Running out of either is a soft non-convergence: the last
//! iterate is returned.

use mc_elements::Element;
use std::time::{Duration, Instant};

/// Wall-clock bound of one fixed-point solve.
pub const FIXED_POINT_TIME_LIMIT: Duration = Duration::from_secs(15);

const MAX_ITERATIONS: usize = 10_000;
const TOLERANCE: f64 = 1e-12;

/// Converged surface state of a binary at one composition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlloySurfaces {
    /// V^(2/3) of A in the alloy [cm²]
    pub v_a: f64,
    /// V^(2/3) of B in the alloy [cm²]
    pub v_b: f64,
    /// Surface concentration of A
    pub c_a: f64,
    /// Surface concentration of B
    pub c_b: f64,
    pub iterations: usize,
    pub converged: bool,
}

fn surface_fractions(xa: f64, xb: f64, va: f64, vb: f64) -> (f64, f64) {
    let total = xa * va + xb * vb;
    (xa * va / total, xb * vb / total)
}

/// Surfaces from pure-element volumes, no charge-transfer correction.
pub fn pure_surfaces(a: &Element, b: &Element, xa: f64, xb: f64) -> AlloySurfaces {
    let (va, vb) = (a.v23(), b.v23());
    let (c_a, c_b) = surface_fractions(xa, xb, va, vb);
    AlloySurfaces {
        v_a: va,
        v_b: vb,
        c_a,
        c_b,
        iterations: 0,
        converged: true,
    }
}

/// Solve the volume-in-alloy fixed point for `A_xa B_xb`.
pub fn alloy_surfaces(a: &Element, b: &Element, xa: f64, xb: f64) -> AlloySurfaces {
    alloy_surfaces_with_limit(a, b, xa, xb, FIXED_POINT_TIME_LIMIT)
}

pub fn alloy_surfaces_with_limit(
    a: &Element,
    b: &Element,
    xa: f64,
    xb: f64,
    limit: Duration,
) -> AlloySurfaces {
    let (va0, vb0) = (a.v23(), b.v23());
    let (ua, ub) = (a.u(), b.u());
    let dphi = a.phi() - b.phi();

    let mut state = pure_surfaces(a, b, xa, xb);
    if !(state.c_a.is_finite() && state.c_b.is_finite()) {
        state.converged = false;
        return state;
    }

    let start = Instant::now();
    for iter in 1..=MAX_ITERATIONS {
        let v_a = va0 * (1.0 + ua * state.c_b * dphi);
        let v_b = vb0 * (1.0 - ub * state.c_a * dphi);
        let (c_a, c_b) = surface_fractions(xa, xb, v_a, v_b);
        let delta = (c_a - state.c_a).abs();
        state = AlloySurfaces {
            v_a,
            v_b,
            c_a,
            c_b,
            iterations: iter,
            converged: false,
        };
        if delta < TOLERANCE {
            state.converged = true;
            return state;
        }
        if start.elapsed() > limit {
            tracing::warn!(
                a = a.symbol(),
                b = b.symbol(),
                iterations = iter,
                "volume-in-alloy iteration hit the time limit"
            );
            return state;
        }
    }

    tracing::warn!(
        a = a.symbol(),
        b = b.symbol(),
        "volume-in-alloy iteration did not converge"
    );
    state
}
