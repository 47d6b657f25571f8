//! Similarity metrics between binary mixing curves.
//!
//! Each metric answers "how differently do k and i behave towards j": the
//! mixing curves j–k and j–i are compared over the whole composition range.
//! Integrals are memoized per (metric, k, i, j, λ, phase), plus T when the
//! excess-entropy factor makes the curves temperature dependent.

use crate::options::Conditions;
use crate::pair::PairInteractionModel;
use mc_core::{FloatKey, simpson};
use mc_elements::{Element, PhaseState};

/// Metric families backing the geometric weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimilarityMetric {
    /// Raw squared-deviation integral η (GSM)
    Yeta,
    /// Squared deviation normalized by the curves' own magnitude (UEM2)
    DeviationIntegral,
    /// Distance between the centroids of the two curves (UEM2 variant)
    GraphicCenter,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct SimilarityKey {
    metric: SimilarityMetric,
    k: String,
    i: String,
    j: String,
    lambda: FloatKey,
    state: PhaseState,
    t: Option<FloatKey>,
}

impl PairInteractionModel {
    fn cached(
        &self,
        metric: SimilarityMetric,
        (k, i, j): (&Element, &Element, &Element),
        cond: &Conditions,
        compute: impl FnOnce() -> f64,
    ) -> f64 {
        let key = SimilarityKey {
            metric,
            k: k.symbol().to_string(),
            i: i.symbol().to_string(),
            j: j.symbol().to_string(),
            lambda: FloatKey::new(self.options().lambda),
            state: cond.state,
            t: self.options().excess_entropy.then(|| FloatKey::new(cond.t_k())),
        };
        self.similarity_cache.get_or_compute(key, || {
            tracing::trace!(?metric, k = k.symbol(), i = i.symbol(), j = j.symbol(), "similarity miss");
            compute()
        })
    }

    /// Mixing energy of j with `partner` at j-fraction `x`.
    fn curve(&self, j: &Element, partner: &Element, x: f64, cond: &Conditions) -> f64 {
        self.mixing_energy(j, partner, x, 1.0 - x, cond)
    }

    /// η(k,i;j) = ∫₀¹ (ΔG_jk(x) − ΔG_ji(x))² dx, x the fraction of j.
    pub fn yeta(&self, k: &Element, i: &Element, j: &Element, cond: &Conditions) -> f64 {
        if k.symbol() == i.symbol() {
            return 0.0;
        }
        self.cached(SimilarityMetric::Yeta, (k, i, j), cond, || {
            let n = self.options().integration_intervals;
            simpson(0.0, 1.0, n, |x| {
                let d = self.curve(j, k, x, cond) - self.curve(j, i, x, cond);
                d * d
            })
        })
    }

    /// Squared deviation of the j–k and j–i curves relative to their combined
    /// squared magnitude. Lies in [0, 2]; two identically zero curves give 0.
    pub fn deviation_integral(&self, k: &Element, i: &Element, j: &Element, cond: &Conditions) -> f64 {
        if k.symbol() == i.symbol() {
            return 0.0;
        }
        self.cached(SimilarityMetric::DeviationIntegral, (k, i, j), cond, || {
            let n = self.options().integration_intervals;
            let deviation = self.yeta(k, i, j, cond);
            let magnitude = simpson(0.0, 1.0, n, |x| {
                let gk = self.curve(j, k, x, cond);
                let gi = self.curve(j, i, x, cond);
                gk * gk + gi * gi
            });
            if magnitude == 0.0 {
                0.0
            } else {
                deviation / magnitude
            }
        })
    }

    /// Euclidean distance between the area centroids of the j–k and j–i curves.
    pub fn graphic_center(&self, k: &Element, i: &Element, j: &Element, cond: &Conditions) -> f64 {
        if k.symbol() == i.symbol() {
            return 0.0;
        }
        self.cached(SimilarityMetric::GraphicCenter, (k, i, j), cond, || {
            let (xk, yk) = self.centroid(j, k, cond);
            let (xi, yi) = self.centroid(j, i, cond);
            ((xk - xi).powi(2) + (yk - yi).powi(2)).sqrt()
        })
    }

    /// Centroid of the region between the j–partner curve and the axis,
    /// with |ΔG| as the area density. A flat curve sits at (0.5, 0).
    fn centroid(&self, j: &Element, partner: &Element, cond: &Conditions) -> (f64, f64) {
        let n = self.options().integration_intervals;
        let area = simpson(0.0, 1.0, n, |x| self.curve(j, partner, x, cond).abs());
        if area == 0.0 {
            return (0.5, 0.0);
        }
        let mx = simpson(0.0, 1.0, n, |x| x * self.curve(j, partner, x, cond).abs());
        let my = simpson(0.0, 1.0, n, |x| {
            let g = self.curve(j, partner, x, cond);
            0.5 * g * g.abs()
        });
        (mx / area, my / area)
    }

    /// Infinite-dilution descriptor difference |ΔH°(k in j) − ΔH°(i in j)|.
    ///
    /// Asymmetric: only the solute-side limit of each binary is compared.
    pub fn dissimilarity(&self, k: &Element, i: &Element, j: &Element, cond: &Conditions) -> f64 {
        if k.symbol() == i.symbol() {
            return 0.0;
        }
        (self.interaction_heat(k, j, cond) - self.interaction_heat(i, j, cond)).abs()
    }
}
