//! Geometric extrapolation weights.
//!
//! A weight α_{k→i,(ij)} is the share of a third element k that behaves like i
//! inside the binary i–j. Every scheme measures a distance d between k and
//! each end of the binary and splits k towards the closer one:
//!
//! ```text
//! α_{k→i,(ij)} = d(k,j) / (d(k,i) + d(k,j))
//! ```

use crate::options::Conditions;
use crate::pair::PairInteractionModel;
use mc_elements::Element;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Perturbation added to both distances when they are exactly zero.
const SPLIT_EPS: f64 = 1e-12;

/// Distance measure used by the UEM2 scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Uem2Variant {
    #[default]
    DeviationIntegral,
    GraphicCenter,
}

/// Geometric weighting scheme, chosen once per calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoModel {
    /// Infinite-dilution heat difference
    #[default]
    Uem1,
    /// Normalized curve deviation or centroid distance
    Uem2(Uem2Variant),
    /// Raw similarity integral
    Gsm,
}

impl GeoModel {
    pub const ALL: [GeoModel; 4] = [
        GeoModel::Uem1,
        GeoModel::Uem2(Uem2Variant::DeviationIntegral),
        GeoModel::Uem2(Uem2Variant::GraphicCenter),
        GeoModel::Gsm,
    ];

    pub fn key(self) -> &'static str {
        match self {
            GeoModel::Uem1 => "uem1",
            GeoModel::Uem2(Uem2Variant::DeviationIntegral) => "uem2",
            GeoModel::Uem2(Uem2Variant::GraphicCenter) => "uem2-gc",
            GeoModel::Gsm => "gsm",
        }
    }

    /// Distance between k and i as seen from j.
    pub fn distance(
        self,
        model: &PairInteractionModel,
        k: &Element,
        i: &Element,
        j: &Element,
        cond: &Conditions,
    ) -> f64 {
        match self {
            GeoModel::Uem1 => model.dissimilarity(k, i, j, cond),
            GeoModel::Uem2(Uem2Variant::DeviationIntegral) => model.deviation_integral(k, i, j, cond),
            GeoModel::Uem2(Uem2Variant::GraphicCenter) => model.graphic_center(k, i, j, cond),
            GeoModel::Gsm => model.yeta(k, i, j, cond),
        }
    }

    /// α_{k→i,(ij)}: share of k attributed to i in the binary i–j.
    pub fn weight(
        self,
        model: &PairInteractionModel,
        k: &Element,
        i: &Element,
        j: &Element,
        cond: &Conditions,
    ) -> f64 {
        let d_ki = self.distance(model, k, i, j, cond);
        let d_kj = self.distance(model, k, j, i, cond);
        split_share(d_ki, d_kj)
    }

    /// (α_{k→i,(ij)}, α_{k→j,(ij)}) normalized to sum to one.
    ///
    /// Falls back to (½, ½) when both raw weights vanish.
    pub fn shares(
        self,
        model: &PairInteractionModel,
        k: &Element,
        i: &Element,
        j: &Element,
        cond: &Conditions,
    ) -> (f64, f64) {
        let to_i = self.weight(model, k, i, j, cond);
        let to_j = self.weight(model, k, j, i, cond);
        let sum = to_i + to_j;
        if sum == 0.0 {
            (0.5, 0.5)
        } else {
            (to_i / sum, to_j / sum)
        }
    }
}

impl fmt::Display for GeoModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for GeoModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uem1" => Ok(GeoModel::Uem1),
            "uem2" | "uem2-di" | "uem2_adv" => Ok(GeoModel::Uem2(Uem2Variant::DeviationIntegral)),
            "uem2-gc" | "uem2-center" => Ok(GeoModel::Uem2(Uem2Variant::GraphicCenter)),
            "gsm" => Ok(GeoModel::Gsm),
            other => Err(format!("unknown geometric model '{other}'")),
        }
    }
}

/// Share towards i given the distances of k to i and to j.
///
/// Two exactly zero distances get the same tiny perturbation, which yields ½.
pub fn split_share(d_ki: f64, d_kj: f64) -> f64 {
    let (d_ki, d_kj) = if d_ki == 0.0 && d_kj == 0.0 {
        (SPLIT_EPS, SPLIT_EPS)
    } else {
        (d_ki, d_kj)
    };
    d_kj / (d_ki + d_kj)
}

/// UEM1 weight α_{k→i,(ij)}.
pub fn geo_weight1(model: &PairInteractionModel, k: &Element, i: &Element, j: &Element, cond: &Conditions) -> f64 {
    GeoModel::Uem1.weight(model, k, i, j, cond)
}

/// UEM2 weight α_{k→i,(ij)} for the chosen distance measure.
pub fn geo_weight2(
    model: &PairInteractionModel,
    k: &Element,
    i: &Element,
    j: &Element,
    variant: Uem2Variant,
    cond: &Conditions,
) -> f64 {
    GeoModel::Uem2(variant).weight(model, k, i, j, cond)
}

/// GSM weight α_{k→i,(ij)}.
pub fn geo_weight_gsm(model: &PairInteractionModel, k: &Element, i: &Element, j: &Element, cond: &Conditions) -> f64 {
    GeoModel::Gsm.weight(model, k, i, j, cond)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mc_elements::{BuiltinElements, ElementStore};

    fn el(s: &str) -> Element {
        BuiltinElements.element(s)
    }

    #[test]
    fn split_of_two_zero_distances_is_half() {
        assert_eq!(split_share(0.0, 0.0), 0.5);
    }

    #[test]
    fn split_favours_the_closer_end() {
        assert_eq!(split_share(0.0, 3.0), 1.0);
        assert_eq!(split_share(3.0, 0.0), 0.0);
        assert!((split_share(1.0, 3.0) - 0.75).abs() < 1e-15);
        assert!(split_share(f64::NAN, 1.0).is_nan());
    }

    #[test]
    fn identical_third_element_gives_half() {
        // k equal to neither end but behaving identically towards both.
        let model = PairInteractionModel::default();
        let cond = Conditions::liquid(1873.0);
        let fe = el("Fe");
        let w = geo_weight1(&model, &fe, &fe, &fe, &cond);
        assert_eq!(w, 0.5);
    }

    #[test]
    fn self_weight_is_one() {
        let model = PairInteractionModel::default();
        let cond = Conditions::liquid(1873.0);
        let (si, fe) = (el("Si"), el("Fe"));
        for geo in GeoModel::ALL {
            let w = geo.weight(&model, &si, &si, &fe, &cond);
            assert!((w - 1.0).abs() < 1e-12, "{geo}: {w}");
        }
    }

    #[test]
    fn shares_sum_to_one() {
        let model = PairInteractionModel::default();
        let cond = Conditions::liquid(1873.0);
        for geo in GeoModel::ALL {
            let (a, b) = geo.shares(&model, &el("C"), &el("Si"), &el("Mn"), &cond);
            assert!((a + b - 1.0).abs() < 1e-12, "{geo}");
            assert!((0.0..=1.0).contains(&a));
        }
    }

    #[test]
    fn parse_and_display_round_trip() {
        for geo in GeoModel::ALL {
            assert_eq!(geo.key().parse::<GeoModel>(), Ok(geo));
        }
        assert!("uem3".parse::<GeoModel>().is_err());
    }
}
