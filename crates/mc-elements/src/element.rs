//! Element handles and their physical constants.

use serde::{Deserialize, Serialize};

/// Hybridization class entering the Miedema R/P correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HybridClass {
    /// d-band transition and noble metals
    Transition,
    /// Polyvalent non-transition (p-electron) elements
    PElement,
    /// No hybridization contribution (alkali, alkaline earth, ...)
    Other,
}

/// Physical constants of one element.
///
/// Units follow the Miedema tables:
/// - `phi` work function Φ* [V]
/// - `nws13` electron density at the Wigner-Seitz cell boundary, n_ws^(1/3) [d.u.^(1/3)]
/// - `v23` molar volume to the power 2/3 [cm²]
/// - `dh_trans` allotropic/metallization transition enthalpy [kJ/mol]
/// - `bulk_modulus`, `shear_modulus` [GPa]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementData {
    pub symbol: String,
    pub phi: f64,
    pub nws13: f64,
    pub v23: f64,
    /// Volume-interaction sensitivity (Miedema `a`)
    pub u: f64,
    /// Molar mass [g/mol]
    pub mass: f64,
    #[serde(default)]
    pub dh_trans: f64,
    pub hybrid: HybridClass,
    /// Hybridization magnitude (R/P of the element)
    #[serde(default)]
    pub hybrid_value: f64,
    /// Melting point [K]
    pub tm: f64,
    /// Boiling point [K]
    pub tb: f64,
    pub transition: bool,
    #[serde(default)]
    pub bulk_modulus: Option<f64>,
    #[serde(default)]
    pub shear_modulus: Option<f64>,
}

/// An element symbol together with its constants, if the store knows it.
///
/// Every accessor returns NaN for an unknown element so that downstream
/// formulas degrade to NaN instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    symbol: String,
    data: Option<ElementData>,
}

impl Element {
    pub fn new(symbol: impl Into<String>, data: Option<ElementData>) -> Self {
        Self {
            symbol: symbol.into(),
            data,
        }
    }

    /// A symbol with no data attached.
    pub fn missing(symbol: impl Into<String>) -> Self {
        Self::new(symbol, None)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn exists(&self) -> bool {
        self.data.is_some()
    }

    pub fn data(&self) -> Option<&ElementData> {
        self.data.as_ref()
    }

    fn field(&self, f: impl Fn(&ElementData) -> f64) -> f64 {
        self.data.as_ref().map(f).unwrap_or(f64::NAN)
    }

    pub fn phi(&self) -> f64 {
        self.field(|d| d.phi)
    }

    pub fn nws13(&self) -> f64 {
        self.field(|d| d.nws13)
    }

    pub fn v23(&self) -> f64 {
        self.field(|d| d.v23)
    }

    /// Molar volume [cm³/mol].
    pub fn molar_volume(&self) -> f64 {
        self.field(|d| d.v23.powf(1.5))
    }

    pub fn u(&self) -> f64 {
        self.field(|d| d.u)
    }

    pub fn mass(&self) -> f64 {
        self.field(|d| d.mass)
    }

    pub fn dh_trans(&self) -> f64 {
        self.field(|d| d.dh_trans)
    }

    pub fn hybrid_class(&self) -> HybridClass {
        self.data
            .as_ref()
            .map(|d| d.hybrid)
            .unwrap_or(HybridClass::Other)
    }

    pub fn hybrid_value(&self) -> f64 {
        self.field(|d| d.hybrid_value)
    }

    pub fn tm(&self) -> f64 {
        self.field(|d| d.tm)
    }

    pub fn tb(&self) -> f64 {
        self.field(|d| d.tb)
    }

    pub fn is_transition(&self) -> bool {
        self.data.as_ref().is_some_and(|d| d.transition)
    }

    pub fn bulk_modulus(&self) -> f64 {
        self.field(|d| d.bulk_modulus.unwrap_or(f64::NAN))
    }

    pub fn shear_modulus(&self) -> f64 {
        self.field(|d| d.shear_modulus.unwrap_or(f64::NAN))
    }

    pub fn is_hydrogen(&self) -> bool {
        self.symbol == "H"
    }

    /// Si and Ge lose their metallization enthalpy in the melt.
    pub fn is_semimetal_without_liquid_transition(&self) -> bool {
        matches!(self.symbol.as_str(), "Si" | "Ge")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iron() -> ElementData {
        ElementData {
            symbol: "Fe".into(),
            phi: 4.93,
            nws13: 1.77,
            v23: 3.69,
            u: 0.04,
            mass: 55.845,
            dh_trans: 0.0,
            hybrid: HybridClass::Transition,
            hybrid_value: 1.0,
            tm: 1811.0,
            tb: 3134.0,
            transition: true,
            bulk_modulus: Some(170.0),
            shear_modulus: Some(82.0),
        }
    }

    #[test]
    fn known_element_exposes_fields() {
        let fe = Element::new("Fe", Some(iron()));
        assert!(fe.exists());
        assert_eq!(fe.phi(), 4.93);
        assert!(fe.is_transition());
        assert!((fe.molar_volume() - 3.69_f64.powf(1.5)).abs() < 1e-12);
    }

    #[test]
    fn missing_element_is_nan() {
        let x = Element::missing("Xx");
        assert!(!x.exists());
        assert!(x.phi().is_nan());
        assert!(x.nws13().is_nan());
        assert!(x.tm().is_nan());
        assert!(!x.is_transition());
        assert_eq!(x.hybrid_class(), HybridClass::Other);
    }

    #[test]
    fn absent_moduli_are_nan() {
        let mut data = iron();
        data.bulk_modulus = None;
        let fe = Element::new("Fe", Some(data));
        assert!(fe.bulk_modulus().is_nan());
        assert_eq!(fe.shear_modulus(), 82.0);
    }
}
