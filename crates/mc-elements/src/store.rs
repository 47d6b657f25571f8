//! Element parameter stores.
//!
//! The modeling core only needs a synchronous `lookup(symbol)`; where the data
//! comes from is up to the store. `BuiltinElements` carries a representative
//! table of Miedema parameters for common alloying elements, `ElementTable`
//! layers YAML files on top of it.

use crate::element::{Element, ElementData, HybridClass};
use crate::error::{ElementError, ElementResult};
use std::collections::HashMap;
use std::path::Path;

/// Keyed lookup of element constants.
///
/// Implementations must be thread-safe (Send + Sync) so that formalisms can
/// be evaluated in parallel.
pub trait ElementStore: Send + Sync {
    /// Constants for `symbol`, or `None` when the store does not know it.
    fn lookup(&self, symbol: &str) -> Option<ElementData>;

    /// Element handle; unknown symbols yield a non-existent element.
    fn element(&self, symbol: &str) -> Element {
        let data = if is_periodic_symbol(symbol) {
            self.lookup(symbol)
        } else {
            None
        };
        if data.is_none() {
            tracing::debug!(symbol, "no element data");
        }
        Element::new(symbol, data)
    }
}

const PERIODIC_TABLE: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
    "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
    "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
    "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh",
    "Fl", "Mc", "Lv", "Ts", "Og",
];

/// True if `symbol` names an element of the periodic table.
pub fn is_periodic_symbol(symbol: &str) -> bool {
    PERIODIC_TABLE.contains(&symbol)
}

#[derive(Debug, Clone, Copy)]
struct BuiltinRow {
    symbol: &'static str,
    phi: f64,
    nws13: f64,
    v23: f64,
    u: f64,
    mass: f64,
    dh_trans: f64,
    hybrid: HybridClass,
    hybrid_value: f64,
    tm: f64,
    tb: f64,
    transition: bool,
    moduli: Option<(f64, f64)>,
}

#[allow(clippy::too_many_arguments)]
const fn row(
    symbol: &'static str,
    miedema: (f64, f64, f64, f64),
    mass: f64,
    dh_trans: f64,
    hybrid: HybridClass,
    hybrid_value: f64,
    points: (f64, f64),
    transition: bool,
    moduli: Option<(f64, f64)>,
) -> BuiltinRow {
    let (phi, nws13, v23, u) = miedema;
    let (tm, tb) = points;
    BuiltinRow {
        symbol,
        phi,
        nws13,
        v23,
        u,
        mass,
        dh_trans,
        hybrid,
        hybrid_value,
        tm,
        tb,
        transition,
        moduli,
    }
}

use HybridClass::{Other, PElement, Transition};

// (Φ*, n_ws^1/3, V^2/3, a), M, ΔH_trans, hybrid, R/P, (Tm, Tb), TM?, (K, G)
#[rustfmt::skip]
const BUILTIN: [BuiltinRow; 33] = [
    row("Fe", (4.93, 1.77, 3.69, 0.04), 55.845, 0.0, Transition, 1.0, (1811.0, 3134.0), true, Some((170.0, 82.0))),
    row("Ni", (5.20, 1.75, 3.52, 0.04), 58.693, 0.0, Transition, 1.0, (1728.0, 3186.0), true, Some((180.0, 76.0))),
    row("Co", (5.10, 1.75, 3.55, 0.04), 58.933, 0.0, Transition, 1.0, (1768.0, 3200.0), true, Some((180.0, 75.0))),
    row("Cr", (4.65, 1.73, 3.74, 0.04), 51.996, 0.0, Transition, 1.0, (2180.0, 2944.0), true, Some((160.0, 115.0))),
    row("Mn", (4.45, 1.61, 3.78, 0.04), 54.938, 0.0, Transition, 1.0, (1519.0, 2334.0), true, Some((120.0, 80.0))),
    row("Cu", (4.45, 1.47, 3.70, 0.04), 63.546, 0.0, Transition, 0.3, (1358.0, 2835.0), true, Some((140.0, 48.0))),
    row("Ti", (3.80, 1.52, 4.82, 0.04), 47.867, 0.0, Transition, 1.0, (1941.0, 3560.0), true, Some((110.0, 44.0))),
    row("V", (4.25, 1.64, 4.12, 0.04), 50.942, 0.0, Transition, 1.0, (2183.0, 3680.0), true, Some((160.0, 47.0))),
    row("Mo", (4.65, 1.77, 4.45, 0.04), 95.95, 0.0, Transition, 1.0, (2896.0, 4912.0), true, Some((230.0, 126.0))),
    row("W", (4.80, 1.81, 4.50, 0.04), 183.84, 0.0, Transition, 1.0, (3695.0, 5828.0), true, Some((310.0, 161.0))),
    row("Nb", (4.05, 1.64, 4.89, 0.04), 92.906, 0.0, Transition, 1.0, (2750.0, 5017.0), true, Some((170.0, 38.0))),
    row("Ta", (4.05, 1.63, 4.89, 0.04), 180.95, 0.0, Transition, 1.0, (3290.0, 5731.0), true, Some((200.0, 69.0))),
    row("Zr", (3.40, 1.39, 5.81, 0.04), 91.224, 0.0, Transition, 1.0, (2128.0, 4682.0), true, Some((91.1, 33.0))),
    row("Hf", (3.55, 1.45, 5.65, 0.04), 178.49, 0.0, Transition, 1.0, (2506.0, 4876.0), true, Some((110.0, 30.0))),
    row("Pd", (5.45, 1.67, 4.30, 0.04), 106.42, 0.0, Transition, 1.0, (1828.0, 3236.0), true, Some((180.0, 44.0))),
    row("Pt", (5.65, 1.78, 4.36, 0.04), 195.08, 0.0, Transition, 1.0, (2041.0, 4098.0), true, Some((230.0, 61.0))),
    row("Ag", (4.35, 1.36, 4.72, 0.04), 107.87, 0.0, Transition, 0.15, (1235.0, 2435.0), true, Some((100.0, 30.0))),
    row("Au", (5.15, 1.57, 4.70, 0.04), 196.97, 0.0, Transition, 0.15, (1337.0, 3129.0), true, Some((180.0, 27.0))),
    row("Al", (4.20, 1.39, 4.64, 0.07), 26.982, 0.0, PElement, 1.9, (933.0, 2743.0), false, Some((76.0, 26.0))),
    row("Si", (4.70, 1.50, 4.20, 0.04), 28.086, 34.0, PElement, 2.1, (1687.0, 3538.0), false, Some((98.0, 51.0))),
    row("Ge", (4.55, 1.37, 4.60, 0.07), 72.63, 25.0, PElement, 2.3, (1211.0, 3106.0), false, Some((75.0, 41.0))),
    row("Sn", (4.15, 1.24, 6.43, 0.07), 118.71, 5.1, PElement, 2.8, (505.0, 2875.0), false, Some((58.0, 18.0))),
    row("Pb", (4.10, 1.15, 6.94, 0.07), 207.2, 0.0, PElement, 2.8, (601.0, 2022.0), false, Some((46.0, 5.6))),
    row("Zn", (4.10, 1.32, 4.38, 0.10), 65.38, 0.0, PElement, 1.4, (693.0, 1180.0), false, Some((70.0, 43.0))),
    row("Mg", (3.45, 1.17, 5.81, 0.10), 24.305, 0.0, Other, 0.4, (923.0, 1363.0), false, Some((45.0, 17.0))),
    row("Ca", (2.55, 0.91, 8.84, 0.07), 40.078, 0.0, Other, 0.0, (1115.0, 1757.0), false, Some((17.0, 7.4))),
    row("C", (6.20, 1.90, 1.80, 0.04), 12.011, 180.0, PElement, 2.1, (3823.0, 4098.0), false, None),
    row("N", (7.00, 1.60, 2.20, 0.04), 14.007, 310.0, PElement, 2.3, (63.0, 77.0), false, None),
    row("O", (6.97, 1.70, 2.65, 0.04), 15.999, 264.0, PElement, 2.3, (54.0, 90.0), false, None),
    row("H", (5.20, 1.50, 1.70, 0.07), 1.008, 100.0, PElement, 1.0, (14.0, 20.0), false, None),
    row("B", (5.30, 1.75, 2.80, 0.07), 10.81, 30.0, PElement, 1.9, (2349.0, 4200.0), false, None),
    row("P", (5.55, 1.65, 4.10, 0.07), 30.974, 17.0, PElement, 2.3, (317.0, 554.0), false, None),
    row("S", (5.60, 1.46, 4.38, 0.07), 32.06, 25.0, PElement, 2.3, (388.0, 718.0), false, None),
];

impl BuiltinRow {
    fn to_data(self) -> ElementData {
        ElementData {
            symbol: self.symbol.to_string(),
            phi: self.phi,
            nws13: self.nws13,
            v23: self.v23,
            u: self.u,
            mass: self.mass,
            dh_trans: self.dh_trans,
            hybrid: self.hybrid,
            hybrid_value: self.hybrid_value,
            tm: self.tm,
            tb: self.tb,
            transition: self.transition,
            bulk_modulus: self.moduli.map(|(k, _)| k),
            shear_modulus: self.moduli.map(|(_, g)| g),
        }
    }
}

/// Built-in representative parameter table.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinElements;

impl BuiltinElements {
    /// Symbols the built-in table covers.
    pub fn symbols() -> impl Iterator<Item = &'static str> {
        BUILTIN.iter().map(|r| r.symbol)
    }
}

impl ElementStore for BuiltinElements {
    fn lookup(&self, symbol: &str) -> Option<ElementData> {
        BUILTIN
            .iter()
            .find(|r| r.symbol == symbol)
            .map(|r| r.to_data())
    }
}

/// In-memory element table, typically loaded from YAML.
///
/// ```yaml
/// elements:
///   - symbol: Fe
///     phi: 4.93
///     nws13: 1.77
///     ...
/// ```
#[derive(Debug, Clone, Default)]
pub struct ElementTable {
    entries: HashMap<String, ElementData>,
}

#[derive(serde::Deserialize)]
struct ElementFile {
    elements: Vec<ElementData>,
}

impl ElementTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table seeded with the built-in parameters.
    pub fn with_builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|r| (r.symbol.to_string(), r.to_data()))
            .collect();
        Self { entries }
    }

    /// Insert or replace one entry.
    pub fn insert(&mut self, data: ElementData) {
        self.entries.insert(data.symbol.clone(), data);
    }

    /// Merge entries from a YAML document; later entries replace earlier ones.
    pub fn merge_yaml_str(&mut self, yaml: &str) -> ElementResult<usize> {
        let file: ElementFile = serde_yaml::from_str(yaml).map_err(|e| ElementError::Table {
            message: format!("YAML decode failed: {e}"),
        })?;
        let count = file.elements.len();
        for data in file.elements {
            if !is_periodic_symbol(&data.symbol) {
                return Err(ElementError::Table {
                    message: format!("'{}' is not an element symbol", data.symbol),
                });
            }
            self.insert(data);
        }
        tracing::debug!(count, "merged element entries");
        Ok(count)
    }

    /// Merge entries from a YAML file.
    pub fn merge_yaml_file(&mut self, path: &Path) -> ElementResult<usize> {
        let text = std::fs::read_to_string(path).map_err(|e| ElementError::Table {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        self.merge_yaml_str(&text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ElementStore for ElementTable {
    fn lookup(&self, symbol: &str) -> Option<ElementData> {
        self.entries.get(symbol).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_symbols_are_periodic() {
        for symbol in BuiltinElements::symbols() {
            assert!(is_periodic_symbol(symbol), "{symbol}");
        }
    }

    #[test]
    fn builtin_lookup() {
        let fe = BuiltinElements.element("Fe");
        assert!(fe.exists());
        assert!(fe.is_transition());
        let si = BuiltinElements.element("Si");
        assert_eq!(si.dh_trans(), 34.0);
        assert_eq!(si.hybrid_class(), HybridClass::PElement);
    }

    #[test]
    fn unknown_symbols_do_not_exist() {
        assert!(!BuiltinElements.element("Xx").exists());
        // periodic but not tabulated
        assert!(!BuiltinElements.element("Og").exists());
    }

    #[test]
    fn yaml_override_replaces_entry() {
        let mut table = ElementTable::with_builtin();
        let n = table
            .merge_yaml_str(
                r#"
elements:
  - symbol: Fe
    phi: 5.0
    nws13: 1.77
    v23: 3.69
    u: 0.04
    mass: 55.845
    hybrid: transition
    hybrid_value: 1.0
    tm: 1811.0
    tb: 3134.0
    transition: true
"#,
            )
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(table.element("Fe").phi(), 5.0);
        assert!(table.element("Fe").bulk_modulus().is_nan());
        assert!(table.element("Ni").exists());
    }

    #[test]
    fn yaml_rejects_non_element() {
        let mut table = ElementTable::new();
        let err = table
            .merge_yaml_str(
                r#"
elements:
  - symbol: Qq
    phi: 5.0
    nws13: 1.77
    v23: 3.69
    u: 0.04
    mass: 1.0
    hybrid: other
    tm: 1.0
    tb: 2.0
    transition: false
"#,
            )
            .unwrap_err();
        assert!(matches!(err, ElementError::Table { .. }));
    }
}
