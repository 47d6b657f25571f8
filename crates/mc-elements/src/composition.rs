//! Alloy compositions (normalized mole fractions).

use crate::error::{ElementError, ElementResult};
use mc_core::numeric::{Tolerances, nearly_equal};

/// Alloy composition defined by normalized mole fractions.
///
/// The composition is always normalized (mole fractions sum to 1.0). Element
/// order follows first appearance in the source formula and carries no
/// meaning.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    /// Element symbols and their mole fractions (always normalized to sum=1).
    items: Vec<(String, f64)>,
}

impl Composition {
    /// Create a pure-element composition.
    pub fn pure(symbol: impl Into<String>) -> Self {
        Self {
            items: vec![(symbol.into(), 1.0)],
        }
    }

    /// Create a composition from (possibly unnormalized) amounts.
    ///
    /// Repeated symbols are summed. Validates that all amounts are finite,
    /// non-negative, and have a positive sum, then normalizes to sum=1.
    pub fn new_mole_fractions(fractions: Vec<(String, f64)>) -> ElementResult<Self> {
        if fractions.is_empty() {
            return Err(ElementError::InvalidArg {
                what: "empty composition".into(),
            });
        }

        let mut merged: Vec<(String, f64)> = Vec::with_capacity(fractions.len());
        let mut sum = 0.0;
        for (symbol, frac) in fractions {
            if !frac.is_finite() {
                return Err(ElementError::NonPhysical {
                    what: "non-finite mole fraction",
                });
            }
            if frac < 0.0 {
                return Err(ElementError::NonPhysical {
                    what: "negative mole fraction",
                });
            }
            sum += frac;
            match merged.iter_mut().find(|(s, _)| *s == symbol) {
                Some((_, f)) => *f += frac,
                None => merged.push((symbol, frac)),
            }
        }

        if sum <= 0.0 || !sum.is_finite() {
            return Err(ElementError::NonPhysical {
                what: "mole fractions sum to zero or non-finite",
            });
        }

        // Normalize
        let normalized: Vec<(String, f64)> = merged
            .into_iter()
            .map(|(s, f)| (s, f / sum))
            .filter(|(_, f)| *f > 1e-15) // Drop negligible elements
            .collect();

        if normalized.is_empty() {
            return Err(ElementError::NonPhysical {
                what: "all mole fractions negligible",
            });
        }

        Ok(Self { items: normalized })
    }

    /// Parse an alloy formula such as `Fe2Ni1` or `Fe Mn0.1 Si0.02`.
    pub fn parse(formula: &str) -> ElementResult<Self> {
        Self::new_mole_fractions(parse_formula(formula)?)
    }

    /// Parse a solute formula prefixed by the solvent, e.g. `("Fe", "Mn0.1Si0.02")`.
    ///
    /// The solvent gets the implicit coefficient 1 unless `solutes` names it
    /// again, in which case the amounts are summed.
    pub fn with_solvent(solvent: &str, solutes: &str) -> ElementResult<Self> {
        let mut amounts = parse_formula(solvent)?;
        if amounts.len() != 1 {
            return Err(ElementError::InvalidArg {
                what: format!("solvent '{solvent}' must be a single element"),
            });
        }
        if !solutes.trim().is_empty() {
            amounts.extend(parse_formula(solutes)?);
        }
        Self::new_mole_fractions(amounts)
    }

    /// Mole fraction of an element (0.0 if not present).
    pub fn mole_fraction(&self, symbol: &str) -> f64 {
        self.items
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, f)| *f)
            .unwrap_or(0.0)
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.items.iter().any(|(s, _)| s == symbol)
    }

    /// Check if this is a pure-element composition.
    ///
    /// Returns `Some(symbol)` if exactly one element has fraction ≈1.0.
    pub fn is_pure(&self) -> Option<&str> {
        if self.items.len() == 1 {
            let (symbol, frac) = &self.items[0];
            let tol = Tolerances {
                abs: 1e-10,
                rel: 1e-10,
            };
            if nearly_equal(*frac, 1.0, tol) {
                return Some(symbol.as_str());
            }
        }
        None
    }

    /// Iterate over all elements with non-zero mole fractions.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.items.iter().map(|(s, f)| (s.as_str(), *f))
    }

    /// Elements other than `solvent`.
    pub fn solutes<'a>(&'a self, solvent: &'a str) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        self.iter().filter(move |(s, _)| *s != solvent)
    }

    pub fn symbols(&self) -> Vec<&str> {
        self.items.iter().map(|(s, _)| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Mean molar mass [g/mol] given a per-element mass lookup.
    pub fn molar_mass(&self, mass_of: impl Fn(&str) -> f64) -> f64 {
        self.items.iter().map(|(s, x)| mass_of(s) * x).sum()
    }
}

/// Split a formula into (element, coefficient) pairs.
///
/// Grammar: `(Element)(coefficient)?` repeated, where an element is one
/// uppercase letter optionally followed by one lowercase letter and a missing
/// coefficient means 1. Whitespace between tokens is ignored. Repeated
/// elements are summed in order of first appearance.
pub fn parse_formula(formula: &str) -> ElementResult<Vec<(String, f64)>> {
    let err = |what: String| ElementError::Formula {
        formula: formula.to_string(),
        what,
    };

    let chars: Vec<char> = formula.chars().collect();
    let mut out: Vec<(String, f64)> = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if !c.is_ascii_uppercase() {
            return Err(err(format!("expected element symbol at position {i}, found '{c}'")));
        }
        let mut symbol = c.to_string();
        i += 1;
        if i < chars.len() && chars[i].is_ascii_lowercase() {
            symbol.push(chars[i]);
            i += 1;
        }

        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        let start = i;
        while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
            i += 1;
        }
        let coefficient = if start == i {
            1.0
        } else {
            let text: String = chars[start..i].iter().collect();
            text.parse::<f64>()
                .map_err(|_| err(format!("bad coefficient '{text}' for {symbol}")))?
        };

        match out.iter_mut().find(|(s, _)| *s == symbol) {
            Some((_, total)) => *total += coefficient,
            None => out.push((symbol, coefficient)),
        }
    }

    if out.is_empty() {
        return Err(err("no elements".into()));
    }
    Ok(out)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn normalized_sum_is_one(amounts in prop::collection::vec(0.001_f64..10.0_f64, 1..6)) {
            let symbols = ["Fe", "Ni", "Cr", "Mn", "Si", "C"];
            let formula: String = amounts
                .iter()
                .enumerate()
                .map(|(i, a)| format!("{}{:.4}", symbols[i % symbols.len()], a))
                .collect();

            if let Ok(comp) = Composition::parse(&formula) {
                let sum: f64 = comp.iter().map(|(_, f)| f).sum();
                let tol = Tolerances { abs: 1e-9, rel: 1e-9 };
                prop_assert!(nearly_equal(sum, 1.0, tol));
            }
        }
    }
}
