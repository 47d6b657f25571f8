//! Literature interaction coefficients.
//!
//! A reference table holds first-order interaction coefficients keyed by
//! (solvent, i, j) and infinite-dilution activity coefficients keyed by
//! (solvent, solute). Values are `a/T + b` expressions; a temperature field
//! of `T` means the value holds at any temperature, a number means it only
//! holds within 0.5 K of that temperature.
//!
//! ```yaml
//! interactions:
//!   - { solvent: Fe, i: C, j: Si, value: 0.08, basis: mass, temperature: 1873 }
//!   - { solvent: Fe, i: Si, j: Si, value: "-5800/T + 3.2", temperature: T }
//! dilution:
//!   - { solvent: Fe, solute: Si, value: 0.0013, kind: gamma }
//! ```

use crate::error::{ActivityError, ActivityResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Half-width of the temperature window of a fixed-temperature entry [K].
pub const TEMPERATURE_MATCH_K: f64 = 0.5;

/// `a/T + b`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoefficientExpr {
    pub per_t: f64,
    pub constant: f64,
}

impl CoefficientExpr {
    pub fn constant(b: f64) -> Self {
        Self {
            per_t: 0.0,
            constant: b,
        }
    }

    /// Parse `b`, `a/T`, `a/T+b`, `b-a/T` and similar sums of terms.
    pub fn parse(text: &str) -> ActivityResult<Self> {
        let err = |what: &str| ActivityError::Expression {
            text: text.to_string(),
            what: what.to_string(),
        };
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(err("empty expression"));
        }

        let mut expr = Self::default();
        for term in split_terms(&compact) {
            let upper = term.to_ascii_uppercase();
            if let Some(coeff) = upper.strip_suffix("/T") {
                let a = parse_number(coeff).ok_or_else(|| err("bad 1/T coefficient"))?;
                expr.per_t += a;
            } else {
                let b = parse_number(&upper).ok_or_else(|| err("bad constant term"))?;
                expr.constant += b;
            }
        }
        Ok(expr)
    }

    pub fn eval(&self, t_k: f64) -> f64 {
        if self.per_t == 0.0 {
            self.constant
        } else {
            self.per_t / t_k + self.constant
        }
    }
}

impl fmt::Display for CoefficientExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.per_t == 0.0 {
            write!(f, "{}", self.constant)
        } else {
            write!(f, "{}/T{:+}", self.per_t, self.constant)
        }
    }
}

/// Split at `+`/`-` that start a new term, keeping the sign with the term.
/// Signs following an exponent marker belong to the number.
fn split_terms(s: &str) -> Vec<&str> {
    let bytes = s.as_bytes();
    let mut terms = Vec::new();
    let mut start = 0;
    for (idx, &c) in bytes.iter().enumerate() {
        if idx > start && (c == b'+' || c == b'-') {
            let prev = bytes[idx - 1];
            if prev == b'e' || prev == b'E' || prev == b'/' {
                continue;
            }
            terms.push(&s[start..idx]);
            start = idx;
        }
    }
    terms.push(&s[start..]);
    terms
}

fn parse_number(s: &str) -> Option<f64> {
    match s {
        "" | "+" => Some(1.0),
        "-" => Some(-1.0),
        _ => s.parse::<f64>().ok().filter(|v| v.is_finite()),
    }
}

/// Temperature a reference value applies at.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RefTemperature {
    #[default]
    Any,
    At(f64),
}

impl RefTemperature {
    pub fn matches(self, t_k: f64) -> bool {
        match self {
            RefTemperature::Any => true,
            RefTemperature::At(t) => (t - t_k).abs() <= TEMPERATURE_MATCH_K,
        }
    }
}

/// Composition basis of a stored interaction coefficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Basis {
    /// ε, natural log and mole fractions
    #[default]
    Mole,
    /// e, log10 and weight percent
    Mass,
}

/// How an infinite-dilution value is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DilutionKind {
    #[default]
    LnGamma,
    Gamma,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InteractionRef {
    pub solvent: String,
    pub i: String,
    pub j: String,
    pub value: CoefficientExpr,
    pub basis: Basis,
    pub temperature: RefTemperature,
}

impl InteractionRef {
    /// Mole-fraction ε_i^j at `t_k`.
    ///
    /// Mass-basis values are converted with
    /// `ε = 230 (M_j/M_1) e + (M_1 − M_j)/M_1`.
    pub fn epsilon(&self, t_k: f64, mass_of: &impl Fn(&str) -> f64) -> f64 {
        let raw = self.value.eval(t_k);
        match self.basis {
            Basis::Mole => raw,
            Basis::Mass => {
                let m1 = mass_of(&self.solvent);
                let mj = mass_of(&self.j);
                230.0 * (mj / m1) * raw + (m1 - mj) / m1
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DilutionRef {
    pub solvent: String,
    pub solute: String,
    pub value: CoefficientExpr,
    pub kind: DilutionKind,
    pub temperature: RefTemperature,
}

impl DilutionRef {
    pub fn ln_gamma(&self, t_k: f64) -> f64 {
        let raw = self.value.eval(t_k);
        match self.kind {
            DilutionKind::LnGamma => raw,
            DilutionKind::Gamma => raw.ln(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Number(f64),
    Text(String),
}

impl RawScalar {
    fn expr(&self) -> ActivityResult<CoefficientExpr> {
        match self {
            RawScalar::Number(v) => Ok(CoefficientExpr::constant(*v)),
            RawScalar::Text(s) => CoefficientExpr::parse(s),
        }
    }

    fn temperature(&self) -> ActivityResult<RefTemperature> {
        match self {
            RawScalar::Number(v) => Ok(RefTemperature::At(*v)),
            RawScalar::Text(s) if s.trim().eq_ignore_ascii_case("t") => Ok(RefTemperature::Any),
            RawScalar::Text(s) => s.trim().parse::<f64>().map(RefTemperature::At).map_err(|_| {
                ActivityError::Table {
                    message: format!("bad temperature '{s}'"),
                }
            }),
        }
    }
}

fn temperature_of(raw: &Option<RawScalar>) -> ActivityResult<RefTemperature> {
    raw.as_ref()
        .map_or(Ok(RefTemperature::Any), RawScalar::temperature)
}

#[derive(Deserialize)]
struct RawInteraction {
    solvent: String,
    i: String,
    j: String,
    value: RawScalar,
    #[serde(default)]
    basis: Basis,
    temperature: Option<RawScalar>,
}

#[derive(Deserialize)]
struct RawDilution {
    solvent: String,
    solute: String,
    value: RawScalar,
    #[serde(default)]
    kind: DilutionKind,
    temperature: Option<RawScalar>,
}

#[derive(Deserialize)]
struct ReferenceFile {
    #[serde(default)]
    interactions: Vec<RawInteraction>,
    #[serde(default)]
    dilution: Vec<RawDilution>,
}

/// Literature coefficients with reverse-key lookup.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    interactions: Vec<InteractionRef>,
    dilutions: Vec<DilutionRef>,
}

impl ReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_yaml_str(yaml: &str) -> ActivityResult<Self> {
        let file: ReferenceFile = serde_yaml::from_str(yaml).map_err(|e| ActivityError::Table {
            message: format!("YAML decode failed: {e}"),
        })?;

        let mut table = Self::new();
        for raw in file.interactions {
            table.add_interaction(InteractionRef {
                value: raw.value.expr()?,
                temperature: temperature_of(&raw.temperature)?,
                solvent: raw.solvent,
                i: raw.i,
                j: raw.j,
                basis: raw.basis,
            });
        }
        for raw in file.dilution {
            table.add_dilution(DilutionRef {
                value: raw.value.expr()?,
                temperature: temperature_of(&raw.temperature)?,
                solvent: raw.solvent,
                solute: raw.solute,
                kind: raw.kind,
            });
        }
        tracing::debug!(
            interactions = table.interactions.len(),
            dilution = table.dilutions.len(),
            "loaded reference table"
        );
        Ok(table)
    }

    pub fn from_yaml_file(path: &Path) -> ActivityResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| ActivityError::Table {
            message: format!("cannot read {}: {e}", path.display()),
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn add_interaction(&mut self, entry: InteractionRef) {
        self.interactions.push(entry);
    }

    pub fn add_dilution(&mut self, entry: DilutionRef) {
        self.dilutions.push(entry);
    }

    pub fn len(&self) -> usize {
        self.interactions.len() + self.dilutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn find_interaction(&self, solvent: &str, i: &str, j: &str, t_k: f64) -> Option<&InteractionRef> {
        self.interactions
            .iter()
            .find(|e| e.solvent == solvent && e.i == i && e.j == j && e.temperature.matches(t_k))
    }

    /// Mole-fraction ε_i^j in `solvent` at `t_k`.
    ///
    /// Falls back to the reverse key (solvent, j, i) through ε_i^j = ε_j^i.
    pub fn interaction(
        &self,
        solvent: &str,
        i: &str,
        j: &str,
        t_k: f64,
        mass_of: impl Fn(&str) -> f64,
    ) -> Option<f64> {
        self.find_interaction(solvent, i, j, t_k)
            .or_else(|| self.find_interaction(solvent, j, i, t_k))
            .map(|e| e.epsilon(t_k, &mass_of))
    }

    /// ln γ° of `solute` in `solvent` at `t_k`.
    pub fn ln_gamma_infinite(&self, solvent: &str, solute: &str, t_k: f64) -> Option<f64> {
        self.dilutions
            .iter()
            .find(|e| e.solvent == solvent && e.solute == solute && e.temperature.matches(t_k))
            .map(|e| e.ln_gamma(t_k))
    }
}
