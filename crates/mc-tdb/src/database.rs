//! TDB database: loading, evaluation and fusion enthalpies.
//!
//! Statements are terminated by `!`; lines starting with `$` are comments.
//! Recognized statements:
//!
//! ```text
//! ELEMENT FE BCC_A2 5.5847E+01 4.4890E+03 2.7280E+01 !
//! FUNCTION GHSERFE 298.15 <expr>; 1811 Y <expr>; 6000 N !
//! PARAMETER G(LIQUID,FE;0) 298.15 <expr>; 6000 N REF !
//! ```
//!
//! In a body split on `;`, every piece after the first starts with the upper
//! bound of the previous segment and a Y/N flag; with `Y` the rest of the
//! piece is the next segment's expression.

use crate::error::{TdbError, TdbResult};
use crate::function::{GibbsFunction, GibbsSegment, parse_expression};
use mc_core::{FloatKey, MemoCache};
use petgraph::algo::toposort;
use petgraph::graph::DiGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Step of the numeric enthalpy derivative [K].
const ENTHALPY_STEP_K: f64 = 0.01;

/// `ELEMENT` declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementRecord {
    pub symbol: String,
    pub reference_phase: String,
    pub mass: f64,
    pub h298: f64,
    pub s298: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FusionMethod {
    /// From the coefficients of the liquid segment offset from GHSER
    Analytic,
    /// From numerically differentiated liquid and solid functions
    Numeric,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusionEnthalpy {
    pub element: String,
    pub t_k: f64,
    /// [J/mol]
    pub value: f64,
    pub method: FusionMethod,
    pub liquid_function: String,
}

/// Loaded Gibbs-energy database with memoized evaluation.
#[derive(Debug, Default)]
pub struct ThermoDatabase {
    elements: Vec<ElementRecord>,
    functions: HashMap<String, GibbsFunction>,
    memo: MemoCache<(String, FloatKey), f64>,
    loaded: bool,
}

impl ThermoDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse a database file.
    pub fn load(path: &Path) -> TdbResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| TdbError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let db = Self::parse(&text)?;
        tracing::info!(
            path = %path.display(),
            elements = db.elements.len(),
            functions = db.functions.len(),
            "loaded thermodynamic database"
        );
        Ok(db)
    }

    /// Replace the current contents with the parsed database file.
    pub fn reload(&mut self, path: &Path) -> TdbResult<()> {
        *self = Self::load(path)?;
        Ok(())
    }

    /// Parse database text.
    pub fn parse(text: &str) -> TdbResult<Self> {
        let cleaned: String = text
            .lines()
            .filter(|l| !l.trim_start().starts_with('$'))
            .collect::<Vec<_>>()
            .join("\n");

        let mut db = Self::new();
        for raw in cleaned.split('!') {
            let statement = raw.split_whitespace().collect::<Vec<_>>().join(" ");
            if statement.is_empty() {
                continue;
            }
            let keyword = statement
                .split(' ')
                .next()
                .unwrap_or_default()
                .to_ascii_uppercase();
            if keyword.starts_with("ELEM") {
                db.elements.push(parse_element(&statement)?);
            } else if keyword.starts_with("FUNC") || keyword.starts_with("PARA") {
                let function = parse_function(&statement)?;
                db.functions.insert(function.name.clone(), function);
            }
        }
        db.check_references()?;
        db.loaded = true;
        Ok(db)
    }

    /// Reject dangling references and reference cycles.
    fn check_references(&self) -> TdbResult<()> {
        let mut graph = DiGraph::<&str, ()>::new();
        let nodes: HashMap<&str, _> = self
            .functions
            .keys()
            .map(|name| (name.as_str(), graph.add_node(name.as_str())))
            .collect();

        for (name, function) in &self.functions {
            for referenced in function.referenced_names() {
                let Some(&to) = nodes.get(referenced) else {
                    return Err(TdbError::DanglingReference {
                        name: referenced.to_string(),
                        referenced_by: name.clone(),
                    });
                };
                graph.add_edge(nodes[name.as_str()], to, ());
            }
        }

        toposort(&graph, None).map(|_| ()).map_err(|cycle| TdbError::Cycle {
            name: graph[cycle.node_id()].to_string(),
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn elements(&self) -> &[ElementRecord] {
        &self.elements
    }

    pub fn element(&self, symbol: &str) -> Option<&ElementRecord> {
        self.elements
            .iter()
            .find(|e| e.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn function(&self, name: &str) -> Option<&GibbsFunction> {
        self.functions.get(&name.to_ascii_uppercase())
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.functions.keys().map(String::as_str)
    }

    /// Number of memoized evaluations.
    pub fn cached_values(&self) -> usize {
        self.memo.len()
    }

    /// G of `name` at `t_k` [J/mol], references included.
    pub fn evaluate(&self, name: &str, t_k: f64) -> TdbResult<f64> {
        let key = name.to_ascii_uppercase();
        let function = self
            .functions
            .get(&key)
            .ok_or_else(|| TdbError::UnknownFunction { name: key.clone() })?;
        self.memo
            .try_get_or_compute((key.clone(), FloatKey::new(t_k)), || {
                let index = function
                    .segment_index(t_k)
                    .ok_or_else(|| TdbError::UnknownFunction { name: key.clone() })?;
                self.evaluate_segment(function, index, t_k)
            })
    }

    /// G of one specific segment of `function` at `t_k`, references included.
    pub fn evaluate_segment(&self, function: &GibbsFunction, index: usize, t_k: f64) -> TdbResult<f64> {
        let segment = function
            .segments
            .get(index)
            .ok_or_else(|| TdbError::UnknownFunction {
                name: format!("{}[{index}]", function.name),
            })?;
        let mut g = segment.polynomial(t_k);
        for r in &segment.references {
            g += r.factor * self.evaluate(&r.name, t_k)?;
        }
        Ok(g)
    }

    /// H = G − T·dG/dT of `name` by central differences.
    pub fn numeric_enthalpy(&self, name: &str, t_k: f64) -> TdbResult<f64> {
        let g = self.evaluate(name, t_k)?;
        let plus = self.evaluate(name, t_k + ENTHALPY_STEP_K)?;
        let minus = self.evaluate(name, t_k - ENTHALPY_STEP_K)?;
        Ok(g - t_k * (plus - minus) / (2.0 * ENTHALPY_STEP_K))
    }

    /// Name of the liquid description of `element`, if any.
    pub fn liquid_function(&self, element: &str) -> Option<&GibbsFunction> {
        let el = element.to_ascii_uppercase();
        [
            format!("G{el}LIQ"),
            format!("GLIQ{el}"),
            format!("G(LIQUID,{el};0)"),
            format!("G(LIQUID,{el})"),
        ]
        .iter()
        .find_map(|name| self.functions.get(name))
    }

    /// Fusion enthalpy of `element` at its melting point `tm_k` [J/mol].
    ///
    /// Uses the liquid segment valid at `tm_k` when it is written as a
    /// polynomial offset from GHSER<el>; otherwise subtracts numerically
    /// differentiated liquid and solid enthalpies.
    pub fn fusion_enthalpy(&self, element: &str, tm_k: f64) -> TdbResult<FusionEnthalpy> {
        let el = element.to_ascii_uppercase();
        let solid = format!("GHSER{el}");
        let liquid = self.liquid_function(&el).ok_or_else(|| TdbError::NoFusionData {
            element: element.to_string(),
            what: "no liquid function".into(),
        })?;

        let offset = liquid
            .segment_at(tm_k)
            .filter(|s| s.is_offset_of(&solid))
            .or_else(|| liquid.segments.iter().find(|s| s.is_offset_of(&solid)));
        if let Some(segment) = offset {
            let value = segment.polynomial_enthalpy(tm_k);
            tracing::debug!(element, value, "analytic fusion enthalpy");
            return Ok(FusionEnthalpy {
                element: element.to_string(),
                t_k: tm_k,
                value,
                method: FusionMethod::Analytic,
                liquid_function: liquid.name.clone(),
            });
        }

        if !self.functions.contains_key(&solid) {
            return Err(TdbError::NoFusionData {
                element: element.to_string(),
                what: format!("no {solid}"),
            });
        }
        let value = self.numeric_enthalpy(&liquid.name, tm_k)? - self.numeric_enthalpy(&solid, tm_k)?;
        tracing::debug!(element, value, "numeric fusion enthalpy");
        Ok(FusionEnthalpy {
            element: element.to_string(),
            t_k: tm_k,
            value,
            method: FusionMethod::Numeric,
            liquid_function: liquid.name.clone(),
        })
    }
}

fn syntax(statement: &str, what: impl Into<String>) -> TdbError {
    TdbError::Syntax {
        statement: statement.chars().take(80).collect(),
        what: what.into(),
    }
}

fn parse_element(statement: &str) -> TdbResult<ElementRecord> {
    let tokens: Vec<&str> = statement.split(' ').collect();
    if tokens.len() < 6 {
        return Err(syntax(statement, "ELEMENT needs symbol, phase, mass, H298 and S298"));
    }
    let number = |s: &str| s.parse::<f64>().map_err(|_| syntax(statement, format!("bad number '{s}'")));
    Ok(ElementRecord {
        symbol: tokens[1].to_ascii_uppercase(),
        reference_phase: tokens[2].to_string(),
        mass: number(tokens[3])?,
        h298: number(tokens[4])?,
        s298: number(tokens[5])?,
    })
}

fn parse_function(statement: &str) -> TdbResult<GibbsFunction> {
    let mut parts = statement.splitn(3, ' ');
    let _keyword = parts.next();
    let name = parts
        .next()
        .ok_or_else(|| syntax(statement, "missing name"))?
        .to_ascii_uppercase();
    let body = parts.next().ok_or_else(|| syntax(statement, "missing body"))?;

    let pieces: Vec<&str> = body.split(';').collect();
    let (lower, first_expr) = split_leading_number(pieces[0]).ok_or_else(|| syntax(statement, "missing lower bound"))?;

    let mut segments = Vec::new();
    let mut current = GibbsSegment::default();
    parse_expression(first_expr, &mut current).map_err(|e| syntax(statement, e))?;

    for piece in &pieces[1..] {
        let (upper, rest) = split_leading_number(piece).ok_or_else(|| syntax(statement, "missing upper bound"))?;
        current.upper_k = upper;
        segments.push(std::mem::take(&mut current));

        let rest = rest.trim_start();
        let (flag, expr) = rest.split_at(rest.find(' ').unwrap_or(rest.len()));
        match flag.to_ascii_uppercase().as_str() {
            "Y" => parse_expression(expr, &mut current).map_err(|e| syntax(statement, e))?,
            "N" => return finish(statement, name, lower, segments),
            other => return Err(syntax(statement, format!("expected Y or N, found '{other}'"))),
        }
    }
    Err(syntax(statement, "body does not end with an N-flagged bound"))
}

fn finish(statement: &str, name: String, lower_k: f64, segments: Vec<GibbsSegment>) -> TdbResult<GibbsFunction> {
    if segments.windows(2).any(|w| w[1].upper_k < w[0].upper_k) {
        return Err(syntax(statement, "segment bounds are not increasing"));
    }
    Ok(GibbsFunction {
        name,
        lower_k,
        segments,
    })
}

/// Split `"  1811.00 Y rest"` into (1811.0, "Y rest").
fn split_leading_number(s: &str) -> Option<(f64, &str)> {
    let s = s.trim_start();
    let end = s.find(' ').unwrap_or(s.len());
    let value = s[..end].parse::<f64>().ok()?;
    Some((value, &s[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    const IRON: &str = r#"
$ Pure iron, SGTE unary
ELEMENT FE   BCC_A2   5.5847E+01  4.4890E+03  2.7280E+01 !
FUNCTION GHSERFE    298.15 +1225.7+124.134*T-23.5143*T*LN(T)
    -.00439752*T**2-5.8927E-08*T**3+77359*T**(-1);  1811.00  Y
    -25383.581+299.31255*T-46*T*LN(T)+2.29603E+31*T**(-9);  6000.00  N !
FUNCTION GFELIQ     298.15 +12040.17-6.55843*T-3.6751551E-21*T**7
    +GHSERFE#;  1811.00  Y
    -10839.7+291.302*T-46*T*LN(T);  6000.00  N !
"#;

    #[test]
    fn parses_elements_and_functions() {
        let db = ThermoDatabase::parse(IRON).unwrap();
        assert!(db.is_loaded());
        let fe = db.element("Fe").unwrap();
        assert_eq!(fe.reference_phase, "BCC_A2");
        assert_eq!(fe.mass, 55.847);
        let f = db.function("ghserfe").unwrap();
        assert_eq!(f.segments.len(), 2);
        assert_eq!(f.segments[0].upper_k, 1811.0);
        assert_eq!(f.segments[1].upper_k, 6000.0);
    }

    #[test]
    fn evaluation_is_memoized() {
        let db = ThermoDatabase::parse(IRON).unwrap();
        let g = db.evaluate("GFELIQ", 1000.0).unwrap();
        // GFELIQ and the GHSERFE it references.
        assert_eq!(db.cached_values(), 2);
        assert_eq!(db.evaluate("GFELIQ", 1000.0).unwrap(), g);
        assert_eq!(db.cached_values(), 2);
    }

    #[test]
    fn analytic_fusion_enthalpy_of_iron() {
        let db = ThermoDatabase::parse(IRON).unwrap();
        let h = db.fusion_enthalpy("Fe", 1811.0).unwrap();
        assert_eq!(h.method, FusionMethod::Analytic);
        let expected = 12040.17 + 6.0 * 3.6751551e-21 * 1811.0_f64.powi(7);
        assert!((h.value - expected).abs() < 1e-6 * expected);
        assert!((h.value - 13449.0).abs() < 1.0);
    }

    #[test]
    fn numeric_fallback_without_offset_segment() {
        let text = "
            FUNCTION GHSERCU 298.15 -1000+10*T; 3000 N !
            FUNCTION GCULIQ 298.15 +4000+8*T; 3000 N !
        ";
        let db = ThermoDatabase::parse(text).unwrap();
        let h = db.fusion_enthalpy("Cu", 1358.0).unwrap();
        assert_eq!(h.method, FusionMethod::Numeric);
        assert!((h.value - 5000.0).abs() < 1e-4);
    }

    #[test]
    fn parameters_are_liquid_candidates() {
        let text = "
            FUNCTION GHSERAL 298.15 -7976.15+137.093038*T-24.3671976*T*LN(T); 933.47 Y
                -11276.24+223.048446*T-38.5844296*T*LN(T); 2900 N !
            PARAMETER G(LIQUID,AL;0) 298.15 +11005.029-11.841867*T+7.9337E-20*T**7+GHSERAL#;
                933.47 Y +10482.382-11.253974*T+1.231E+28*T**(-9)+GHSERAL#; 2900 N 91DIN !
        ";
        let db = ThermoDatabase::parse(text).unwrap();
        let h = db.fusion_enthalpy("Al", 933.47).unwrap();
        assert_eq!(h.method, FusionMethod::Analytic);
        assert_eq!(h.liquid_function, "G(LIQUID,AL;0)");
        assert!(h.value > 10000.0 && h.value < 12000.0, "{}", h.value);
    }

    #[test]
    fn cycles_are_rejected() {
        let text = "
            FUNCTION GA 298.15 +1+GB#; 6000 N !
            FUNCTION GB 298.15 +2+GA#; 6000 N !
        ";
        assert!(matches!(ThermoDatabase::parse(text), Err(TdbError::Cycle { .. })));
    }

    #[test]
    fn dangling_references_are_rejected() {
        let text = "FUNCTION GA 298.15 +1+GHSERXX#; 6000 N !";
        assert!(matches!(
            ThermoDatabase::parse(text),
            Err(TdbError::DanglingReference { .. })
        ));
    }

    #[test]
    fn malformed_bodies_are_rejected() {
        assert!(ThermoDatabase::parse("FUNCTION GA 298.15 +1; 6000 Q !").is_err());
        assert!(ThermoDatabase::parse("FUNCTION GA 298.15 +1 !").is_err());
        assert!(ThermoDatabase::parse("FUNCTION GA; 6000 N !").is_err());
        assert!(ThermoDatabase::parse("ELEMENT FE BCC_A2 x 0 0 !").is_err());
    }

    #[test]
    fn unknown_function_is_an_error() {
        let db = ThermoDatabase::parse(IRON).unwrap();
        assert!(matches!(db.evaluate("GHSERNI", 1000.0), Err(TdbError::UnknownFunction { .. })));
        assert!(matches!(db.fusion_enthalpy("Ni", 1728.0), Err(TdbError::NoFusionData { .. })));
        assert!(!ThermoDatabase::new().is_loaded());
    }
}
