//! Segmented Gibbs-energy polynomials.
//!
//! Each segment holds
//!
//! ```text
//! G(T) = a + b·T + c·T·ln T + d·T² + e·T³ + f/T + Σ g·Tⁿ + Σ k·G_ref(T)
//! ```
//!
//! and is valid up to its upper temperature bound.

use serde::Serialize;

/// g·Tⁿ for exponents outside the fixed slots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PowerTerm {
    pub coefficient: f64,
    pub exponent: f64,
}

/// k·G_name(T).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionRef {
    pub factor: f64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GibbsSegment {
    /// Upper bound of validity [K]
    pub upper_k: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
    pub powers: Vec<PowerTerm>,
    pub references: Vec<FunctionRef>,
}

impl GibbsSegment {
    /// Value of the segment's own polynomial, references excluded.
    pub fn polynomial(&self, t: f64) -> f64 {
        let mut g = self.a
            + self.b * t
            + self.c * t * t.ln()
            + self.d * t * t
            + self.e * t * t * t
            + self.f / t;
        for p in &self.powers {
            g += p.coefficient * t.powf(p.exponent);
        }
        g
    }

    /// H = G − T·dG/dT of the segment's own polynomial:
    ///
    /// ```text
    /// H = a − c·T − d·T² − 2e·T³ + 2f/T + Σ (1 − n)·g·Tⁿ
    /// ```
    pub fn polynomial_enthalpy(&self, t: f64) -> f64 {
        let mut h = self.a - self.c * t - self.d * t * t - 2.0 * self.e * t * t * t + 2.0 * self.f / t;
        for p in &self.powers {
            h += (1.0 - p.exponent) * p.coefficient * t.powf(p.exponent);
        }
        h
    }

    /// Whether the segment is its own polynomial plus exactly 1·`name`.
    pub fn is_offset_of(&self, name: &str) -> bool {
        matches!(self.references.as_slice(), [r] if r.name == name && r.factor == 1.0)
    }

    fn add_power(&mut self, coefficient: f64, exponent: f64) {
        match exponent {
            x if x == 0.0 => self.a += coefficient,
            x if x == 1.0 => self.b += coefficient,
            x if x == 2.0 => self.d += coefficient,
            x if x == 3.0 => self.e += coefficient,
            x if x == -1.0 => self.f += coefficient,
            _ => match self.powers.iter_mut().find(|p| p.exponent == exponent) {
                Some(p) => p.coefficient += coefficient,
                None => self.powers.push(PowerTerm {
                    coefficient,
                    exponent,
                }),
            },
        }
    }
}

/// Named sequence of segments ordered by increasing upper bound.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GibbsFunction {
    pub name: String,
    pub lower_k: f64,
    pub segments: Vec<GibbsSegment>,
}

impl GibbsFunction {
    /// Index of the first segment whose bound is ≥ `t`, else the last one.
    pub fn segment_index(&self, t: f64) -> Option<usize> {
        if self.segments.is_empty() {
            return None;
        }
        Some(
            self.segments
                .iter()
                .position(|s| s.upper_k >= t)
                .unwrap_or(self.segments.len() - 1),
        )
    }

    pub fn segment_at(&self, t: f64) -> Option<&GibbsSegment> {
        self.segment_index(t).map(|i| &self.segments[i])
    }

    /// Names of all functions referenced by any segment.
    pub fn referenced_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.segments
            .iter()
            .flat_map(|s| s.references.iter().map(|r| r.name.as_str()))
    }
}

/// Parse one segment expression into `segment`'s coefficient slots.
///
/// Returns a description of the first term that cannot be classified.
pub(crate) fn parse_expression(expr: &str, segment: &mut GibbsSegment) -> Result<(), String> {
    let compact: String = expr
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();
    if compact.is_empty() {
        return Ok(());
    }
    for term in split_terms(&compact) {
        parse_term(term, segment)?;
    }
    Ok(())
}

/// Split at `+`/`-` that separate terms: outside parentheses, not following
/// a mantissa's `E`, and not directly after an operator.
fn split_terms(s: &str) -> Vec<&str> {
    let bytes = s.as_bytes();
    let mut terms = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (idx, &c) in bytes.iter().enumerate() {
        match c {
            b'(' => depth += 1,
            b')' => depth -= 1,
            b'+' | b'-' if depth == 0 && idx > start => {
                if is_exponent_sign(bytes, idx) || matches!(bytes[idx - 1], b'*' | b'/') {
                    continue;
                }
                terms.push(&s[start..idx]);
                start = idx;
            }
            _ => {}
        }
    }
    terms.push(&s[start..]);
    terms
}

/// `1.5E-3`: the sign belongs to the number when `E` follows a digit or dot
/// that is part of a number, not the tail of a name like `GHSERFE`.
fn is_exponent_sign(bytes: &[u8], idx: usize) -> bool {
    if idx < 2 || bytes[idx - 1] != b'E' {
        return false;
    }
    let mut k = idx - 1;
    while k > 0 && (bytes[k - 1].is_ascii_digit() || bytes[k - 1] == b'.') {
        k -= 1;
    }
    // The digit run must start the term or follow an operator.
    k < idx - 1 && (k == 0 || matches!(bytes[k - 1], b'+' | b'-' | b'*' | b'/' | b'('))
}

fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '(' | ')' | ',' | ';'))
}

/// Exponent of a `T**n` or `T**(n)` factor.
fn parse_exponent(s: &str) -> Option<f64> {
    let inner = s.strip_prefix('(').and_then(|s| s.strip_suffix(')')).unwrap_or(s);
    parse_number(inner)
}

fn parse_term(term: &str, segment: &mut GibbsSegment) -> Result<(), String> {
    let (sign, body) = match term.as_bytes().first() {
        Some(b'-') => (-1.0, &term[1..]),
        Some(b'+') => (1.0, &term[1..]),
        _ => (1.0, term),
    };
    if body.is_empty() {
        return Err(format!("empty term in '{term}'"));
    }

    let mut coefficient = sign;
    let mut exponent = 0.0;
    let mut log_t = false;
    let mut reference: Option<String> = None;

    for factor in split_factors(body) {
        if let Some(v) = parse_number(factor) {
            coefficient *= v;
        } else if factor == "T" {
            exponent += 1.0;
        } else if let Some(rest) = factor.strip_prefix("T**") {
            exponent += parse_exponent(rest).ok_or_else(|| format!("bad exponent in '{term}'"))?;
        } else if factor == "LN(T)" {
            if log_t {
                return Err(format!("repeated LN(T) in '{term}'"));
            }
            log_t = true;
        } else if let Some(rest) = factor.strip_suffix('#').filter(|r| is_name(r)) {
            reference = Some(rest.to_string());
        } else if is_name(factor) && reference.is_none() {
            reference = Some(factor.to_string());
        } else {
            return Err(format!("unrecognized factor '{factor}' in '{term}'"));
        }
    }

    match (reference, log_t) {
        (Some(name), false) if exponent == 0.0 => {
            segment.references.push(FunctionRef {
                factor: coefficient,
                name,
            });
            Ok(())
        }
        (Some(_), _) => Err(format!("function reference with T factors in '{term}'")),
        (None, true) if exponent == 1.0 => {
            segment.c += coefficient;
            Ok(())
        }
        (None, true) => Err(format!("unsupported logarithmic term '{term}'")),
        (None, false) => {
            segment.add_power(coefficient, exponent);
            Ok(())
        }
    }
}

/// Split a product at `*` that are not part of `**`.
fn split_factors(s: &str) -> Vec<&str> {
    let bytes = s.as_bytes();
    let mut out = Vec::new();
    let mut start = 0;
    let mut depth = 0i32;
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'(' => depth += 1,
            b')' => depth -= 1,
            b'*' if depth == 0 => {
                if bytes.get(idx + 1) == Some(&b'*') {
                    idx += 2;
                    continue;
                }
                out.push(&s[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
        idx += 1;
    }
    out.push(&s[start..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(expr: &str) -> GibbsSegment {
        let mut s = GibbsSegment::default();
        parse_expression(expr, &mut s).unwrap();
        s
    }

    #[test]
    fn sgte_iron_low_segment() {
        let s = parse("+1225.7+124.134*T-23.5143*T*LN(T) -.00439752*T**2-5.8927E-08*T**3+77359*T**(-1)");
        assert_eq!(s.a, 1225.7);
        assert_eq!(s.b, 124.134);
        assert_eq!(s.c, -23.5143);
        assert_eq!(s.d, -0.00439752);
        assert_eq!(s.e, -5.8927e-8);
        assert_eq!(s.f, 77359.0);
        assert!(s.powers.is_empty());
    }

    #[test]
    fn arbitrary_exponents_and_references() {
        let s = parse("+12040.17-6.55843*T-3.6751551E-21*T**7+GHSERFE#");
        assert_eq!(s.powers, vec![PowerTerm { coefficient: -3.6751551e-21, exponent: 7.0 }]);
        assert!(s.is_offset_of("GHSERFE"));

        let s = parse("2.29603E+31*T**(-9)-GHSERFE");
        assert_eq!(s.powers[0].exponent, -9.0);
        assert_eq!(s.references[0].factor, -1.0);
        assert!(!s.is_offset_of("GHSERFE"));
    }

    #[test]
    fn names_ending_in_e_are_not_exponents() {
        let s = parse("GHSERFE-100");
        assert_eq!(s.a, -100.0);
        assert_eq!(s.references.len(), 1);
    }

    #[test]
    fn malformed_terms_are_rejected() {
        let mut s = GibbsSegment::default();
        assert!(parse_expression("3*T*LN(X)", &mut s).is_err());
        assert!(parse_expression("3*T**Q", &mut s).is_err());
        assert!(parse_expression("2*GHSERFE*T", &mut s).is_err());
        assert!(parse_expression("1.2.3", &mut s).is_err());
    }

    #[test]
    fn enthalpy_identity_per_coefficient() {
        let s = parse("100+2*T-3*T*LN(T)+4E-3*T**2+5E-7*T**3+600*T**(-1)+7E-21*T**7");
        let t = 1500.0;
        let h = 1e-3;
        let numeric = s.polynomial(t) - t * (s.polynomial(t + h) - s.polynomial(t - h)) / (2.0 * h);
        assert!((numeric - s.polynomial_enthalpy(t)).abs() < 1e-3);
    }

    #[test]
    fn segment_selection() {
        let f = GibbsFunction {
            name: "G".into(),
            lower_k: 298.15,
            segments: vec![
                GibbsSegment { upper_k: 1000.0, a: 1.0, ..Default::default() },
                GibbsSegment { upper_k: 2000.0, a: 2.0, ..Default::default() },
            ],
        };
        assert_eq!(f.segment_index(1000.0), Some(0));
        assert_eq!(f.segment_index(1000.1), Some(1));
        assert_eq!(f.segment_index(5000.0), Some(1));
        assert_eq!(f.segment_index(100.0), Some(0));
    }
}
