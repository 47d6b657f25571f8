use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Composite Simpson rule over `[a, b]`.
///
/// `intervals` is rounded up to the next even number. NaN samples propagate
/// into the result.
pub fn simpson<F>(a: Real, b: Real, intervals: usize, mut f: F) -> Real
where
    F: FnMut(Real) -> Real,
{
    let n = intervals.max(2).div_ceil(2) * 2;
    let h = (b - a) / n as Real;
    let mut sum = f(a) + f(b);
    for i in 1..n {
        let x = a + h * i as Real;
        let w = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += w * f(x);
    }
    sum * h / 3.0
}

/// Central difference derivative with step `h`.
pub fn central_difference<F>(x: Real, h: Real, mut f: F) -> Real
where
    F: FnMut(Real) -> Real,
{
    (f(x + h) - f(x - h)) / (2.0 * h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn simpson_is_exact_for_cubics() {
        let v = simpson(0.0, 2.0, 4, |x| x * x * x - x);
        assert!((v - 2.0).abs() < 1e-12);
    }

    #[test]
    fn simpson_rounds_odd_interval_count() {
        let v = simpson(0.0, 1.0, 7, |x| x * x);
        assert!((v - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn simpson_propagates_nan() {
        assert!(simpson(0.0, 1.0, 10, |_| Real::NAN).is_nan());
    }

    #[test]
    fn central_difference_of_square() {
        let d = central_difference(3.0, 1e-4, |x| x * x);
        assert!((d - 6.0).abs() < 1e-8);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn simpson_integrates_cubics_exactly(
            c0 in -10.0_f64..10.0,
            c3 in -10.0_f64..10.0,
            a in -2.0_f64..0.0,
            b in 0.1_f64..2.0,
        ) {
            let exact = |x: f64| c0 * x + c3 * x.powi(4) / 4.0;
            let v = simpson(a, b, 6, |x| c0 + c3 * x * x * x);
            let tol = Tolerances { abs: 1e-9, rel: 1e-9 };
            prop_assert!(nearly_equal(v, exact(b) - exact(a), tol));
        }
    }
}
