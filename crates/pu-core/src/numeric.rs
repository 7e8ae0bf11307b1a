use crate::PuError;

/// Absolute/relative tolerance pair for magnitude comparisons.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
}

impl Tolerances {
    /// No absolute floor; needed below the pico range where 1e-12 swamps the
    /// magnitudes being compared.
    pub const fn relative(rel: f64) -> Self {
        Self { abs: 0.0, rel }
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: f64, b: f64, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// Relative-only comparison, for quantities whose scale makes an absolute floor meaningless
/// (prefix factors span 1e-30 to 1e30).
pub fn nearly_equal_rel(a: f64, b: f64, rel: f64) -> bool {
    (a - b).abs() <= rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, PuError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(PuError::NonFinite { what, value: v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_magnitudes_compare_equal() {
        let tol = Tolerances::default();
        // 2.5 km vs 2500 m, 0.3 ms vs 300 µs
        assert!(nearly_equal(2.5 * 1e3, 2500.0, tol));
        assert!(nearly_equal(0.3 * 1e-3, 300.0 * 1e-6, tol));
        // SI kilo vs binary kilo
        assert!(!nearly_equal(1e3, 1024.0, tol));
        assert!(nearly_equal(0.1 + 0.2, 0.3, tol));
    }

    #[test]
    fn absolute_floor_hides_femto_differences() {
        assert!(nearly_equal(1e-15, 2e-15, Tolerances::default()));
        assert!(!nearly_equal(1e-15, 2e-15, Tolerances::relative(1e-9)));
        assert!(nearly_equal(1e-15, 1e-15 * (1.0 + 1e-12), Tolerances::relative(1e-9)));
    }

    #[test]
    fn relative_comparison_across_prefix_range() {
        assert!(nearly_equal_rel(1e-30, 1.0000000001e-30, 1e-9));
        assert!(nearly_equal_rel(3e30, 3e30 * (1.0 + 1e-12), 1e-9));
        assert!(!nearly_equal_rel(1e-15, 2e-15, 1e-9));
        assert!(nearly_equal_rel(0.0, 0.0, 1e-9));
    }

    #[test]
    fn ensure_finite_rejects_overflowed_products() {
        let err = ensure_finite(1e200 * 1e200, "mul").unwrap_err();
        assert_eq!(
            err,
            PuError::NonFinite {
                what: "mul",
                value: f64::INFINITY
            }
        );
        assert!(ensure_finite(f64::NAN, "div").is_err());
        assert_eq!(ensure_finite(2.5e-30, "ok"), Ok(2.5e-30));
    }
}
