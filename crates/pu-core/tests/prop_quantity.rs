//! Property-based tests for quantity arithmetic.

use proptest::prelude::*;
use pu_core::numeric::nearly_equal_rel;
use pu_core::{PrefixRegistry, Quantity, SI_PREFIXES, Units};

fn units() -> impl Strategy<Value = Units> {
    prop::array::uniform7(-3i32..=3).prop_map(Units::from_exponents)
}

fn prefix_symbol() -> impl Strategy<Value = &'static str> {
    prop::sample::select(SI_PREFIXES.iter().map(|(s, _)| *s).collect::<Vec<_>>())
}

fn quantity() -> impl Strategy<Value = Quantity> {
    (-1e6f64..1e6, prefix_symbol(), units()).prop_map(|(value, symbol, units)| {
        Quantity::with_prefix(value, symbol, units, PrefixRegistry::global())
            .expect("standard prefix")
    })
}

proptest! {
    /// Sums and differences keep the operands' dimensions.
    #[test]
    fn dimensional_closure(a in quantity(), v in -1e6f64..1e6) {
        let b = Quantity::base(v, a.units());
        prop_assert_eq!(a.add(&b).unwrap().units(), a.units());
        prop_assert_eq!(a.sub(&b).unwrap().units(), a.units());
    }

    /// a / a is dimensionless with magnitude 1.
    #[test]
    fn multiplicative_inverse(a in quantity()) {
        prop_assume!(a.value() != 0.0);
        let r = a.div(&a).unwrap();
        prop_assert!(r.units().is_dimensionless());
        prop_assert!(nearly_equal_rel(r.magnitude(), 1.0, 1e-9));
    }

    /// Converting away and back reproduces the value.
    #[test]
    fn prefix_conversion_idempotence(a in quantity(), target in prefix_symbol()) {
        let reg = PrefixRegistry::global();
        let back = a
            .convert(target, reg)
            .and_then(|q| q.convert(a.prefix().symbol(), reg))
            .unwrap();
        prop_assert_eq!(back.prefix(), a.prefix());
        prop_assert!(nearly_equal_rel(back.value(), a.value(), 1e-12));
    }

    /// Arithmetic results land in the mantissa window when the ladder covers them.
    #[test]
    fn results_are_best_prefixed(a in quantity(), b in quantity()) {
        let p = a.mul(&b).unwrap();
        let m = p.magnitude().abs();
        if (1e-12..1e18).contains(&m) {
            prop_assert!((1.0..1000.0).contains(&p.value().abs()), "{}", p);
        } else {
            prop_assert!(p.prefix().is_unscaled());
        }
    }

    /// Multiplication commutes in magnitude and dimension.
    #[test]
    fn mul_commutes(a in quantity(), b in quantity()) {
        let ab = a.mul(&b).unwrap();
        let ba = b.mul(&a).unwrap();
        prop_assert_eq!(ab.units(), ba.units());
        prop_assert!(ab.approx_eq(&ba).unwrap());
    }
}
