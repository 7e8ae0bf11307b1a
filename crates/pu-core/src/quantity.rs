//! Dimension-checked quantities.
//!
//! A [`Quantity`] is `value` scaled by `prefix` in the dimensions of `units`;
//! the true magnitude is `value * prefix.factor()`. Every operation returns a
//! new quantity and checks dimensions before touching any number. Results of
//! add/sub/mul/div/pow are re-expressed with the best engineering prefix.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Mul, Neg};
use std::str::FromStr;

use crate::error::{PuError, PuResult};
use crate::numeric::{Tolerances, ensure_finite, nearly_equal, nearly_equal_rel};
use crate::parse::UnitParser;
use crate::prefix::{Ladder, Prefix, PrefixRegistry, best_prefix, best_prefix_with};
use crate::units::Units;

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quantity {
    value: f64,
    prefix: Prefix,
    units: Units,
}

impl Quantity {
    pub fn new(value: f64, prefix: Prefix, units: Units) -> Self {
        Self {
            value,
            prefix,
            units,
        }
    }

    /// Quantity with the unscaled prefix.
    pub fn base(value: f64, units: Units) -> Self {
        Self::new(value, Prefix::unscaled(), units)
    }

    pub fn dimensionless(value: f64) -> Self {
        Self::base(value, Units::DIMENSIONLESS)
    }

    /// Quantity with a prefix looked up by symbol.
    pub fn with_prefix(
        value: f64,
        symbol: &str,
        units: Units,
        registry: &PrefixRegistry,
    ) -> PuResult<Self> {
        Ok(Self::new(value, registry.lookup(symbol)?, units))
    }

    /// Parse `"<number> <unit expression>"`, e.g. `"9.81 m/s^2"` or `"2.5km"`.
    ///
    /// A prefixed expression whose scale matches a registered prefix keeps it
    /// (`"2 km"` is 2 k·m); any other scale is folded into the value.
    pub fn parse_with(text: &str, registry: &PrefixRegistry) -> PuResult<Self> {
        let invalid = || PuError::InvalidQuantity {
            input: text.to_string(),
        };
        let (number, unit) = split_value_and_unit(text).ok_or_else(invalid)?;
        let value: f64 = number.parse().map_err(|_| invalid())?;
        let value = ensure_finite(value, "parse")?;
        if unit.is_empty() {
            return Ok(Self::dimensionless(value));
        }

        let expr = UnitParser::new(registry).parse_expression(unit)?;
        let scale = expr.scale();
        if scale == 0.0 || !scale.is_finite() {
            return Err(PuError::NonFinite {
                what: "unit scale",
                value: scale,
            });
        }
        let quantity = match prefix_for_scale(scale, registry) {
            Some(prefix) => Self::new(value, prefix, expr.units()),
            None => Self::base(ensure_finite(value * scale, "parse")?, expr.units()),
        };
        Ok(quantity)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    pub fn units(&self) -> Units {
        self.units
    }

    /// True magnitude in unprefixed base units.
    pub fn magnitude(&self) -> f64 {
        self.value * self.prefix.factor()
    }

    pub fn is_compatible(&self, other: &Quantity) -> bool {
        self.units == other.units
    }

    fn ensure_compatible(&self, other: &Quantity, op: &'static str) -> PuResult<()> {
        if self.is_compatible(other) {
            Ok(())
        } else {
            Err(PuError::DimensionMismatch {
                op,
                left: self.units,
                right: other.units,
            })
        }
    }

    fn overflow(&self, op: &'static str) -> PuError {
        PuError::ExponentOverflow {
            op,
            units: self.units,
        }
    }

    /// Build a result from a raw magnitude, choosing the best prefix.
    fn from_magnitude(magnitude: f64, units: Units, what: &'static str) -> PuResult<Self> {
        let magnitude = ensure_finite(magnitude, what)?;
        let prefix = best_prefix(magnitude);
        Ok(Self::new(magnitude / prefix.factor(), prefix, units))
    }

    pub fn add(&self, other: &Quantity) -> PuResult<Quantity> {
        self.ensure_compatible(other, "add")?;
        Self::from_magnitude(self.magnitude() + other.magnitude(), self.units, "add")
    }

    pub fn sub(&self, other: &Quantity) -> PuResult<Quantity> {
        self.ensure_compatible(other, "sub")?;
        Self::from_magnitude(self.magnitude() - other.magnitude(), self.units, "sub")
    }

    pub fn mul(&self, other: &Quantity) -> PuResult<Quantity> {
        let units = self
            .units
            .checked_mul(other.units)
            .ok_or_else(|| self.overflow("mul"))?;
        Self::from_magnitude(self.magnitude() * other.magnitude(), units, "mul")
    }

    pub fn div(&self, other: &Quantity) -> PuResult<Quantity> {
        if other.value == 0.0 {
            return Err(PuError::DivisionByZero { what: "div" });
        }
        let units = self
            .units
            .checked_div(other.units)
            .ok_or_else(|| self.overflow("div"))?;
        Self::from_magnitude(self.magnitude() / other.magnitude(), units, "div")
    }

    pub fn pow(&self, n: i32) -> PuResult<Quantity> {
        let base = self.magnitude();
        if base == 0.0 && n < 0 {
            return Err(PuError::DivisionByZero { what: "pow" });
        }
        let units = self.units.checked_power(n).ok_or_else(|| self.overflow("pow"))?;
        Self::from_magnitude(base.powi(n), units, "pow")
    }

    /// Real power. Integral exponents defer to [`pow`](Self::pow); otherwise
    /// the magnitude must be non-negative and every dimension exponent must
    /// stay an integer.
    pub fn powf(&self, x: f64) -> PuResult<Quantity> {
        if x.fract() == 0.0 && x.abs() <= i32::MAX as f64 {
            return self.pow(x as i32);
        }
        let base = self.magnitude();
        if base < 0.0 {
            return Err(PuError::NegativeBaseFractionalPower { base, exponent: x });
        }
        if base == 0.0 && x < 0.0 {
            return Err(PuError::DivisionByZero { what: "powf" });
        }
        let units = self
            .units
            .try_powf(x)
            .ok_or(PuError::NonIntegralDimension {
                units: self.units,
                exponent: x,
            })?;
        Self::from_magnitude(base.powf(x), units, "powf")
    }

    pub fn sqrt(&self) -> PuResult<Quantity> {
        self.powf(0.5)
    }

    /// `1 / self`.
    pub fn recip(&self) -> PuResult<Quantity> {
        if self.value == 0.0 {
            return Err(PuError::DivisionByZero { what: "recip" });
        }
        let units = Units::DIMENSIONLESS
            .checked_div(self.units)
            .ok_or_else(|| self.overflow("recip"))?;
        Self::from_magnitude(1.0 / self.magnitude(), units, "recip")
    }

    /// Multiply the value by a plain number; prefix and units are unchanged.
    pub fn scale(&self, factor: f64) -> Quantity {
        Self::new(self.value * factor, self.prefix.clone(), self.units)
    }

    pub fn div_scalar(&self, divisor: f64) -> PuResult<Quantity> {
        if divisor == 0.0 {
            return Err(PuError::DivisionByZero { what: "div_scalar" });
        }
        Ok(Self::new(self.value / divisor, self.prefix.clone(), self.units))
    }

    /// Re-express with the prefix registered under `symbol`.
    pub fn convert(&self, symbol: &str, registry: &PrefixRegistry) -> PuResult<Quantity> {
        let target = registry.lookup(symbol)?;
        Ok(self.convert_to(&target))
    }

    pub fn convert_to(&self, target: &Prefix) -> Quantity {
        Self::new(self.magnitude() / target.factor(), target.clone(), self.units)
    }

    /// Same magnitude, best engineering prefix.
    pub fn normalized(&self) -> Quantity {
        self.normalized_with(Ladder::Engineering)
    }

    pub fn normalized_with(&self, ladder: Ladder) -> Quantity {
        self.convert_to(&best_prefix_with(self.magnitude(), ladder))
    }

    /// Convert to a compatible prefixed unit expression such as `"km"` or
    /// `"mm^2"`.
    ///
    /// The expression's overall prefix scale must match a registered prefix.
    pub fn to(&self, expr: &str, registry: &PrefixRegistry) -> PuResult<Quantity> {
        let parsed = UnitParser::new(registry).parse_expression(expr)?;
        let target_units = parsed.units();
        if target_units != self.units {
            return Err(PuError::DimensionMismatch {
                op: "to",
                left: self.units,
                right: target_units,
            });
        }
        let prefix =
            prefix_for_scale(parsed.scale(), registry).ok_or_else(|| PuError::UnknownPrefix {
                symbol: expr.to_string(),
            })?;
        Ok(self.convert_to(&prefix))
    }

    /// Magnitude equality within `tol`; fails on mismatched dimensions.
    pub fn eq_within(&self, other: &Quantity, tol: Tolerances) -> PuResult<bool> {
        self.ensure_compatible(other, "eq")?;
        Ok(nearly_equal(self.magnitude(), other.magnitude(), tol))
    }

    pub fn approx_eq(&self, other: &Quantity) -> PuResult<bool> {
        self.eq_within(other, Tolerances::default())
    }

    pub fn compare(&self, other: &Quantity) -> PuResult<Ordering> {
        self.ensure_compatible(other, "compare")?;
        let (a, b) = (self.magnitude(), other.magnitude());
        a.partial_cmp(&b).ok_or(PuError::NonFinite {
            what: "compare",
            value: if a.is_nan() { a } else { b },
        })
    }

    pub fn lt(&self, other: &Quantity) -> PuResult<bool> {
        Ok(self.compare(other)? == Ordering::Less)
    }

    pub fn le(&self, other: &Quantity) -> PuResult<bool> {
        Ok(self.compare(other)? != Ordering::Greater)
    }

    pub fn gt(&self, other: &Quantity) -> PuResult<bool> {
        Ok(self.compare(other)? == Ordering::Greater)
    }

    pub fn ge(&self, other: &Quantity) -> PuResult<bool> {
        Ok(self.compare(other)? != Ordering::Less)
    }

    /// Best-prefixed and rounded to at most `max_precision` decimals:
    /// `320.0 µm`.
    pub fn pretty(&self, max_precision: usize) -> String {
        self.pretty_with(max_precision, Ladder::Engineering)
    }

    pub fn pretty_with(&self, max_precision: usize, ladder: Ladder) -> String {
        let best = self.normalized_with(ladder);
        join_parts(
            &format_rounded(best.value, max_precision),
            &best.prefix,
            &best.units,
        )
    }
}

/// Fixed-point rounding with trailing zeros trimmed, keeping at least one
/// decimal like `{:?}` does (`320.0`, `1.23`).
fn format_rounded(value: f64, max_precision: usize) -> String {
    if !value.is_finite() {
        return format!("{value:?}");
    }
    let fixed = format!("{:.*}", max_precision, value);
    let mut out = match fixed.split_once('.') {
        Some((int, frac)) => {
            let frac = frac.trim_end_matches('0');
            format!("{int}.{}", if frac.is_empty() { "0" } else { frac })
        }
        None => format!("{fixed}.0"),
    };
    if out == "-0.0" {
        out.remove(0);
    }
    out
}

/// Registered prefix for an expression scale; `None` if nothing matches.
fn prefix_for_scale(scale: f64, registry: &PrefixRegistry) -> Option<Prefix> {
    if nearly_equal_rel(scale, 1.0, 1e-9) {
        return Some(Prefix::unscaled());
    }
    registry.find_by_factor(scale).cloned()
}

fn join_parts(value: &str, prefix: &Prefix, units: &Units) -> String {
    let unit = format!("{}{}", prefix.symbol(), units.display_name());
    if unit.is_empty() {
        value.to_string()
    } else {
        format!("{value} {unit}")
    }
}

/// Split `"14.7 kPa"` / `"14.7kPa"` into number and unit text.
fn split_value_and_unit(input: &str) -> Option<(&str, &str)> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some((num, unit)) = trimmed.split_once(char::is_whitespace) {
        return Some((num, unit.trim()));
    }

    let mut split_idx = trimmed
        .find(|c: char| !c.is_ascii_digit() && !matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        .unwrap_or(trimmed.len());
    // "3e" is not a number; leave a trailing exponent marker to the unit
    while split_idx > 0 && trimmed[..split_idx].ends_with(['e', 'E']) {
        split_idx -= 1;
    }
    Some(trimmed.split_at(split_idx))
}

impl FromStr for Quantity {
    type Err = PuError;

    fn from_str(s: &str) -> PuResult<Self> {
        Self::parse_with(s, PrefixRegistry::global())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match f.precision() {
            Some(p) => format!("{:.*}", p, self.value),
            None => format!("{:?}", self.value),
        };
        f.write_str(&join_parts(&value, &self.prefix, &self.units))
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        Quantity::new(-self.value, self.prefix, self.units)
    }
}

impl Neg for &Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        -self.clone()
    }
}

impl Mul<f64> for Quantity {
    type Output = Quantity;

    fn mul(self, rhs: f64) -> Quantity {
        self.scale(rhs)
    }
}

impl Mul<f64> for &Quantity {
    type Output = Quantity;

    fn mul(self, rhs: f64) -> Quantity {
        self.scale(rhs)
    }
}

impl Mul<Quantity> for f64 {
    type Output = Quantity;

    fn mul(self, rhs: Quantity) -> Quantity {
        rhs.scale(self)
    }
}

impl Mul<&Quantity> for f64 {
    type Output = Quantity;

    fn mul(self, rhs: &Quantity) -> Quantity {
        rhs.scale(self)
    }
}
