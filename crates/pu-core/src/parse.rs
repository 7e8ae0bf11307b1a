//! Unit expression parser.
//!
//! Grammar: terms separated by `*`, `/` (or `·` for `*`), each term a
//! possibly prefixed unit symbol with an optional integer exponent after `^`.
//! `^` binds tighter than `*`/`/`, which fold strictly left to right:
//! `m/s/s` is `(m/s)/s`. Whitespace is ignored.

use crate::error::{PuError, PuResult};
use crate::prefix::{Prefix, PrefixRegistry};
use crate::units::{Combine, Units, lookup_symbol};

/// One resolved term of a unit expression, e.g. `/ms^2`.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub op: Combine,
    pub symbol: String,
    pub prefix: Prefix,
    pub units: Units,
    pub exponent: i32,
}

impl Term {
    /// Dimension contribution of this term, exponent applied; `None` if an
    /// exponent overflows.
    pub fn powered_units(&self) -> Option<Units> {
        self.units.checked_power(self.exponent)
    }
}

/// A parsed expression that still remembers the prefixes it was written with.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitExpression {
    terms: Vec<Term>,
    units: Units,
}

impl UnitExpression {
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Dimension vector of the whole expression; prefixes play no part.
    pub fn units(&self) -> Units {
        self.units
    }

    /// Overall scale contributed by the prefixes, `km/ms` = 1e3 / 1e-3.
    pub fn scale(&self) -> f64 {
        self.terms.iter().fold(1.0, |acc, term| {
            let f = term.prefix.factor().powi(term.exponent);
            match term.op {
                Combine::Multiply => acc * f,
                Combine::Divide => acc / f,
            }
        })
    }
}

/// Parser bound to a prefix registry.
#[derive(Debug, Clone, Copy)]
pub struct UnitParser<'r> {
    registry: &'r PrefixRegistry,
}

impl Default for UnitParser<'static> {
    fn default() -> Self {
        Self::new(PrefixRegistry::global())
    }
}

impl<'r> UnitParser<'r> {
    pub fn new(registry: &'r PrefixRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r PrefixRegistry {
        self.registry
    }

    /// Parse to a pure dimension vector, discarding prefixes.
    pub fn parse(&self, expr: &str) -> PuResult<Units> {
        Ok(self.parse_expression(expr)?.units())
    }

    pub fn parse_expression(&self, expr: &str) -> PuResult<UnitExpression> {
        let cleaned: String = expr
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == '·' { '*' } else { c })
            .collect();
        if cleaned.is_empty() {
            return Err(malformed(expr, "empty expression"));
        }

        let mut terms = Vec::new();
        let mut op = Combine::Multiply;
        let mut start = 0;
        for (i, c) in cleaned.char_indices() {
            let next = match c {
                '*' => Combine::Multiply,
                '/' => Combine::Divide,
                _ => continue,
            };
            terms.push(self.parse_term(&cleaned[start..i], op, expr)?);
            op = next;
            start = i + c.len_utf8();
        }
        terms.push(self.parse_term(&cleaned[start..], op, expr)?);

        let units = fold_units(&terms)?;
        Ok(UnitExpression { terms, units })
    }

    fn parse_term(&self, text: &str, op: Combine, expr: &str) -> PuResult<Term> {
        if text.is_empty() {
            return Err(malformed(expr, "dangling operator or empty term"));
        }

        let mut parts = text.split('^');
        let symbol = parts.next().unwrap_or_default();
        if symbol.is_empty() {
            return Err(malformed(expr, "exponent without a unit symbol"));
        }
        let raw_exponents: Vec<&str> = parts.collect();
        let exponent = parse_exponent(&raw_exponents, expr)?;

        let (prefix, units) = self.resolve_symbol(symbol)?;
        if units.checked_power(exponent).is_none() {
            return Err(PuError::MalformedExponent {
                exponent: raw_exponents.join("^"),
            });
        }
        tracing::trace!(symbol, prefix = prefix.symbol(), exponent, "resolved unit term");
        Ok(Term {
            op,
            symbol: symbol.to_string(),
            prefix,
            units,
            exponent,
        })
    }

    /// Resolve a bare symbol: `1`, then an exact composite/base symbol, then
    /// the longest registered prefix followed by an exact symbol.
    pub fn resolve_symbol(&self, symbol: &str) -> PuResult<(Prefix, Units)> {
        if symbol == "1" {
            return Ok((Prefix::unscaled(), Units::DIMENSIONLESS));
        }
        if let Some(units) = lookup_symbol(symbol) {
            return Ok((Prefix::unscaled(), units));
        }
        self.registry
            .strip_candidates(symbol)
            .into_iter()
            .find_map(|(prefix, rest)| lookup_symbol(rest).map(|units| (prefix.clone(), units)))
            .ok_or_else(|| PuError::UnknownUnitSymbol {
                symbol: symbol.to_string(),
            })
    }
}

/// Left fold from dimensionless. An exponent pushed out of the `i32` range by
/// the accumulation is reported against the term that overflowed.
fn fold_units(terms: &[Term]) -> PuResult<Units> {
    terms.iter().try_fold(Units::DIMENSIONLESS, |acc, term| {
        term.powered_units()
            .and_then(|powered| acc.checked_combine(powered, term.op))
            .ok_or_else(|| PuError::MalformedExponent {
                exponent: format!("{}^{}", term.symbol, term.exponent),
            })
    })
}

/// `^` chains are right-associative: `m^2^3` is `m^(2^3)`.
fn parse_exponent(raw: &[&str], expr: &str) -> PuResult<i32> {
    if raw.iter().any(|s| s.is_empty()) {
        return Err(malformed(expr, "'^' without an exponent"));
    }
    let bad = || PuError::MalformedExponent {
        exponent: raw.join("^"),
    };

    let mut values = Vec::with_capacity(raw.len());
    for s in raw {
        values.push(s.parse::<i32>().map_err(|_| bad())?);
    }

    let Some((&last, rest)) = values.split_last() else {
        return Ok(1);
    };
    rest.iter().rev().try_fold(last, |acc, &base| {
        let power = u32::try_from(acc).map_err(|_| bad())?;
        base.checked_pow(power).ok_or_else(bad)
    })
}

fn malformed(expr: &str, what: &'static str) -> PuError {
    PuError::MalformedExpression {
        expr: expr.to_string(),
        what,
    }
}

/// Parse against the standard prefix registry.
pub fn parse_units(expr: &str) -> PuResult<Units> {
    UnitParser::default().parse(expr)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn display_name_parses_back(exps in prop::array::uniform7(-4i32..=4)) {
            let units = Units::from_exponents(exps);
            prop_assume!(!units.is_dimensionless());
            prop_assert_eq!(parse_units(&units.display_name()).unwrap(), units);
        }

        #[test]
        fn parsing_is_deterministic(idx in 0usize..8) {
            let exprs = ["N*m", "kg*m^2/s^3", "m/s/s", "kmol/s", "V·A", "Ω*S", "Wb/m^2", "1/Hz"];
            prop_assert_eq!(parse_units(exprs[idx]), parse_units(exprs[idx]));
        }
    }
}
