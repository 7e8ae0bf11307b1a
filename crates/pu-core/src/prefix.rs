//! Scale prefixes and the prefix registry.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use crate::error::{PuError, PuResult};

/// A named multiplicative scale factor (`k` = 1e3).
///
/// Equality and hashing cover both the symbol and the factor, so a custom
/// prefix reusing a standard symbol with a different factor stays distinct.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawPrefix"))]
pub struct Prefix {
    symbol: String,
    factor: f64,
}

impl Prefix {
    /// Build a prefix; the factor must be positive and finite.
    pub fn new(symbol: impl Into<String>, factor: f64) -> PuResult<Self> {
        let symbol = symbol.into();
        if !(factor > 0.0 && factor.is_finite()) {
            return Err(PuError::InvalidPrefix { symbol, factor });
        }
        Ok(Self { symbol, factor })
    }

    /// The empty prefix (factor 1).
    pub fn unscaled() -> Self {
        Self {
            symbol: String::new(),
            factor: 1.0,
        }
    }

    fn standard(symbol: &str, factor: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            factor,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn is_unscaled(&self) -> bool {
        self.symbol.is_empty() && self.factor == 1.0
    }
}

// factor is validated positive and finite, so equality is reflexive
impl Eq for Prefix {}

impl Hash for Prefix {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
        self.factor.to_bits().hash(state);
    }
}

impl Default for Prefix {
    fn default() -> Self {
        Self::unscaled()
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawPrefix {
    symbol: String,
    factor: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawPrefix> for Prefix {
    type Error = PuError;

    fn try_from(raw: RawPrefix) -> PuResult<Self> {
        Prefix::new(raw.symbol, raw.factor)
    }
}

/// Standard SI prefixes registered by [`PrefixRegistry::standard`].
pub const SI_PREFIXES: [(&str, f64); 25] = [
    ("q", 1e-30),
    ("r", 1e-27),
    ("y", 1e-24),
    ("z", 1e-21),
    ("a", 1e-18),
    ("f", 1e-15),
    ("p", 1e-12),
    ("n", 1e-9),
    ("µ", 1e-6),
    ("m", 1e-3),
    ("c", 1e-2),
    ("d", 1e-1),
    ("", 1.0),
    ("da", 1e1),
    ("h", 1e2),
    ("k", 1e3),
    ("M", 1e6),
    ("G", 1e9),
    ("T", 1e12),
    ("P", 1e15),
    ("E", 1e18),
    ("Z", 1e21),
    ("Y", 1e24),
    ("R", 1e27),
    ("Q", 1e30),
];

/// Alternate spellings of micro: ASCII `u` and GREEK SMALL LETTER MU.
const MICRO_ALIASES: [&str; 2] = ["u", "\u{03bc}"];

/// Symbol → prefix table.
///
/// Owned and explicitly constructed; customise a registry with
/// [`register`](Self::register) before handing it to a parser or conversion.
#[derive(Debug, Clone, Default)]
pub struct PrefixRegistry {
    entries: HashMap<String, Prefix>,
    aliases: HashMap<String, String>,
}

static STANDARD: LazyLock<PrefixRegistry> = LazyLock::new(PrefixRegistry::standard);

impl PrefixRegistry {
    /// A registry with no prefixes at all, not even the empty one.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The standard SI set, `q` (1e-30) through `Q` (1e30).
    pub fn standard() -> Self {
        let entries = SI_PREFIXES
            .iter()
            .map(|&(symbol, factor)| (symbol.to_string(), Prefix::standard(symbol, factor)))
            .collect();
        let aliases = MICRO_ALIASES
            .iter()
            .map(|alias| (alias.to_string(), "µ".to_string()))
            .collect();
        Self { entries, aliases }
    }

    /// Shared read-only standard registry.
    pub fn global() -> &'static PrefixRegistry {
        &STANDARD
    }

    /// Insert or overwrite a prefix.
    pub fn register(&mut self, symbol: impl Into<String>, factor: f64) -> PuResult<()> {
        let prefix = Prefix::new(symbol, factor)?;
        tracing::debug!(symbol = prefix.symbol(), factor, "registered prefix");
        self.entries.insert(prefix.symbol.clone(), prefix);
        Ok(())
    }

    pub fn get(&self, symbol: &str) -> Option<&Prefix> {
        self.entries.get(symbol).or_else(|| {
            self.aliases
                .get(symbol)
                .and_then(|target| self.entries.get(target))
        })
    }

    pub fn lookup(&self, symbol: &str) -> PuResult<Prefix> {
        self.get(symbol)
            .cloned()
            .ok_or_else(|| PuError::UnknownPrefix {
                symbol: symbol.to_string(),
            })
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.get(symbol).is_some()
    }

    /// Registered prefixes ordered by factor.
    pub fn iter(&self) -> impl Iterator<Item = &Prefix> {
        let mut all: Vec<&Prefix> = self.entries.values().collect();
        all.sort_by(|a, b| a.factor.total_cmp(&b.factor).then(a.symbol.cmp(&b.symbol)));
        all.into_iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Non-empty prefixes that `token` starts with (aliases included), longest
    /// symbol first, paired with the remainder of the token.
    pub fn strip_candidates<'t>(&self, token: &'t str) -> Vec<(&Prefix, &'t str)> {
        let keys = self.entries.keys().chain(self.aliases.keys());
        let mut out: Vec<(usize, &Prefix, &'t str)> = keys
            .filter(|key| !key.is_empty() && key.len() < token.len())
            .filter_map(|key| {
                let rest = token.strip_prefix(key.as_str())?;
                Some((key.len(), self.get(key)?, rest))
            })
            .collect();
        out.sort_by(|a, b| b.0.cmp(&a.0));
        out.into_iter().map(|(_, p, rest)| (p, rest)).collect()
    }

    /// Registered prefix whose factor matches `factor` to a relative 1e-9,
    /// preferring the standard ladder symbols.
    pub fn find_by_factor(&self, factor: f64) -> Option<&Prefix> {
        let matches = |p: &&Prefix| crate::numeric::nearly_equal_rel(p.factor, factor, 1e-9);
        SI_PREFIXES
            .iter()
            .filter_map(|(symbol, _)| self.entries.get(*symbol))
            .find(matches)
            .or_else(|| self.iter().find(matches))
    }
}

/// Engineering ladder used for best-prefix selection, with one sentinel step
/// beyond each end (1e-15 and 1e18) that never gets selected.
const LADDER: [(&str, f64); 12] = [
    ("", 1e-15),
    ("p", 1e-12),
    ("n", 1e-9),
    ("µ", 1e-6),
    ("m", 1e-3),
    ("", 1.0),
    ("k", 1e3),
    ("M", 1e6),
    ("G", 1e9),
    ("T", 1e12),
    ("P", 1e15),
    ("", 1e18),
];
const LADDER_UNSCALED: i32 = 5;
const LADDER_LAST: i32 = LADDER.len() as i32 - 1;

/// Which prefixes best-prefix selection may choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ladder {
    /// Powers of 1000 from `p` to `P`, mantissa in `[1, 1000)`.
    #[default]
    Engineering,
    /// Every single SI prefix from `p` to `P`, `c d da h` included, mantissa
    /// in `[1, 10)`. Decades with no prefix of their own (1e4, 1e-5, ...) fall
    /// back to the engineering choice.
    Tenths,
}

/// Decade exponents that have a prefix of their own in the tenths ladder.
const TENTHS: [(&str, i32, f64); 14] = [
    ("p", -12, 1e-12),
    ("n", -9, 1e-9),
    ("µ", -6, 1e-6),
    ("m", -3, 1e-3),
    ("c", -2, 1e-2),
    ("d", -1, 1e-1),
    ("", 0, 1.0),
    ("da", 1, 1e1),
    ("h", 2, 1e2),
    ("k", 3, 1e3),
    ("M", 6, 1e6),
    ("G", 9, 1e9),
    ("T", 12, 1e12),
    ("P", 15, 1e15),
];

/// [`best_prefix`] on the chosen ladder.
pub fn best_prefix_with(magnitude: f64, ladder: Ladder) -> Prefix {
    match ladder {
        Ladder::Engineering => best_prefix(magnitude),
        Ladder::Tenths => tenths_prefix(magnitude).unwrap_or_else(|| best_prefix(magnitude)),
    }
}

fn tenths_prefix(magnitude: f64) -> Option<Prefix> {
    let abs = magnitude.abs();
    if abs == 0.0 || !abs.is_finite() {
        return None;
    }
    let mut decade = abs.log10().floor();
    if !(-13.0..=16.0).contains(&decade) {
        return None;
    }
    if abs / 10f64.powf(decade + 1.0) >= 1.0 {
        decade += 1.0;
    } else if abs / 10f64.powf(decade) < 1.0 {
        decade -= 1.0;
    }
    let decade = decade as i32;
    let &(symbol, _, factor) = TENTHS.iter().find(|(_, exp, _)| *exp == decade)?;
    tracing::trace!(magnitude, prefix = symbol, "best tenths prefix");
    Some(Prefix::standard(symbol, factor))
}

/// Prefix that brings `|magnitude| / factor` into `[1, 1000)`.
///
/// Closed-form index from `log10`, with one correction step for rounding at
/// exact powers of ten. Zero, non-finite and out-of-range magnitudes (outside
/// `p`..`P`) get the unscaled prefix.
pub fn best_prefix(magnitude: f64) -> Prefix {
    let abs = magnitude.abs();
    if abs == 0.0 || !abs.is_finite() {
        return Prefix::unscaled();
    }

    let step = (abs.log10() / 3.0).floor();
    if !(-6.0..=7.0).contains(&step) {
        return Prefix::unscaled();
    }
    let mut idx = step as i32 + LADDER_UNSCALED;
    if (0..=LADDER_LAST).contains(&idx) {
        let i = idx as usize;
        if idx < LADDER_LAST && abs / LADDER[i + 1].1 >= 1.0 {
            idx += 1;
        } else if idx > 0 && abs / LADDER[i].1 < 1.0 {
            idx -= 1;
        }
    }

    if idx <= 0 || idx >= LADDER_LAST {
        tracing::trace!(magnitude, "magnitude outside prefix ladder");
        return Prefix::unscaled();
    }
    let (symbol, factor) = LADDER[idx as usize];
    tracing::trace!(magnitude, prefix = symbol, "best prefix");
    Prefix::standard(symbol, factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_lookup() {
        let reg = PrefixRegistry::standard();
        assert_eq!(reg.lookup("k").unwrap().factor(), 1e3);
        assert_eq!(reg.lookup("da").unwrap().factor(), 1e1);
        assert_eq!(reg.lookup("").unwrap(), Prefix::unscaled());
        assert_eq!(reg.len(), SI_PREFIXES.len());
    }

    #[test]
    fn unknown_prefix_fails() {
        let reg = PrefixRegistry::standard();
        assert_eq!(
            reg.lookup("Ki"),
            Err(PuError::UnknownPrefix {
                symbol: "Ki".into()
            })
        );
    }

    #[test]
    fn micro_aliases_resolve_to_micro() {
        let reg = PrefixRegistry::standard();
        assert_eq!(reg.lookup("u").unwrap().symbol(), "µ");
        assert_eq!(reg.lookup("\u{03bc}").unwrap().symbol(), "µ");
    }

    #[test]
    fn register_custom_and_overwrite() {
        let mut reg = PrefixRegistry::standard();
        reg.register("Ki", 1024.0).unwrap();
        assert_eq!(reg.lookup("Ki").unwrap().factor(), 1024.0);

        reg.register("k", 1024.0).unwrap();
        assert_eq!(reg.lookup("k").unwrap().factor(), 1024.0);
        // other registries are unaffected
        assert_eq!(PrefixRegistry::global().lookup("k").unwrap().factor(), 1e3);
    }

    #[test]
    fn register_rejects_bad_factor() {
        let mut reg = PrefixRegistry::empty();
        for factor in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                reg.register("x", factor),
                Err(PuError::InvalidPrefix { .. })
            ));
        }
        assert!(reg.is_empty());
    }

    #[test]
    fn equality_is_by_value() {
        let a = Prefix::new("k", 1e3).unwrap();
        let b = Prefix::new("k", 1024.0).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, PrefixRegistry::global().lookup("k").unwrap());
    }

    #[test]
    fn strip_prefers_longest() {
        let reg = PrefixRegistry::standard();
        let candidates = reg.strip_candidates("dam");
        assert_eq!(candidates[0].0.symbol(), "da");
        assert_eq!(candidates[0].1, "m");
        assert_eq!(candidates[1].0.symbol(), "d");
        assert_eq!(candidates[1].1, "am");
        // a prefix alone is never a candidate
        assert!(reg.strip_candidates("k").is_empty());
    }

    #[test]
    fn iter_is_sorted_by_factor() {
        let reg = PrefixRegistry::standard();
        let symbols: Vec<&str> = reg.iter().map(Prefix::symbol).collect();
        assert_eq!(symbols.first(), Some(&"q"));
        assert_eq!(symbols.last(), Some(&"Q"));
    }

    #[test]
    fn extended_si_prefixes() {
        let reg = PrefixRegistry::standard();
        assert_eq!(reg.lookup("E").unwrap().factor(), 1e18);
        assert_eq!(reg.lookup("a").unwrap().factor(), 1e-18);
        assert_eq!(reg.lookup("Q").unwrap().factor(), 1e30);
        assert_eq!(reg.lookup("q").unwrap().factor(), 1e-30);
        assert_eq!(reg.find_by_factor(1e21).unwrap().symbol(), "Z");
        assert_eq!(reg.find_by_factor(1e-24).unwrap().symbol(), "y");
    }

    #[test]
    fn find_by_factor_prefers_standard() {
        let mut reg = PrefixRegistry::standard();
        reg.register("kilo", 1e3).unwrap();
        assert_eq!(reg.find_by_factor(1e3).unwrap().symbol(), "k");
        assert_eq!(reg.find_by_factor(1e-3 * 1e-3).unwrap().symbol(), "µ");
        assert!(reg.find_by_factor(1e4).is_none());
    }

    #[test]
    fn best_prefix_boundaries() {
        assert_eq!(best_prefix(1000.0).symbol(), "k");
        assert_eq!(best_prefix(999.0).symbol(), "");
        assert_eq!(best_prefix(1.0).symbol(), "");
        assert_eq!(best_prefix(0.999).symbol(), "m");
        assert_eq!(best_prefix(-2.5e7).symbol(), "M");
        assert_eq!(best_prefix(3.2e-4).symbol(), "µ");
        assert_eq!(best_prefix(1e-12).symbol(), "p");
        assert_eq!(best_prefix(5e15).symbol(), "P");
    }

    #[test]
    fn best_prefix_falls_back_to_unscaled() {
        assert!(best_prefix(0.0).is_unscaled());
        assert!(best_prefix(f64::NAN).is_unscaled());
        assert!(best_prefix(1e18).is_unscaled());
        assert!(best_prefix(1e-13).is_unscaled());
        assert!(best_prefix(1e300).is_unscaled());
        assert!(best_prefix(1e-300).is_unscaled());
        // registered but never chosen automatically
        assert!(best_prefix(5e18).is_unscaled());
        assert!(best_prefix(5e-18).is_unscaled());
    }

    #[test]
    fn tenths_ladder() {
        let pick = |m| best_prefix_with(m, Ladder::Tenths).symbol().to_string();
        assert_eq!(pick(0.032), "c");
        assert_eq!(pick(0.5), "d");
        assert_eq!(pick(1.0), "");
        assert_eq!(pick(9.99), "");
        assert_eq!(pick(10.0), "da");
        assert_eq!(pick(-250.0), "h");
        assert_eq!(pick(1000.0), "k");
        assert_eq!(pick(3e-9), "n");
        // no prefix for 1e4 or 1e-5; engineering choice instead
        assert_eq!(pick(2e4), "k");
        assert_eq!(pick(2e-5), "µ");
        assert!(best_prefix_with(0.0, Ladder::Tenths).is_unscaled());
        assert!(best_prefix_with(1e20, Ladder::Tenths).is_unscaled());
    }

    #[test]
    fn engineering_is_the_default_ladder() {
        assert_eq!(Ladder::default(), Ladder::Engineering);
        assert_eq!(best_prefix_with(0.032, Ladder::default()).symbol(), "m");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn best_prefix_mantissa_in_window(exp in -11.9f64..17.9, sign in prop::bool::ANY) {
            let magnitude = if sign { 10f64.powf(exp) } else { -(10f64.powf(exp)) };
            let prefix = best_prefix(magnitude);
            let mantissa = magnitude.abs() / prefix.factor();
            if magnitude.abs() >= 1e18 {
                prop_assert!(prefix.is_unscaled());
            } else {
                prop_assert!((1.0..1000.0).contains(&mantissa), "mantissa {}", mantissa);
            }
        }
    }
}
