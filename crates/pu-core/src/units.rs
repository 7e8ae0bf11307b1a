//! SI dimension vectors.
//!
//! A [`Units`] value is the 7-tuple of integer exponents over the SI base
//! dimensions. It carries no scale: prefixes live on [`crate::Quantity`].
//!
//! The composite table maps well-known vectors to a display symbol (`J`, `Pa`,
//! `Ω`, ...). It is presentation metadata and the parser's symbol table; it
//! never participates in arithmetic.

use std::fmt;

/// One of the seven SI base dimensions, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Length,
    Mass,
    Time,
    Current,
    Temperature,
    Amount,
    LuminousIntensity,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::Length,
        Dimension::Mass,
        Dimension::Time,
        Dimension::Current,
        Dimension::Temperature,
        Dimension::Amount,
        Dimension::LuminousIntensity,
    ];

    /// Base SI unit symbol for this dimension.
    pub const fn symbol(self) -> &'static str {
        match self {
            Dimension::Length => "m",
            Dimension::Mass => "kg",
            Dimension::Time => "s",
            Dimension::Current => "A",
            Dimension::Temperature => "K",
            Dimension::Amount => "mol",
            Dimension::LuminousIntensity => "cd",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length => write!(f, "length"),
            Self::Mass => write!(f, "mass"),
            Self::Time => write!(f, "time"),
            Self::Current => write!(f, "electric current"),
            Self::Temperature => write!(f, "temperature"),
            Self::Amount => write!(f, "amount of substance"),
            Self::LuminousIntensity => write!(f, "luminous intensity"),
        }
    }
}

/// How two dimension vectors are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combine {
    Multiply,
    Divide,
}

/// Exponents over the SI base dimensions (m, kg, s, A, K, mol, cd).
///
/// Immutable value type: every combinator returns a new `Units`. Equality and
/// hashing are structural over all seven exponents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Units {
    exponents: [i32; 7],
}

impl Units {
    /// The dimensionless vector.
    pub const DIMENSIONLESS: Units = Units::new();

    pub const fn new() -> Self {
        Self { exponents: [0; 7] }
    }

    /// Exponents in canonical order: length, mass, time, current,
    /// temperature, amount, luminous intensity.
    pub const fn from_exponents(exponents: [i32; 7]) -> Self {
        Self { exponents }
    }

    /// First power of a single base dimension.
    pub const fn base(dim: Dimension) -> Self {
        Self::new().with(dim, 1)
    }

    /// Returns a copy with the exponent for `dim` replaced.
    pub const fn with(self, dim: Dimension, exponent: i32) -> Self {
        let mut exponents = self.exponents;
        exponents[dim.index()] = exponent;
        Self { exponents }
    }

    pub const fn length(self, n: i32) -> Self {
        self.with(Dimension::Length, n)
    }

    pub const fn mass(self, n: i32) -> Self {
        self.with(Dimension::Mass, n)
    }

    pub const fn time(self, n: i32) -> Self {
        self.with(Dimension::Time, n)
    }

    pub const fn current(self, n: i32) -> Self {
        self.with(Dimension::Current, n)
    }

    pub const fn temperature(self, n: i32) -> Self {
        self.with(Dimension::Temperature, n)
    }

    pub const fn amount(self, n: i32) -> Self {
        self.with(Dimension::Amount, n)
    }

    pub const fn luminous_intensity(self, n: i32) -> Self {
        self.with(Dimension::LuminousIntensity, n)
    }

    pub const fn exponent(&self, dim: Dimension) -> i32 {
        self.exponents[dim.index()]
    }

    pub const fn exponents(&self) -> [i32; 7] {
        self.exponents
    }

    pub fn is_dimensionless(&self) -> bool {
        self.exponents.iter().all(|&e| e == 0)
    }

    /// Multiply adds exponents; divide subtracts `other` from `self`.
    /// `None` if any exponent leaves the `i32` range.
    pub fn checked_combine(self, other: Units, op: Combine) -> Option<Units> {
        let mut exponents = self.exponents;
        for (e, o) in exponents.iter_mut().zip(other.exponents) {
            *e = match op {
                Combine::Multiply => e.checked_add(o)?,
                Combine::Divide => e.checked_sub(o)?,
            };
        }
        Some(Units { exponents })
    }

    pub fn checked_mul(self, other: Units) -> Option<Units> {
        self.checked_combine(other, Combine::Multiply)
    }

    pub fn checked_div(self, other: Units) -> Option<Units> {
        self.checked_combine(other, Combine::Divide)
    }

    /// Raise to an integer power. Zero yields dimensionless, negative inverts;
    /// `None` on exponent overflow.
    pub fn checked_power(self, n: i32) -> Option<Units> {
        let mut exponents = self.exponents;
        for e in exponents.iter_mut() {
            *e = e.checked_mul(n)?;
        }
        Some(Units { exponents })
    }

    /// Raise to a real power, if every resulting exponent is an integer
    /// (e.g. the square root of `m^2`).
    pub fn try_powf(self, x: f64) -> Option<Units> {
        let mut exponents = [0; 7];
        for (out, e) in exponents.iter_mut().zip(self.exponents) {
            let scaled = e as f64 * x;
            let rounded = scaled.round();
            if !scaled.is_finite()
                || (scaled - rounded).abs() > 1e-9
                || rounded.abs() > i32::MAX as f64
            {
                return None;
            }
            *out = rounded as i32;
        }
        Some(Units { exponents })
    }

    /// Preferred composite symbol for this exact vector, if any.
    ///
    /// When several symbols share a vector (`cd`/`lm`) the highest display
    /// priority wins; ties keep table order.
    pub fn composite_symbol(&self) -> Option<&'static str> {
        let mut best: Option<&CompositeUnit> = None;
        for unit in COMPOSITE_UNITS.iter().filter(|u| u.units == *self) {
            if best.is_none_or(|b| unit.priority > b.priority) {
                best = Some(unit);
            }
        }
        best.map(|u| u.symbol)
    }

    /// Human-readable symbol: composite symbol on exact match, otherwise base
    /// symbols with `*`, `/` and `^`. Dimensionless renders as `""`.
    pub fn display_name(&self) -> String {
        if self.is_dimensionless() {
            return String::new();
        }
        if let Some(symbol) = self.composite_symbol() {
            return symbol.to_string();
        }

        let mut numerator = Vec::new();
        let mut denominator = Vec::new();
        for dim in Dimension::ALL {
            let e = self.exponent(dim);
            if e == 0 {
                continue;
            }
            let term = match e.unsigned_abs() {
                1 => dim.symbol().to_string(),
                n => format!("{}^{}", dim.symbol(), n),
            };
            if e > 0 {
                numerator.push(term);
            } else {
                denominator.push(term);
            }
        }

        let mut out = if numerator.is_empty() {
            "1".to_string()
        } else {
            numerator.join("*")
        };
        for term in denominator {
            out.push('/');
            out.push_str(&term);
        }
        out
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// A named coherent SI unit and its dimension vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeUnit {
    pub symbol: &'static str,
    pub name: &'static str,
    pub units: Units,
    /// Display preference among symbols sharing a vector (base 5, derived 4).
    pub priority: u8,
}

const fn base(symbol: &'static str, name: &'static str, dim: Dimension) -> CompositeUnit {
    CompositeUnit {
        symbol,
        name,
        units: Units::base(dim),
        priority: 5,
    }
}

const fn derived(symbol: &'static str, name: &'static str, units: Units) -> CompositeUnit {
    CompositeUnit {
        symbol,
        name,
        units,
        priority: 4,
    }
}

const U: Units = Units::new();

/// Base and coherent derived SI units.
pub static COMPOSITE_UNITS: &[CompositeUnit] = &[
    base("m", "metre", Dimension::Length),
    base("kg", "kilogram", Dimension::Mass),
    base("s", "second", Dimension::Time),
    base("A", "ampere", Dimension::Current),
    base("K", "kelvin", Dimension::Temperature),
    base("mol", "mole", Dimension::Amount),
    base("cd", "candela", Dimension::LuminousIntensity),
    derived("N", "newton", U.mass(1).length(1).time(-2)),
    derived("J", "joule", U.mass(1).length(2).time(-2)),
    derived("W", "watt", U.mass(1).length(2).time(-3)),
    derived("Pa", "pascal", U.mass(1).length(-1).time(-2)),
    derived("C", "coulomb", U.time(1).current(1)),
    derived("V", "volt", U.mass(1).length(2).time(-3).current(-1)),
    derived("F", "farad", U.mass(-1).length(-2).time(4).current(2)),
    derived("Ω", "ohm", U.mass(1).length(2).time(-3).current(-2)),
    derived("S", "siemens", U.mass(-1).length(-2).time(3).current(2)),
    derived("T", "tesla", U.mass(1).time(-2).current(-1)),
    derived("Wb", "weber", U.mass(1).length(2).time(-2).current(-1)),
    derived("H", "henry", U.mass(1).length(2).time(-2).current(-2)),
    derived("Hz", "hertz", U.time(-1)),
    derived("kat", "katal", U.amount(1).time(-1)),
    derived("lm", "lumen", U.luminous_intensity(1)),
    derived("lx", "lux", U.length(-2).luminous_intensity(1)),
];

/// Exact (unprefixed) symbol lookup against the composite table.
pub fn lookup_symbol(symbol: &str) -> Option<Units> {
    COMPOSITE_UNITS
        .iter()
        .find(|u| u.symbol == symbol)
        .map(|u| u.units)
}
