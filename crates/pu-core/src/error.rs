use thiserror::Error;

use crate::units::Units;

pub type PuResult<T> = Result<T, PuError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PuError {
    #[error("Unknown prefix: '{symbol}'")]
    UnknownPrefix { symbol: String },

    #[error("Invalid prefix '{symbol}': factor must be positive and finite (got {factor})")]
    InvalidPrefix { symbol: String, factor: f64 },

    #[error("Unknown unit symbol: '{symbol}'")]
    UnknownUnitSymbol { symbol: String },

    #[error("Malformed unit expression '{expr}': {what}")]
    MalformedExpression { expr: String, what: &'static str },

    #[error("Malformed exponent '{exponent}' in unit expression")]
    MalformedExponent { exponent: String },

    #[error("Dimension mismatch in {op}: '{left}' vs '{right}'")]
    DimensionMismatch {
        op: &'static str,
        left: Units,
        right: Units,
    },

    #[error("Division by zero in {what}")]
    DivisionByZero { what: &'static str },

    #[error("Cannot raise negative magnitude {base} to fractional power {exponent}")]
    NegativeBaseFractionalPower { base: f64, exponent: f64 },

    #[error("Power {exponent} leaves non-integral dimension exponents for '{units}'")]
    NonIntegralDimension { units: Units, exponent: f64 },

    #[error("Dimension exponent overflow in {op} of '{units}'")]
    ExponentOverflow { op: &'static str, units: Units },

    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Could not parse quantity from '{input}'")]
    InvalidQuantity { input: String },

    /// Reserved for physics helpers layered on top of the engine.
    #[error("Invalid domain: {what}")]
    InvalidDomain { what: String },
}
