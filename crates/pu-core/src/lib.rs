//! pu-core: dimensional analysis engine for physunits.
//!
//! Contains:
//! - units (SI dimension vectors + composite symbol table)
//! - prefix (scale prefixes, registry, best-prefix selection)
//! - parse (unit expression parser)
//! - quantity (dimension-checked arithmetic)
//! - constants (physical constants as quantities)
//! - numeric (tolerances + float helpers)
//! - error (shared error type)

pub mod constants;
pub mod error;
pub mod numeric;
pub mod parse;
pub mod prefix;
pub mod quantity;
pub mod units;

pub use error::{PuError, PuResult};
pub use numeric::{Tolerances, nearly_equal};
pub use parse::{Term, UnitExpression, UnitParser, parse_units};
pub use prefix::{Ladder, Prefix, PrefixRegistry, SI_PREFIXES, best_prefix, best_prefix_with};
pub use quantity::Quantity;
pub use units::{COMPOSITE_UNITS, Combine, CompositeUnit, Dimension, Units};
