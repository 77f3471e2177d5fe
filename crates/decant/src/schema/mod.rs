//! Column-level schema types and derivation.

mod builder;
mod types;

pub use builder::{ColumnRule, ResultsSchema, PLATFORM_COLUMNS};
pub use types::{Check, ValueType};
