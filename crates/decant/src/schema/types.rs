//! Value types and column checks.

use serde::{Deserialize, Serialize};

/// Declared value type of a results column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Whole numbers.
    Integer,
    /// Floating-point numbers.
    Float,
    /// Text values (including decoded choice labels).
    String,
    /// Boolean values ("1"/"0" on the wire).
    Boolean,
    /// Date and time, `%Y-%m-%d %H:%M:%S` on the wire.
    DateTime,
    /// Date only, `%Y-%m-%d` on the wire.
    Date,
}

impl ValueType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueType::Integer | ValueType::Float)
    }

    /// Stable lowercase label used in persistence and documentation.
    pub fn label(&self) -> &'static str {
        match self {
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::Boolean => "boolean",
            ValueType::DateTime => "datetime",
            ValueType::Date => "date",
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A validation check applied to cast values of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Check {
    /// Value must be one of the listed strings.
    IsIn { values: Vec<String> },
    /// Numeric value must fall within the (half-open where an end is
    /// missing) range.
    Range { min: Option<f64>, max: Option<f64> },
}

impl Check {
    /// Build a range check, returning `None` when both ends are absent.
    pub fn range(min: Option<f64>, max: Option<f64>) -> Option<Self> {
        if min.is_none() && max.is_none() {
            None
        } else {
            Some(Check::Range { min, max })
        }
    }
}
