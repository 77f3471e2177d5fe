//! Column-level results schema derived from the metadata table.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::classify::QuestionCategory;
use crate::metadata::MetadataTable;

use super::types::{Check, ValueType};

/// Fixed platform metadata columns, present in every survey.
pub const PLATFORM_COLUMNS: &[(&str, ValueType)] = &[
    ("id", ValueType::Integer),
    ("completed", ValueType::Boolean),
    ("finished", ValueType::Boolean),
    ("duration", ValueType::Float),
    ("quote", ValueType::String),
    ("start", ValueType::DateTime),
    ("end", ValueType::DateTime),
    ("runtime", ValueType::String),
    ("pagetime1", ValueType::Integer),
    ("pagetime2", ValueType::Integer),
    ("pagetime3", ValueType::Integer),
    ("date", ValueType::Date),
];

/// Casting and validation rules for one results column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRule {
    /// Column name (the renamed variable id or a platform column name).
    pub name: String,
    /// Declared value type.
    pub value_type: ValueType,
    /// Checks applied after casting.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub checks: Vec<Check>,
    /// Code-to-label decoding map for single-choice columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codebook: Option<IndexMap<String, String>>,
}

impl ColumnRule {
    fn plain(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            checks: Vec::new(),
            codebook: None,
        }
    }
}

/// The full column schema for one survey's results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsSchema {
    columns: IndexMap<String, ColumnRule>,
}

impl ResultsSchema {
    /// Derive the schema from the (renamed) metadata table.
    ///
    /// Platform columns come first, then one rule per variable in table
    /// order. Single-choice columns get an enumeration check over their
    /// deduplicated label domain; scale and matrix columns get a range check
    /// when at least one end is present.
    pub fn build(metadata: &MetadataTable) -> Self {
        let mut columns = IndexMap::new();
        for (name, value_type) in PLATFORM_COLUMNS {
            columns.insert(name.to_string(), ColumnRule::plain(*name, *value_type));
        }

        for row in metadata.rows() {
            let mut rule = ColumnRule::plain(row.id.clone(), row.descriptor.value_type);
            match row.descriptor.question_type {
                QuestionCategory::SingleChoice => {
                    if let Some(values) = &row.descriptor.possible_values {
                        let domain = label_domain(values);
                        if !domain.is_empty() {
                            rule.checks.push(Check::IsIn { values: domain });
                        }
                        rule.codebook = Some(values.clone());
                    }
                }
                QuestionCategory::Scale | QuestionCategory::Matrix => {
                    if let Some(check) =
                        Check::range(row.descriptor.range_min, row.descriptor.range_max)
                    {
                        rule.checks.push(check);
                    }
                }
                _ => {}
            }
            columns.insert(rule.name.clone(), rule);
        }

        Self { columns }
    }

    /// Rule for one column, if declared.
    pub fn column(&self, name: &str) -> Option<&ColumnRule> {
        self.columns.get(name)
    }

    /// All rules in declaration order.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnRule> {
        self.columns.values()
    }

    /// Number of declared columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True if no columns are declared.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Deduplicated labels in declaration order.
fn label_domain(values: &IndexMap<String, String>) -> Vec<String> {
    let mut domain: Vec<String> = Vec::new();
    for label in values.values() {
        if !label.is_empty() && !domain.contains(label) {
            domain.push(label.clone());
        }
    }
    domain
}
