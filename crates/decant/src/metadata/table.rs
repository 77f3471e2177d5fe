//! The variable-level metadata table.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::classify::QuestionCategory;
use crate::error::{DecantError, Result};

use super::descriptor::VariableDescriptor;

/// One row of the metadata table: a variable descriptor joined with its
/// question's text and page number.
///
/// `id` starts out equal to the platform identifier and is replaced by the
/// naming engine; `descriptor.original_id` keeps the platform identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRow {
    /// Variable identifier; semantic after renaming.
    pub id: String,
    #[serde(flatten)]
    pub descriptor: VariableDescriptor,
    /// German question text, joined in during assembly.
    pub question_text: String,
    /// 1-based page number in first-seen page order.
    pub page: i64,
}

/// Ordered collection of all variables of one survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataTable {
    rows: Vec<MetadataRow>,
}

impl MetadataTable {
    /// Build a table, enforcing that platform identifiers are unique.
    pub fn new(rows: Vec<MetadataRow>) -> Result<Self> {
        let mut seen: IndexMap<&str, i64> = IndexMap::new();
        for row in &rows {
            if let Some(first) = seen.insert(&row.descriptor.original_id, row.descriptor.question_id)
            {
                return Err(DecantError::MalformedQuestion {
                    question_id: row.descriptor.question_id,
                    message: format!(
                        "varname '{}' already used by question {}",
                        row.descriptor.original_id, first
                    ),
                });
            }
        }
        Ok(Self { rows })
    }

    /// All rows in survey order.
    pub fn rows(&self) -> &[MetadataRow] {
        &self.rows
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the survey produced no variables.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consume the table into its rows.
    pub fn into_rows(self) -> Vec<MetadataRow> {
        self.rows
    }

    /// Look up a row by its platform identifier.
    pub fn by_original_id(&self, original_id: &str) -> Option<&MetadataRow> {
        self.rows
            .iter()
            .find(|row| row.descriptor.original_id == original_id)
    }

    /// `(original_id, question_type)` pairs in table order, the identity the
    /// consistency gate compares across runs.
    pub fn consistency_pairs(&self) -> Vec<(String, QuestionCategory)> {
        self.rows
            .iter()
            .map(|row| {
                (
                    row.descriptor.original_id.clone(),
                    row.descriptor.question_type,
                )
            })
            .collect()
    }

    /// Mapping from platform identifier to current identifier, in order.
    pub fn naming_map(&self) -> IndexMap<String, String> {
        self.rows
            .iter()
            .map(|row| (row.descriptor.original_id.clone(), row.id.clone()))
            .collect()
    }
}
