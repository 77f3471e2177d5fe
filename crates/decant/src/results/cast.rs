//! Strict casting and decoding of prepared response rows.

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{DecantError, Result};
use crate::schema::{Check, ColumnRule, ResultsSchema, ValueType};

use super::table::ResponseTable;

/// Wire formats of the platform's temporal columns.
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// One typed cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Absent or undecodable-but-tolerated value.
    Null,
    /// Boolean answer.
    Bool(bool),
    /// Integer answer (also the load counter).
    Int(i64),
    /// Floating-point answer.
    Float(f64),
    /// Date value.
    Date(NaiveDate),
    /// Date-and-time value.
    DateTime(NaiveDateTime),
    /// Text answer or decoded choice label.
    Text(String),
}

impl CellValue {
    /// True for [`CellValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Numeric view for range checks.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(v) => Some(*v as f64),
            CellValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Render the value back into its wire format.
    ///
    /// For every non-null value, casting the rendered string with the same
    /// rules reproduces the value.
    pub fn render(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(true) => "1".to_string(),
            CellValue::Bool(false) => "0".to_string(),
            CellValue::Int(v) => v.to_string(),
            CellValue::Float(v) => v.to_string(),
            CellValue::Date(v) => v.format(DATE_FORMAT).to_string(),
            CellValue::DateTime(v) => v.format(DATETIME_FORMAT).to_string(),
            CellValue::Text(v) => v.clone(),
        }
    }
}

/// A fully cast results table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedTable {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl TypedTable {
    /// Column names.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Typed rows.
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell by row index and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&CellValue> {
        let index = self.headers.iter().position(|h| h == column)?;
        self.rows.get(row).map(|r| &r[index])
    }

    /// Append the load counter as an integer column on every row.
    pub fn stamp_load_counter(&mut self, load_counter: u64) {
        self.headers.push("load_counter".to_string());
        for row in &mut self.rows {
            row.push(CellValue::Int(load_counter as i64));
        }
    }

    /// Rows as ordered name-to-value records, the store's persistence shape.
    pub fn to_records(&self) -> Vec<IndexMap<String, CellValue>> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }
}

/// Cast every cell of a prepared table against the schema and run the
/// declared checks.
///
/// Parse failures and check violations are hard errors carrying the column
/// and row; nothing is skipped or clamped.
pub fn cast(table: &ResponseTable, schema: &ResultsSchema) -> Result<TypedTable> {
    let mut rules: Vec<&ColumnRule> = Vec::with_capacity(table.headers().len());
    for header in table.headers() {
        let rule = schema.column(header).ok_or_else(|| {
            DecantError::Store(format!("no schema rule for results column '{}'", header))
        })?;
        rules.push(rule);
    }

    let mut rows = Vec::with_capacity(table.len());
    for (row_index, raw_row) in table.rows().iter().enumerate() {
        let mut row = Vec::with_capacity(raw_row.len());
        for (raw, rule) in raw_row.iter().zip(&rules) {
            let value = cast_cell(raw, rule, row_index)?;
            run_checks(&value, rule, row_index)?;
            row.push(value);
        }
        rows.push(row);
    }

    Ok(TypedTable {
        headers: table.headers().to_vec(),
        rows,
    })
}

fn cast_cell(raw: &str, rule: &ColumnRule, row: usize) -> Result<CellValue> {
    let trimmed = raw.trim();

    // Coded single-choice answers decode through the codebook; blank and
    // unmapped codes stay null.
    if let Some(codebook) = &rule.codebook {
        if trimmed.is_empty() {
            return Ok(CellValue::Null);
        }
        return Ok(match codebook.get(trimmed) {
            Some(label) => CellValue::Text(label.clone()),
            None => CellValue::Null,
        });
    }

    match rule.value_type {
        ValueType::Boolean => Ok(match trimmed {
            "1" => CellValue::Bool(true),
            "0" | "" => CellValue::Bool(false),
            _ => CellValue::Null,
        }),
        ValueType::Integer => {
            if trimmed.is_empty() {
                return Ok(CellValue::Null);
            }
            trimmed
                .parse::<i64>()
                .map(CellValue::Int)
                .map_err(|_| cast_error(rule, row, raw, "not an integer"))
        }
        ValueType::Float => {
            if trimmed.is_empty() {
                return Ok(CellValue::Null);
            }
            trimmed
                .parse::<f64>()
                .map(CellValue::Float)
                .map_err(|_| cast_error(rule, row, raw, "not a number"))
        }
        ValueType::DateTime => {
            if trimmed.is_empty() {
                return Ok(CellValue::Null);
            }
            NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT)
                .map(CellValue::DateTime)
                .map_err(|_| cast_error(rule, row, raw, "not a datetime"))
        }
        ValueType::Date => {
            if trimmed.is_empty() {
                return Ok(CellValue::Null);
            }
            NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
                .map(CellValue::Date)
                .map_err(|_| cast_error(rule, row, raw, "not a date"))
        }
        ValueType::String => {
            if raw.is_empty() {
                Ok(CellValue::Null)
            } else {
                Ok(CellValue::Text(raw.to_string()))
            }
        }
    }
}

fn run_checks(value: &CellValue, rule: &ColumnRule, row: usize) -> Result<()> {
    if value.is_null() {
        return Ok(());
    }
    for check in &rule.checks {
        match check {
            Check::IsIn { values } => {
                if let CellValue::Text(text) = value {
                    if !values.contains(text) {
                        return Err(DecantError::SchemaViolation {
                            column: rule.name.clone(),
                            row,
                            message: format!("'{}' is not in the enumeration", text),
                        });
                    }
                }
            }
            Check::Range { min, max } => {
                if let Some(number) = value.as_f64() {
                    let below = min.map(|m| number < m).unwrap_or(false);
                    let above = max.map(|m| number > m).unwrap_or(false);
                    if below || above {
                        return Err(DecantError::SchemaViolation {
                            column: rule.name.clone(),
                            row,
                            message: format!(
                                "{} is outside the range [{:?}, {:?}]",
                                number, min, max
                            ),
                        });
                    }
                }
            }
        }
    }
    Ok(())
}

fn cast_error(rule: &ColumnRule, row: usize, raw: &str, reason: &str) -> DecantError {
    DecantError::Cast {
        column: rule.name.clone(),
        row,
        message: format!("'{}' is {}", raw, reason),
    }
}
