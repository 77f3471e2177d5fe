//! Response preparation between raw CSV and casting.

use std::collections::HashSet;

use log::warn;

use crate::error::{DecantError, Result};
use crate::metadata::MetadataTable;

use super::table::ResponseTable;

/// Platform column renames applied after filtering.
const PLATFORM_RENAMES: &[(&str, &str)] = &[
    ("vID", "id"),
    ("vCOMPLETED", "completed"),
    ("vFINISHED", "finished"),
    ("vDURATION", "duration"),
    ("vQUOTE", "quote"),
    ("vSTART", "start"),
    ("vEND", "end"),
    ("vRUNTIME", "runtime"),
    ("vPAGETIME1", "pagetime1"),
    ("vPAGETIME2", "pagetime2"),
    ("vPAGETIME3", "pagetime3"),
    ("vDATE", "date"),
];

/// Platform columns dropped outright.
const DROPPED_COLUMNS: &[&str] = &["vANONYM", "vLANG"];

/// Prepare a raw response table for casting.
///
/// Drops incomplete submissions and all-blank answer rows, drops ignored
/// platform columns, renames the remaining platform columns, and renames
/// every answer column from its platform identifier to the semantic id from
/// the metadata table. An answer column without a metadata row, or a
/// metadata row without an answer column, is structural drift and fails.
pub fn prepare(mut table: ResponseTable, metadata: &MetadataTable) -> Result<ResponseTable> {
    check_answer_columns(&table, metadata)?;

    // Incomplete submissions are not loaded.
    let before = table.len();
    if let Some(completed) = table.column_index("vCOMPLETED") {
        table.retain_rows(|row| row[completed] != "0");
    }
    let incomplete = before - table.len();
    if incomplete > 0 {
        warn!("dropped {} incomplete submission(s)", incomplete);
    }

    // Rows that answered nothing carry no signal.
    let answer_indices: Vec<usize> = table
        .headers()
        .iter()
        .enumerate()
        .filter(|(_, h)| is_answer_column(h))
        .map(|(i, _)| i)
        .collect();
    let before = table.len();
    table.retain_rows(|row| answer_indices.iter().any(|&i| !row[i].trim().is_empty()));
    let blank = before - table.len();
    if blank > 0 {
        warn!("dropped {} all-blank row(s)", blank);
    }

    table.drop_columns(DROPPED_COLUMNS);

    for (from, to) in PLATFORM_RENAMES {
        if !table.rename_column(from, to) {
            return Err(DecantError::Store(format!(
                "results are missing the platform column '{}'",
                from
            )));
        }
    }

    for (original_id, id) in metadata.naming_map() {
        table.rename_column(&original_id, &id);
    }

    Ok(table)
}

/// The answer columns must match the metadata's platform identifiers
/// exactly, in both directions.
fn check_answer_columns(table: &ResponseTable, metadata: &MetadataTable) -> Result<()> {
    let in_results: HashSet<&str> = table
        .headers()
        .iter()
        .filter(|h| is_answer_column(h))
        .map(String::as_str)
        .collect();
    let in_metadata: HashSet<&str> = metadata
        .rows()
        .iter()
        .map(|row| row.descriptor.original_id.as_str())
        .collect();

    for column in &in_results {
        if !in_metadata.contains(column) {
            return Err(DecantError::Store(format!(
                "results column '{}' has no metadata row",
                column
            )));
        }
    }
    for column in &in_metadata {
        if !in_results.contains(column) {
            return Err(DecantError::Store(format!(
                "metadata variable '{}' is missing from the results",
                column
            )));
        }
    }
    Ok(())
}

/// True for substantive answer columns (platform variable identifiers).
fn is_answer_column(header: &str) -> bool {
    DROPPED_COLUMNS
        .iter()
        .chain(PLATFORM_RENAMES.iter().map(|(from, _)| from))
        .all(|known| *known != header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::QuestionCategory;
    use crate::metadata::{MetadataRow, VariableDescriptor};
    use crate::schema::ValueType;

    const CSV_HEADER: &str = "vID,vCOMPLETED,vFINISHED,vDURATION,vQUOTE,vSTART,vEND,vRUNTIME,vPAGETIME1,vPAGETIME2,vPAGETIME3,vDATE,vANONYM,vLANG,V1";

    fn metadata() -> MetadataTable {
        let descriptor = VariableDescriptor::new(
            1,
            0,
            "V1",
            1,
            QuestionCategory::Scale,
            ValueType::Integer,
        );
        MetadataTable::new(vec![MetadataRow {
            id: "Q1".to_string(),
            descriptor,
            question_text: "Frage?".to_string(),
            page: 1,
        }])
        .unwrap()
    }

    fn csv_row(completed: &str, answer: &str) -> String {
        format!(
            "7,{},1,12.5,q,2024-01-01 10:00:00,2024-01-01 10:05:00,r,1,2,3,2024-01-01,0,de,{}",
            completed, answer
        )
    }

    #[test]
    fn test_prepare_filters_and_renames() {
        let csv = format!(
            "{}\n{}\n{}\n{}\n",
            CSV_HEADER,
            csv_row("1", "5"),
            csv_row("0", "4"),
            csv_row("1", " "),
        );
        let table = ResponseTable::from_csv_str(&csv).unwrap();

        let prepared = prepare(table, &metadata()).unwrap();
        // Incomplete and all-blank rows are gone.
        assert_eq!(prepared.len(), 1);
        assert_eq!(prepared.get(0, "Q1"), Some("5"));
        assert_eq!(prepared.get(0, "completed"), Some("1"));
        assert!(prepared.column_index("vANONYM").is_none());
        assert!(prepared.column_index("vLANG").is_none());
        assert!(prepared.column_index("V1").is_none());
    }

    #[test]
    fn test_unknown_answer_column_is_drift() {
        let csv = format!("{},V99\n{},x\n", CSV_HEADER, csv_row("1", "5"));
        let table = ResponseTable::from_csv_str(&csv).unwrap();
        let err = prepare(table, &metadata()).unwrap_err();
        assert!(err.to_string().contains("V99"));
    }

    #[test]
    fn test_missing_answer_column_is_drift() {
        let csv = CSV_HEADER.replace(",V1", "");
        let table = ResponseTable::from_csv_str(&format!("{}\n", csv)).unwrap();
        let err = prepare(table, &metadata()).unwrap_err();
        assert!(err.to_string().contains("V1"));
    }
}
