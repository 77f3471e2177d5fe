//! Raw response table, all values as strings.

use std::io::Read;

use crate::error::{DecantError, Result};

/// A flat table of raw responses as fetched from the platform: one header
/// row of column names, every cell a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ResponseTable {
    /// Build a table, enforcing rectangular shape.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        for (index, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(DecantError::Store(format!(
                    "results row {} has {} cells, expected {}",
                    index,
                    row.len(),
                    headers.len()
                )));
            }
        }
        Ok(Self { headers, rows })
    }

    /// Parse a table from CSV text.
    pub fn from_csv(reader: impl Read) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = csv_reader
            .headers()?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Self::new(headers, rows)
    }

    /// Parse a table from a CSV string.
    pub fn from_csv_str(text: &str) -> Result<Self> {
        Self::from_csv(text.as_bytes())
    }

    /// Column names.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell value by row index and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|r| r[index].as_str())
    }

    /// Keep only rows satisfying the predicate. Use [`Self::column_index`]
    /// beforehand to address cells within the row slice.
    pub fn retain_rows<F>(&mut self, predicate: F)
    where
        F: FnMut(&[String]) -> bool,
    {
        let mut predicate = predicate;
        self.rows.retain(|row| predicate(row));
    }

    /// Drop the named columns; unknown names are ignored.
    pub fn drop_columns(&mut self, names: &[&str]) {
        let keep: Vec<usize> = (0..self.headers.len())
            .filter(|&i| !names.contains(&self.headers[i].as_str()))
            .collect();
        self.headers = keep.iter().map(|&i| self.headers[i].clone()).collect();
        for row in &mut self.rows {
            *row = keep.iter().map(|&i| row[i].clone()).collect();
        }
    }

    /// Rename one column.
    pub fn rename_column(&mut self, from: &str, to: &str) -> bool {
        match self.column_index(from) {
            Some(index) => {
                self.headers[index] = to.to_string();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_parsing() {
        let table = ResponseTable::from_csv_str("vID,V1,V2\n1,a,b\n2,c,d\n").unwrap();
        assert_eq!(table.headers(), &["vID", "V1", "V2"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(1, "V2"), Some("d"));
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let result = ResponseTable::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec!["1".to_string()]],
        );
        assert!(matches!(result, Err(DecantError::Store(_))));
    }

    #[test]
    fn test_drop_and_rename_columns() {
        let mut table = ResponseTable::from_csv_str("vID,vLANG,V1\n1,de,x\n").unwrap();
        table.drop_columns(&["vLANG", "missing"]);
        assert_eq!(table.headers(), &["vID", "V1"]);
        assert_eq!(table.rows()[0], vec!["1".to_string(), "x".to_string()]);

        assert!(table.rename_column("vID", "id"));
        assert!(!table.rename_column("gone", "x"));
        assert_eq!(table.get(0, "id"), Some("1"));
    }
}
