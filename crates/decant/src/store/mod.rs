//! JSON-file survey store.
//!
//! Layout: `<root>/poll_<survey_id>/metadata.json` holds the survey's
//! metadata, provenance and load counter; `results.json` accumulates the
//! typed rows of every load. Absence of a file is the distinguishable
//! "no prior data" condition, not an error. Writes go through a temp file
//! and an atomic rename so a crashed run never leaves a torn file.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{DecantError, Result};
use crate::gate::PriorMetadata;
use crate::metadata::{MetadataRow, MetadataTable};
use crate::results::{CellValue, TypedTable};

/// Where and what a metadata snapshot was fetched from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    /// Source label, typically the fetch URL.
    pub source: String,
    /// SHA-256 of the raw question payload.
    pub sha256: String,
    /// Fetch time, UTC.
    pub fetched_at: DateTime<Utc>,
}

impl Provenance {
    /// Record provenance for a payload fetched now.
    pub fn new(source: impl Into<String>, payload: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(payload);
        Self {
            source: source.into(),
            sha256: format!("{:x}", hasher.finalize()),
            fetched_at: Utc::now(),
        }
    }
}

/// The persisted metadata document for one survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMetadata {
    /// Logical survey identifier (the store key).
    pub survey_id: String,
    /// Counter of the last successful load.
    pub load_counter: u64,
    /// Provenance of the question payload this metadata was derived from.
    pub provenance: Provenance,
    /// Full metadata rows.
    pub rows: Vec<MetadataRow>,
}

impl StoredMetadata {
    /// Snapshot a metadata table for persistence.
    pub fn from_table(
        survey_id: impl Into<String>,
        load_counter: u64,
        provenance: Provenance,
        table: &MetadataTable,
    ) -> Self {
        Self {
            survey_id: survey_id.into(),
            load_counter,
            provenance,
            rows: table.rows().to_vec(),
        }
    }

    /// View for the consistency gate.
    pub fn prior(&self) -> PriorMetadata {
        PriorMetadata {
            load_counter: self.load_counter,
            pairs: self
                .rows
                .iter()
                .map(|row| {
                    (
                        row.descriptor.original_id.clone(),
                        row.descriptor.question_type,
                    )
                })
                .collect(),
        }
    }
}

/// One persisted results row.
pub type ResultRecord = IndexMap<String, CellValue>;

/// JSON-file store, one directory per survey.
#[derive(Debug, Clone)]
pub struct SurveyStore {
    root: PathBuf,
}

impl SurveyStore {
    /// Store rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory of one survey.
    pub fn survey_dir(&self, survey_id: &str) -> PathBuf {
        self.root.join(format!("poll_{}", survey_id))
    }

    fn metadata_path(&self, survey_id: &str) -> PathBuf {
        self.survey_dir(survey_id).join("metadata.json")
    }

    fn results_path(&self, survey_id: &str) -> PathBuf {
        self.survey_dir(survey_id).join("results.json")
    }

    /// Load persisted metadata; `None` if this survey was never loaded.
    pub fn load_metadata(&self, survey_id: &str) -> Result<Option<StoredMetadata>> {
        let path = self.metadata_path(survey_id);
        if !path.exists() {
            return Ok(None);
        }
        let file = File::open(&path).map_err(|e| DecantError::io(&path, e))?;
        let metadata = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(metadata))
    }

    /// Persist the metadata document, replacing any previous version.
    pub fn save_metadata(&self, metadata: &StoredMetadata) -> Result<()> {
        let path = self.metadata_path(&metadata.survey_id);
        self.write_json(&path, metadata)
    }

    /// Previously persisted results rows; empty if none.
    pub fn load_results(&self, survey_id: &str) -> Result<Vec<ResultRecord>> {
        let path = self.results_path(survey_id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&path).map_err(|e| DecantError::io(&path, e))?;
        let records = serde_json::from_reader(BufReader::new(file))?;
        Ok(records)
    }

    /// Append a run's typed rows to the persisted results.
    ///
    /// Returns the total row count after the append.
    pub fn append_results(&self, survey_id: &str, table: &TypedTable) -> Result<usize> {
        let mut records = self.load_results(survey_id)?;
        records.extend(table.to_records());
        let total = records.len();
        self.write_json(&self.results_path(survey_id), &records)?;
        Ok(total)
    }

    fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| DecantError::io(parent, e))?;
        }

        let tmp = path.with_extension("json.tmp");
        let file = File::create(&tmp).map_err(|e| DecantError::io(&tmp, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer
            .into_inner()
            .map_err(|e| DecantError::io(&tmp, e.into_error()))?;

        fs::rename(&tmp, path).map_err(|e| DecantError::io(path, e))?;
        Ok(())
    }
}
