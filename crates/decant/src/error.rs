//! Error types for the decant library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for decant operations.
#[derive(Debug, Error)]
pub enum DecantError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Survey API returned a non-success status.
    #[error("API error ({status}) for '{url}': {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },

    /// Error from the CSV parser.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error reading or writing the survey store.
    #[error("Store error: {0}")]
    Store(String),

    /// Error from the naming oracle transport.
    #[error("Oracle error: {0}")]
    Oracle(String),

    /// A question's group/item layout violates the rules for its type tag.
    #[error("Malformed question {question_id}: {message}")]
    MalformedQuestion { question_id: i64, message: String },

    /// The combination of type tag and group count is not recognized.
    #[error("Unknown question type for question {question_id}: {type_tag} with {group_count} group(s)")]
    UnknownQuestionType {
        question_id: i64,
        type_tag: String,
        group_count: usize,
    },

    /// A multi-variable question has a variable without a label to name it by.
    #[error("Variable '{original_id}' of question {question_id} has no label to derive a name from")]
    MissingLabel {
        question_id: i64,
        original_id: String,
    },

    /// The naming oracle produced no usable unique suffix within the retry budget.
    #[error("No unique suffix for variable '{original_id}' (label '{label}') after {attempts} attempts, last candidate '{last_candidate}'")]
    NamingExhausted {
        original_id: String,
        label: String,
        attempts: usize,
        last_candidate: String,
    },

    /// Two variables ended up with the same derived name.
    #[error("Duplicate variable name '{name}' derived from {original_ids:?}")]
    DuplicateName {
        name: String,
        original_ids: Vec<String>,
    },

    /// The survey structure diverged from previously persisted metadata.
    #[error("Metadata mismatch for survey '{survey_id}': {message}")]
    MetadataMismatch { survey_id: String, message: String },

    /// A raw response value could not be cast to its declared type.
    #[error("Cast error in column '{column}', row {row}: {message}")]
    Cast {
        column: String,
        row: usize,
        message: String,
    },

    /// A cast value failed a schema check (range or enumeration).
    #[error("Schema violation in column '{column}', row {row}: {message}")]
    SchemaViolation {
        column: String,
        row: usize,
        message: String,
    },
}

impl DecantError {
    /// Wrap an IO error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DecantError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for decant operations.
pub type Result<T> = std::result::Result<T, DecantError>;
