//! Decant: survey ETL engine.
//!
//! Decant fetches a survey's questions and responses from the platform API,
//! classifies the heterogeneous question structures into a typed per-variable
//! metadata table, derives semantic variable names through a pluggable naming
//! oracle, builds a validation schema, strictly casts the response rows, and
//! persists everything with a cross-run consistency guarantee: once a survey
//! has been loaded, later loads must match its structure or fail loudly.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use decant::{Config, MockOracle, Pipeline};
//!
//! let config = Config::from_env().unwrap();
//! let pipeline = Pipeline::new(config, Arc::new(MockOracle::new()));
//! let summary = pipeline.run().unwrap();
//!
//! println!("load {} with {} rows", summary.load_counter, summary.rows_loaded);
//! ```

pub mod api;
pub mod classify;
pub mod config;
pub mod docs;
pub mod error;
pub mod gate;
pub mod metadata;
pub mod naming;
pub mod poll;
pub mod results;
pub mod schema;
pub mod store;

mod pipeline;

pub use api::PollClient;
pub use classify::{classify, QuestionCategory};
pub use config::{Config, OracleConfig};
pub use error::{DecantError, Result};
pub use gate::{preload_check, LoadDecision, PriorMetadata};
pub use metadata::{assemble, MetadataRow, MetadataTable, VariableDescriptor};
pub use naming::{rename, MockOracle, NamingOracle, OpenAiOracle, SuffixRequest};
pub use pipeline::{ExtractedMetadata, FetchedSurvey, NamedMetadata, Pipeline, RunSummary};
pub use poll::{Question, TypeTag};
pub use results::{cast, prepare, CellValue, ResponseTable, TypedTable};
pub use schema::{Check, ResultsSchema, ValueType};
pub use store::{Provenance, StoredMetadata, SurveyStore};
