//! Staged ETL orchestration.
//!
//! Each stage consumes the previous stage's output type, so a caller cannot
//! run casting before naming or the gate. The stages mirror the data flow:
//! fetch -> extract -> name -> load (gate, cast, persist).

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use log::info;

use crate::api::PollClient;
use crate::config::Config;
use crate::docs::render_codebook;
use crate::error::{DecantError, Result};
use crate::gate::preload_check;
use crate::metadata::{assemble, MetadataTable};
use crate::naming::{rename, NamingOracle};
use crate::poll::Question;
use crate::results::{cast, prepare, ResponseTable};
use crate::schema::ResultsSchema;
use crate::store::{Provenance, StoredMetadata, SurveyStore};

/// Raw survey data as fetched from the platform.
pub struct FetchedSurvey {
    pub questions: Vec<Question>,
    pub responses: ResponseTable,
    pub provenance: Provenance,
}

/// Assembled (but not yet renamed) metadata.
pub struct ExtractedMetadata {
    pub metadata: MetadataTable,
    responses: ResponseTable,
    provenance: Provenance,
}

/// Renamed metadata with its derived schema, ready for loading.
pub struct NamedMetadata {
    pub metadata: MetadataTable,
    pub schema: ResultsSchema,
    responses: ResponseTable,
    provenance: Provenance,
}

/// Outcome of one complete run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub survey_id: String,
    pub load_counter: u64,
    pub variables: usize,
    pub rows_loaded: usize,
    pub total_rows: usize,
}

/// The ETL pipeline for one configured survey.
pub struct Pipeline {
    config: Config,
    oracle: Arc<dyn NamingOracle>,
}

impl Pipeline {
    /// Pipeline with the given configuration and naming oracle.
    pub fn new(config: Config, oracle: Arc<dyn NamingOracle>) -> Self {
        Self { config, oracle }
    }

    /// The pipeline's configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch questions and responses from the platform.
    pub fn fetch(&self, client: &PollClient) -> Result<FetchedSurvey> {
        info!("fetching poll {}", self.config.poll_id);
        let payload = client.fetch_questions(self.config.poll_id)?;
        let responses = client.fetch_results(self.config.poll_id)?;
        Ok(FetchedSurvey {
            provenance: Provenance::new(payload.url, payload.raw.as_bytes()),
            questions: payload.questions,
            responses,
        })
    }

    /// Classify and assemble the metadata table.
    pub fn extract(&self, fetched: FetchedSurvey) -> Result<ExtractedMetadata> {
        info!("extracting metadata from {} question(s)", fetched.questions.len());
        let metadata = assemble(&fetched.questions)?;
        info!("derived {} variable(s)", metadata.len());
        Ok(ExtractedMetadata {
            metadata,
            responses: fetched.responses,
            provenance: fetched.provenance,
        })
    }

    /// Rename variables and derive the results schema.
    pub fn name(&self, extracted: ExtractedMetadata) -> Result<NamedMetadata> {
        let metadata = rename(extracted.metadata, self.oracle.as_ref())?;
        let schema = ResultsSchema::build(&metadata);
        Ok(NamedMetadata {
            metadata,
            schema,
            responses: extracted.responses,
            provenance: extracted.provenance,
        })
    }

    /// Gate against history, cast the responses and persist everything.
    pub fn load(&self, named: NamedMetadata, store: &SurveyStore) -> Result<RunSummary> {
        let survey_id = &self.config.survey_id;

        let prior = store.load_metadata(survey_id)?.map(|m| m.prior());
        let decision = preload_check(survey_id, &named.metadata, prior.as_ref())?;
        let load_counter = decision.load_counter();
        info!("consistency gate passed, load counter {}", load_counter);

        let prepared = prepare(named.responses, &named.metadata)?;
        let mut typed = cast(&prepared, &named.schema)?;
        typed.stamp_load_counter(load_counter);
        let rows_loaded = typed.len();

        store.save_metadata(&StoredMetadata::from_table(
            survey_id,
            load_counter,
            named.provenance,
            &named.metadata,
        ))?;
        let total_rows = store.append_results(survey_id, &typed)?;
        info!(
            "loaded {} row(s) ({} total) for survey '{}'",
            rows_loaded, total_rows, survey_id
        );

        Ok(RunSummary {
            survey_id: survey_id.clone(),
            load_counter,
            variables: named.metadata.len(),
            rows_loaded,
            total_rows,
        })
    }

    /// Render the codebook for the given metadata and write it to the docs
    /// directory. Returns the written path.
    pub fn write_docs(&self, metadata: &MetadataTable) -> Result<PathBuf> {
        let codebook = render_codebook(&self.config.survey_id, metadata);
        let path = self
            .config
            .docs_dir
            .join(format!("{}.md", self.config.survey_id));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| DecantError::io(parent, e))?;
        }
        fs::write(&path, codebook).map_err(|e| DecantError::io(&path, e))?;
        info!("wrote codebook to {}", path.display());
        Ok(path)
    }

    /// Run the full pipeline end to end with collaborators built from the
    /// configuration.
    pub fn run(&self) -> Result<RunSummary> {
        let client = PollClient::new(&self.config.api_url, &self.config.api_token)?;
        let store = SurveyStore::new(&self.config.store_dir);
        self.run_with(&client, &store)
    }

    /// Run the full pipeline with explicit collaborators.
    pub fn run_with(&self, client: &PollClient, store: &SurveyStore) -> Result<RunSummary> {
        let fetched = self.fetch(client)?;
        let extracted = self.extract(fetched)?;
        let named = self.name(extracted)?;
        self.write_docs(&named.metadata)?;
        self.load(named, store)
    }
}
