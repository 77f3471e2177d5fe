//! Runtime configuration for the pipeline.

use std::path::PathBuf;

use crate::error::{DecantError, Result};

/// Configuration for the naming oracle's chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Model identifier (e.g. "gpt-4o-mini" or an OpenRouter model path).
    pub model: String,
    /// Base URL of an OpenAI-compatible API.
    pub base_url: String,
    /// Maximum tokens in the response.
    pub max_tokens: usize,
    /// Sampling temperature.
    pub temperature: f64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            max_tokens: 200,
            temperature: 0.3,
        }
    }
}

/// Pipeline configuration.
///
/// `survey_id` is the logical storage key: several polls can be loaded
/// under distinct survey ids, and consistency is tracked per survey id.
#[derive(Debug, Clone)]
pub struct Config {
    /// Logical survey identifier used as the store key.
    pub survey_id: String,
    /// Platform poll identifier.
    pub poll_id: i64,
    /// Base URL of the survey platform API.
    pub api_url: String,
    /// Bearer token for the survey platform API.
    pub api_token: String,
    /// Root directory of the JSON survey store.
    pub store_dir: PathBuf,
    /// Output directory for generated documentation.
    pub docs_dir: PathBuf,
    /// Naming oracle configuration.
    pub oracle: OracleConfig,
}

impl Config {
    /// Create a configuration with the required survey coordinates.
    pub fn new(
        survey_id: impl Into<String>,
        poll_id: i64,
        api_url: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Result<Self> {
        let survey_id = survey_id.into();
        let api_url = api_url.into();
        let api_token = api_token.into();

        if poll_id <= 0 {
            return Err(DecantError::Config("poll id must be positive".to_string()));
        }
        if survey_id.is_empty() {
            return Err(DecantError::Config("survey id must not be empty".to_string()));
        }
        if api_url.is_empty() {
            return Err(DecantError::Config("API URL must not be empty".to_string()));
        }
        if api_token.is_empty() {
            return Err(DecantError::Config("API token must not be empty".to_string()));
        }

        Ok(Self {
            survey_id,
            poll_id,
            api_url,
            api_token,
            store_dir: PathBuf::from("store"),
            docs_dir: PathBuf::from("docs"),
            oracle: OracleConfig::default(),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `DECANT_SURVEY_ID`, `DECANT_POLL_ID`, `DECANT_API_URL` and
    /// `DECANT_API_TOKEN`; optionally `DECANT_STORE_DIR`, `DECANT_DOCS_DIR`,
    /// `DECANT_ORACLE_MODEL` and `DECANT_ORACLE_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let survey_id = require_env("DECANT_SURVEY_ID")?;
        let poll_id: i64 = require_env("DECANT_POLL_ID")?
            .parse()
            .map_err(|_| DecantError::Config("DECANT_POLL_ID is not an integer".to_string()))?;
        let api_url = require_env("DECANT_API_URL")?;
        let api_token = require_env("DECANT_API_TOKEN")?;

        let mut config = Self::new(survey_id, poll_id, api_url, api_token)?;

        if let Ok(dir) = std::env::var("DECANT_STORE_DIR") {
            config.store_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("DECANT_DOCS_DIR") {
            config.docs_dir = PathBuf::from(dir);
        }
        if let Ok(model) = std::env::var("DECANT_ORACLE_MODEL") {
            config.oracle.model = model;
        }
        if let Ok(url) = std::env::var("DECANT_ORACLE_BASE_URL") {
            config.oracle.base_url = url;
        }

        Ok(config)
    }

    /// Set the store root directory.
    pub fn with_store_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.store_dir = dir.into();
        self
    }

    /// Set the documentation output directory.
    pub fn with_docs_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.docs_dir = dir.into();
        self
    }

    /// Set the oracle configuration.
    pub fn with_oracle(mut self, oracle: OracleConfig) -> Self {
        self.oracle = oracle;
        self
    }
}

fn require_env(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| DecantError::Config(format!("{} environment variable not set", name)))
}
