//! Blocking HTTP client for the survey platform.

use std::time::Duration;

use log::info;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{DecantError, Result};
use crate::poll::{normalize_question, Question};
use crate::results::ResponseTable;

/// Client for the platform's poll endpoints.
pub struct PollClient {
    client: Client,
    base_url: String,
    token: String,
}

/// Question payload plus the raw JSON text it was parsed from, kept for
/// provenance hashing.
pub struct QuestionsPayload {
    pub questions: Vec<Question>,
    pub raw: String,
    pub url: String,
}

impl PollClient {
    /// Client against the given base URL with a bearer token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| DecantError::Config(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Create from `DECANT_API_URL` and `DECANT_API_TOKEN`.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("DECANT_API_URL").map_err(|_| {
            DecantError::Config("DECANT_API_URL environment variable not set".to_string())
        })?;
        let token = std::env::var("DECANT_API_TOKEN").map_err(|_| {
            DecantError::Config("DECANT_API_TOKEN environment variable not set".to_string())
        })?;
        Self::new(base_url, token)
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token))
                .map_err(|e| DecantError::Config(format!("invalid API token: {}", e)))?,
        );
        Ok(headers)
    }

    fn get_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .headers(self.build_headers()?)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(DecantError::Api {
                status: status.as_u16(),
                url: url.to_string(),
                message: response.text().unwrap_or_default(),
            });
        }
        Ok(response.text()?)
    }

    /// Fetch and normalize all questions of a poll.
    pub fn fetch_questions(&self, poll_id: i64) -> Result<QuestionsPayload> {
        let url = format!("{}/polls/{}/questions", self.base_url, poll_id);
        let raw = self.get_text(&url)?;

        let mut values: Vec<Value> = serde_json::from_str(&raw)?;
        let mut questions = Vec::with_capacity(values.len());
        for value in &mut values {
            normalize_question(value);
            questions.push(serde_json::from_value(value.take())?);
        }

        info!("fetched {} question(s) from {}", questions.len(), url);
        Ok(QuestionsPayload {
            questions,
            raw,
            url,
        })
    }

    /// Fetch the raw results CSV of a poll.
    ///
    /// The platform wraps the CSV text in a JSON envelope `{"data": "..."}`.
    pub fn fetch_results(&self, poll_id: i64) -> Result<ResponseTable> {
        let url = format!("{}/polls/{}/results", self.base_url, poll_id);
        let raw = self.get_text(&url)?;

        let envelope: ResultsEnvelope = serde_json::from_str(&raw)?;
        let table = ResponseTable::from_csv_str(&envelope.data)?;
        info!("fetched {} response row(s) from {}", table.len(), url);
        Ok(table)
    }
}

#[derive(Deserialize)]
struct ResultsEnvelope {
    data: String,
}
