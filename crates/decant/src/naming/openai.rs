//! OpenAI-compatible chat-completions naming oracle.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::json;

use crate::config::OracleConfig;
use crate::error::{DecantError, Result};

use super::oracle::{NamingOracle, SuffixRequest};

const SYSTEM_PROMPT: &str = "\
Du benennst Variablen eines Fragebogens. Du erhältst den Fragetext und den \
Text einer Antwortoption und antwortest mit genau einem kurzen deutschen \
Stichwort in Kleinbuchstaben, ohne Ziffern, Unterstriche oder Satzzeichen. \
Umlaute sind erlaubt. Antworte nur mit dem Stichwort.

Beispiele:
Frage: Wie zufrieden bist du mit dem Kurs? / Option: Sehr zufrieden -> zufrieden
Frage: Welche Farben magst du? / Option: Grün -> gruen
Frage: Warum nimmst du teil? / Option: Spaß an der Sache -> spass";

/// Oracle backed by an OpenAI-style chat-completions endpoint.
///
/// The base URL is configurable, so any OpenAI-compatible provider
/// (OpenRouter, a local proxy) works.
pub struct OpenAiOracle {
    client: Client,
    api_key: String,
    config: OracleConfig,
}

impl OpenAiOracle {
    /// Create an oracle with the given key and configuration.
    pub fn new(api_key: impl Into<String>, config: OracleConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| DecantError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Create from environment variables.
    ///
    /// Reads `DECANT_ORACLE_API_KEY`; `DECANT_ORACLE_MODEL` and
    /// `DECANT_ORACLE_BASE_URL` override the defaults.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("DECANT_ORACLE_API_KEY").map_err(|_| {
            DecantError::Config("DECANT_ORACLE_API_KEY environment variable not set".to_string())
        })?;
        let mut config = OracleConfig::default();
        if let Ok(model) = std::env::var("DECANT_ORACLE_MODEL") {
            config.model = model;
        }
        if let Ok(url) = std::env::var("DECANT_ORACLE_BASE_URL") {
            config.base_url = url;
        }
        Self::new(api_key, config)
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))
                .map_err(|e| DecantError::Config(format!("invalid API key: {}", e)))?,
        );
        Ok(headers)
    }

    fn user_prompt(request: &SuffixRequest) -> String {
        let mut prompt = format!(
            "Frage: {}\nOption: {}",
            request.question_text, request.variable_text
        );
        if !request.avoid.is_empty() {
            prompt.push_str(&format!(
                "\nVermeide diese Stichworte: {}",
                request.avoid.join(", ")
            ));
        }
        prompt
    }
}

impl NamingOracle for OpenAiOracle {
    fn suggest_suffix(&self, request: &SuffixRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": Self::user_prompt(request)}
            ]
        });

        let response = self
            .client
            .post(&url)
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .map_err(|e| DecantError::Oracle(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(DecantError::Oracle(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        let api_response: ChatResponse = response
            .json()
            .map_err(|e| DecantError::Oracle(format!("failed to parse response: {}", e)))?;

        api_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| DecantError::Oracle("empty completion".to_string()))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_prompt_renders_avoid_list() {
        let request = SuffixRequest::new(
            vec!["rot".to_string(), "blau".to_string()],
            "Welche Farben magst du?",
            "Grün",
        );
        let prompt = OpenAiOracle::user_prompt(&request);
        assert!(prompt.contains("Frage: Welche Farben magst du?"));
        assert!(prompt.contains("Option: Grün"));
        assert!(prompt.contains("Vermeide diese Stichworte: rot, blau"));
    }

    #[test]
    fn test_user_prompt_without_avoid_list() {
        let request = SuffixRequest::new(vec![], "Frage?", "Option");
        let prompt = OpenAiOracle::user_prompt(&request);
        assert!(!prompt.contains("Vermeide"));
    }
}
