//! Mock naming oracle for tests and offline runs.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::Result;

use super::oracle::{NamingOracle, SuffixRequest};
use super::sanitize::sanitize_suffix;

/// Scripted oracle: returns queued responses in order and falls back to the
/// sanitized variable label once the queue is exhausted.
///
/// Every received request is recorded, so tests can assert on avoid lists
/// and prompt content.
pub struct MockOracle {
    responses: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<SuffixRequest>>,
}

impl MockOracle {
    /// Oracle with no scripted responses (label-derived suffixes only).
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Oracle that plays back the given responses first.
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let oracle = Self::new();
        {
            let mut queue = oracle.responses.lock().unwrap();
            queue.extend(responses.into_iter().map(Into::into));
        }
        oracle
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<SuffixRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl NamingOracle for MockOracle {
    fn suggest_suffix(&self, request: &SuffixRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(scripted) = self.responses.lock().unwrap().pop_front() {
            return Ok(scripted);
        }
        // Label-derived fallback: first word of the variable text.
        let word = request
            .variable_text
            .split_whitespace()
            .next()
            .unwrap_or_default();
        Ok(sanitize_suffix(word))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
