//! Naming oracle trait.

/// One request for a semantic suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixRequest {
    /// Suffixes to steer away from: those already chosen within the
    /// question, plus rejected candidates on retry.
    pub avoid: Vec<String>,
    /// German text of the owning question.
    pub question_text: String,
    /// German label of the variable to name.
    pub variable_text: String,
}

impl SuffixRequest {
    /// Build a request.
    pub fn new(
        avoid: Vec<String>,
        question_text: impl Into<String>,
        variable_text: impl Into<String>,
    ) -> Self {
        Self {
            avoid,
            question_text: question_text.into(),
            variable_text: variable_text.into(),
        }
    }
}

/// External capability that turns a variable label into a short semantic
/// suffix (e.g. "Wie zufrieden...?" / "Sehr zufrieden" -> "zufrieden").
///
/// Implementations must be thread-safe (Send + Sync): the naming engine
/// shares one oracle across concurrent per-question tasks. Returned suffixes
/// are sanitized and grammar-checked by the engine, so an oracle may return
/// raw model output.
pub trait NamingOracle: Send + Sync {
    /// Suggest a suffix for one variable.
    fn suggest_suffix(&self, request: &SuffixRequest) -> crate::error::Result<String>;

    /// Name of this oracle (for logging).
    fn name(&self) -> &str;
}
