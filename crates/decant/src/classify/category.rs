//! Canonical question-type categories.

use serde::{Deserialize, Serialize};

use crate::poll::InputKind;

/// Derived question-type category.
///
/// This is the canonical classification a question resolves to; it drives
/// variable typing, naming, schema checks and the cross-run consistency
/// comparison. The wire spelling (`code`) is what gets persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum QuestionCategory {
    /// One free-text input field.
    InputSingle(InputKind),
    /// Several free-text input fields of the same kind.
    InputMultiple(InputKind),
    /// One choice among coded options; stored as the decoded label.
    SingleChoice,
    /// Several independent check boxes, one boolean variable each.
    MultipleChoice,
    /// Multiple choice with a "please specify" free-text escape hatch.
    MultipleChoiceOther,
    /// Likert/matrix grid, one ordinal integer variable per row.
    Matrix,
    /// Numeric scale (e.g. 0 to 10).
    Scale,
}

impl QuestionCategory {
    /// Stable string code used in persistence and consistency checks.
    pub fn code(&self) -> String {
        match self {
            QuestionCategory::InputSingle(kind) => format!("input_single_{}", kind.code()),
            QuestionCategory::InputMultiple(kind) => format!("input_multiple_{}", kind.code()),
            QuestionCategory::SingleChoice => "single_choice".to_string(),
            QuestionCategory::MultipleChoice => "multiple_choice".to_string(),
            QuestionCategory::MultipleChoiceOther => "multiple_choice_other".to_string(),
            QuestionCategory::Matrix => "matrix".to_string(),
            QuestionCategory::Scale => "scale".to_string(),
        }
    }

    /// Parse a stable string code back into a category.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "single_choice" => Some(QuestionCategory::SingleChoice),
            "multiple_choice" => Some(QuestionCategory::MultipleChoice),
            "multiple_choice_other" => Some(QuestionCategory::MultipleChoiceOther),
            "matrix" => Some(QuestionCategory::Matrix),
            "scale" => Some(QuestionCategory::Scale),
            _ => {
                let kind = |suffix: &str| InputKind::from_code(suffix);
                if let Some(suffix) = code.strip_prefix("input_single_") {
                    kind(suffix).map(QuestionCategory::InputSingle)
                } else if let Some(suffix) = code.strip_prefix("input_multiple_") {
                    kind(suffix).map(QuestionCategory::InputMultiple)
                } else {
                    None
                }
            }
        }
    }
}

impl From<QuestionCategory> for String {
    fn from(category: QuestionCategory) -> Self {
        category.code()
    }
}

impl TryFrom<String> for QuestionCategory {
    type Error = String;

    fn try_from(code: String) -> Result<Self, Self::Error> {
        QuestionCategory::from_code(&code)
            .ok_or_else(|| format!("unknown question category '{}'", code))
    }
}

impl std::fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        let categories = [
            QuestionCategory::InputSingle(InputKind::Singleline),
            QuestionCategory::InputSingle(InputKind::Integer),
            QuestionCategory::InputMultiple(InputKind::Multiline),
            QuestionCategory::SingleChoice,
            QuestionCategory::MultipleChoice,
            QuestionCategory::MultipleChoiceOther,
            QuestionCategory::Matrix,
            QuestionCategory::Scale,
        ];
        for category in categories {
            assert_eq!(QuestionCategory::from_code(&category.code()), Some(category));
        }
    }

    #[test]
    fn test_serde_uses_string_codes() {
        let json = serde_json::to_string(&QuestionCategory::MultipleChoiceOther).unwrap();
        assert_eq!(json, "\"multiple_choice_other\"");

        let parsed: QuestionCategory =
            serde_json::from_str("\"input_single_integer\"").unwrap();
        assert_eq!(parsed, QuestionCategory::InputSingle(InputKind::Integer));
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        assert_eq!(QuestionCategory::from_code("ranking"), None);
        assert!(serde_json::from_str::<QuestionCategory>("\"ranking\"").is_err());
    }
}
