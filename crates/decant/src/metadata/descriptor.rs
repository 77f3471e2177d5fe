//! Per-variable derived metadata.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::classify::QuestionCategory;
use crate::schema::ValueType;

/// One derived variable: the atomic unit of classification output.
///
/// A question produces one or more of these, in group/definition order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDescriptor {
    /// Owning question's platform identifier.
    pub question_id: i64,
    /// Index of the owning group (0 = primary, 1 = "other" text group).
    pub group_index: usize,
    /// Platform variable identifier, e.g. "V12".
    pub original_id: String,
    /// Absolute 1-based position of the owning question in the survey.
    pub position: i64,
    /// Derived question-type category.
    pub question_type: QuestionCategory,
    /// Semantic value type of the variable's responses.
    pub value_type: ValueType,
    /// Free text used for naming and documentation (item name, group name
    /// or choice label, depending on the category).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Lower bound for scale/matrix variables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_min: Option<f64>,
    /// Upper bound for scale/matrix variables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_max: Option<f64>,
    /// Code-to-label mapping for single-choice variables, in declaration
    /// order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub possible_values: Option<IndexMap<String, String>>,
    /// Ordinal scale labels for matrix variables.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_labels: Option<Vec<String>>,
    /// Marks the "other" toggle of a `multiple_choice_other` question.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_other_boolean: bool,
    /// Marks the "other" free-text field of a `multiple_choice_other`
    /// question.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_other_text: bool,
}

impl VariableDescriptor {
    /// Base descriptor with no label, range, enum or flag metadata.
    pub fn new(
        question_id: i64,
        group_index: usize,
        original_id: impl Into<String>,
        position: i64,
        question_type: QuestionCategory,
        value_type: ValueType,
    ) -> Self {
        Self {
            question_id,
            group_index,
            original_id: original_id.into(),
            position,
            question_type,
            value_type,
            label: None,
            range_min: None,
            range_max: None,
            possible_values: None,
            scale_labels: None,
            is_other_boolean: false,
            is_other_text: false,
        }
    }

    /// Set the naming/documentation label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the numeric range.
    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.range_min = min;
        self.range_max = max;
        self
    }

    /// True if this is one of the synthetic "other" variables.
    pub fn is_other(&self) -> bool {
        self.is_other_boolean || self.is_other_text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let descriptor = VariableDescriptor::new(
            4,
            0,
            "V5",
            2,
            QuestionCategory::Scale,
            ValueType::Integer,
        )
        .with_range(Some(0.0), Some(10.0));

        assert_eq!(descriptor.original_id, "V5");
        assert_eq!(descriptor.range_max, Some(10.0));
        assert!(!descriptor.is_other());
        assert!(descriptor.label.is_none());
    }

    #[test]
    fn test_serde_omits_empty_metadata() {
        let descriptor = VariableDescriptor::new(
            1,
            0,
            "V1",
            1,
            QuestionCategory::SingleChoice,
            ValueType::String,
        );
        let json = serde_json::to_value(&descriptor).unwrap();
        assert!(json.get("range_min").is_none());
        assert!(json.get("is_other_boolean").is_none());
        assert_eq!(json["question_type"], "single_choice");
    }
}
