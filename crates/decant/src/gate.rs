//! Cross-run consistency gate.
//!
//! Variable identity is anchored to the platform-assigned original id, never
//! to the semantic name: renamed ids may legitimately differ between runs
//! (the oracle is not deterministic), so only `(original_id, question_type)`
//! pairs are compared against persisted history.

use serde::{Deserialize, Serialize};

use crate::classify::QuestionCategory;
use crate::error::{DecantError, Result};
use crate::metadata::MetadataTable;

/// Prior state read from the store for one survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorMetadata {
    /// Counter of the last successful load.
    pub load_counter: u64,
    /// `(original_id, question_type)` pairs of the persisted metadata.
    pub pairs: Vec<(String, QuestionCategory)>,
}

/// Outcome of the preload check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadDecision {
    /// No prior data: create tables, counter 0.
    FirstLoad,
    /// Structure matches history: append with an incremented counter.
    Append { previous: u64 },
}

impl LoadDecision {
    /// The counter to stamp onto this run's rows.
    pub fn load_counter(&self) -> u64 {
        match self {
            LoadDecision::FirstLoad => 0,
            LoadDecision::Append { previous } => previous + 1,
        }
    }
}

/// Compare the current metadata against persisted history and decide the
/// load counter.
///
/// A structural divergence is a `MetadataMismatch`; resolving it is an
/// operational decision (new logical survey, or a configuration fix) and is
/// never done here by mutating history.
pub fn preload_check(
    survey_id: &str,
    current: &MetadataTable,
    prior: Option<&PriorMetadata>,
) -> Result<LoadDecision> {
    let Some(prior) = prior else {
        return Ok(LoadDecision::FirstLoad);
    };

    let mut current_pairs = current.consistency_pairs();
    let mut prior_pairs = prior.pairs.clone();
    current_pairs.sort_by(|a, b| a.0.cmp(&b.0));
    prior_pairs.sort_by(|a, b| a.0.cmp(&b.0));

    if current_pairs.len() != prior_pairs.len() {
        return Err(mismatch(
            survey_id,
            format!(
                "variable count changed: {} persisted, {} current",
                prior_pairs.len(),
                current_pairs.len()
            ),
        ));
    }

    for ((current_id, current_type), (prior_id, prior_type)) in
        current_pairs.iter().zip(&prior_pairs)
    {
        if current_id != prior_id {
            return Err(mismatch(
                survey_id,
                format!(
                    "variable set changed: persisted '{}' vs current '{}'",
                    prior_id, current_id
                ),
            ));
        }
        if current_type != prior_type {
            return Err(mismatch(
                survey_id,
                format!(
                    "question type of '{}' changed: persisted {} vs current {}",
                    current_id, prior_type, current_type
                ),
            ));
        }
    }

    Ok(LoadDecision::Append {
        previous: prior.load_counter,
    })
}

fn mismatch(survey_id: &str, message: String) -> DecantError {
    DecantError::MetadataMismatch {
        survey_id: survey_id.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{MetadataRow, VariableDescriptor};
    use crate::schema::ValueType;

    fn table(pairs: &[(&str, QuestionCategory)]) -> MetadataTable {
        let rows = pairs
            .iter()
            .enumerate()
            .map(|(index, (original_id, category))| MetadataRow {
                id: format!("Q{}", index + 1),
                descriptor: VariableDescriptor::new(
                    index as i64 + 1,
                    0,
                    *original_id,
                    index as i64 + 1,
                    *category,
                    ValueType::Integer,
                ),
                question_text: "Frage?".to_string(),
                page: 1,
            })
            .collect();
        MetadataTable::new(rows).unwrap()
    }

    fn prior(load_counter: u64, pairs: &[(&str, QuestionCategory)]) -> PriorMetadata {
        PriorMetadata {
            load_counter,
            pairs: pairs
                .iter()
                .map(|(id, category)| (id.to_string(), *category))
                .collect(),
        }
    }

    #[test]
    fn test_no_prior_data_is_first_load() {
        let current = table(&[("V1", QuestionCategory::Scale)]);
        let decision = preload_check("s", &current, None).unwrap();
        assert_eq!(decision, LoadDecision::FirstLoad);
        assert_eq!(decision.load_counter(), 0);
    }

    #[test]
    fn test_matching_history_increments_counter() {
        let current = table(&[("V1", QuestionCategory::Scale), ("V2", QuestionCategory::Matrix)]);
        // Prior pairs in a different order: comparison sorts by original id.
        let prior = prior(
            4,
            &[("V2", QuestionCategory::Matrix), ("V1", QuestionCategory::Scale)],
        );
        let decision = preload_check("s", &current, Some(&prior)).unwrap();
        assert_eq!(decision.load_counter(), 5);
    }

    #[test]
    fn test_preload_check_is_idempotent() {
        let current = table(&[("V1", QuestionCategory::Scale)]);
        let prior = prior(0, &[("V1", QuestionCategory::Scale)]);
        let first = preload_check("s", &current, Some(&prior)).unwrap();
        let second = preload_check("s", &current, Some(&prior)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_changed_type_is_a_mismatch() {
        let current = table(&[("V1", QuestionCategory::SingleChoice)]);
        let prior = prior(0, &[("V1", QuestionCategory::Scale)]);
        let err = preload_check("s", &current, Some(&prior)).unwrap_err();
        assert!(err.to_string().contains("question type of 'V1'"));
    }

    #[test]
    fn test_changed_id_set_is_a_mismatch() {
        let current = table(&[("V2", QuestionCategory::Scale)]);
        let prior = prior(0, &[("V1", QuestionCategory::Scale)]);
        assert!(matches!(
            preload_check("s", &current, Some(&prior)),
            Err(DecantError::MetadataMismatch { .. })
        ));
    }

    #[test]
    fn test_changed_count_is_a_mismatch() {
        let current = table(&[
            ("V1", QuestionCategory::Scale),
            ("V2", QuestionCategory::Scale),
        ]);
        let prior = prior(0, &[("V1", QuestionCategory::Scale)]);
        let err = preload_check("s", &current, Some(&prior)).unwrap_err();
        assert!(err.to_string().contains("variable count changed"));
    }
}
