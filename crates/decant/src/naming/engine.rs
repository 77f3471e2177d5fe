//! The variable naming engine.
//!
//! Replaces platform identifiers ("V12") with semantic names
//! ("Q12_zufrieden"). Single-variable questions are named deterministically
//! from their position; multi-variable questions consult the naming oracle,
//! one suffix at a time, with bounded retries against collisions.
//!
//! Per-question naming sequences are independent (the avoid list is scoped to
//! the question), so multi-variable questions run on scoped worker threads.
//! Global uniqueness is tracked in a mutex-guarded registry; a rejected claim
//! triggers a same-task retry, never an overwrite.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::thread;

use log::{debug, info};

use crate::error::{DecantError, Result};
use crate::metadata::MetadataTable;

use super::oracle::{NamingOracle, SuffixRequest};
use super::sanitize::{is_valid_suffix, sanitize_suffix};

/// Maximum oracle attempts per variable.
const MAX_ATTEMPTS: usize = 3;

/// Globally unique set of accepted names.
#[derive(Default)]
struct NameRegistry {
    names: Mutex<HashSet<String>>,
}

impl NameRegistry {
    /// Claim a name; false if it is already taken.
    fn try_claim(&self, name: &str) -> bool {
        self.names.lock().unwrap().insert(name.to_string())
    }
}

/// One variable to be named.
struct Entry {
    row_index: usize,
    original_id: String,
    label: Option<String>,
    is_other_boolean: bool,
    is_other_text: bool,
}

/// All variables of one question, in definition order.
struct Job {
    question_id: i64,
    position: i64,
    question_text: String,
    entries: Vec<Entry>,
}

/// Rename every variable of the table, preserving the platform identifier in
/// the `original_id` column.
///
/// Fails with `MissingLabel`, `NamingExhausted` or `DuplicateName` as
/// described in the module docs; any failure aborts the whole stage.
pub fn rename(table: MetadataTable, oracle: &dyn NamingOracle) -> Result<MetadataTable> {
    let jobs = build_jobs(&table);
    let registry = NameRegistry::default();
    let mut names: Vec<Option<String>> = vec![None; table.len()];

    info!(
        "naming {} variable(s) across {} question(s) via '{}' oracle",
        table.len(),
        jobs.len(),
        oracle.name()
    );

    // Single-variable questions are deterministic and claimed up front, so
    // oracle-driven questions retry against the full picture.
    for job in jobs.iter().filter(|j| j.entries.len() == 1) {
        let entry = &job.entries[0];
        let name = deterministic_name(job.position, entry);
        registry.try_claim(&name);
        names[entry.row_index] = Some(name);
    }

    let multi: Vec<&Job> = jobs.iter().filter(|j| j.entries.len() > 1).collect();
    let registry_ref = &registry;
    let results = thread::scope(|scope| {
        let handles: Vec<_> = multi
            .iter()
            .copied()
            .map(|job| scope.spawn(move || name_question(job, oracle, registry_ref)))
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .map_err(|_| DecantError::Oracle("naming task panicked".to_string()))?
            })
            .collect::<Result<Vec<_>>>()
    })?;

    for pairs in results {
        for (row_index, name) in pairs {
            names[row_index] = Some(name);
        }
    }

    let mut rows = table.into_rows();
    for (row, name) in rows.iter_mut().zip(names) {
        // Every row was visited by exactly one job.
        row.id = name.expect("row missed by naming");
    }

    detect_global_duplicates(&rows)?;
    MetadataTable::new(rows)
}

fn build_jobs(table: &MetadataTable) -> Vec<Job> {
    let mut jobs: Vec<Job> = Vec::new();
    for (row_index, row) in table.rows().iter().enumerate() {
        let entry = Entry {
            row_index,
            original_id: row.descriptor.original_id.clone(),
            label: row.descriptor.label.clone(),
            is_other_boolean: row.descriptor.is_other_boolean,
            is_other_text: row.descriptor.is_other_text,
        };
        match jobs.last_mut() {
            Some(job) if job.question_id == row.descriptor.question_id => {
                job.entries.push(entry)
            }
            _ => jobs.push(Job {
                question_id: row.descriptor.question_id,
                position: row.descriptor.position,
                question_text: row.question_text.clone(),
                entries: vec![entry],
            }),
        }
    }
    jobs
}

/// Position-derived name, with the other-suffix applied per flags.
fn deterministic_name(position: i64, entry: &Entry) -> String {
    if entry.is_other_text {
        format!("Q{}_other_text", position)
    } else if entry.is_other_boolean {
        format!("Q{}_other", position)
    } else {
        format!("Q{}", position)
    }
}

/// Name all variables of one multi-variable question, strictly in order.
fn name_question(
    job: &Job,
    oracle: &dyn NamingOracle,
    registry: &NameRegistry,
) -> Result<Vec<(usize, String)>> {
    let mut chosen_suffixes: Vec<String> = Vec::new();
    let mut names = Vec::with_capacity(job.entries.len());

    for entry in &job.entries {
        let name = if entry.is_other_boolean || entry.is_other_text {
            let name = deterministic_name(job.position, entry);
            registry.try_claim(&name);
            name
        } else {
            oracle_name(job, entry, oracle, registry, &mut chosen_suffixes)?
        };
        names.push((entry.row_index, name));
    }

    Ok(names)
}

/// Obtain one oracle-derived name, retrying on grammar violations and
/// collisions up to [`MAX_ATTEMPTS`] times.
fn oracle_name(
    job: &Job,
    entry: &Entry,
    oracle: &dyn NamingOracle,
    registry: &NameRegistry,
    chosen_suffixes: &mut Vec<String>,
) -> Result<String> {
    let label = entry
        .label
        .as_deref()
        .filter(|l| !l.trim().is_empty())
        .ok_or_else(|| DecantError::MissingLabel {
            question_id: job.question_id,
            original_id: entry.original_id.clone(),
        })?;

    let mut rejected: Vec<String> = Vec::new();
    let mut last_candidate = String::new();

    for attempt in 1..=MAX_ATTEMPTS {
        let mut avoid = chosen_suffixes.clone();
        avoid.extend(rejected.iter().cloned());
        let request = SuffixRequest::new(avoid, job.question_text.clone(), label.to_string());

        let raw = oracle.suggest_suffix(&request)?;
        let suffix = sanitize_suffix(&raw);
        last_candidate = suffix.clone();

        if !is_valid_suffix(&suffix) {
            debug!(
                "'{}' attempt {}: candidate '{}' violates the suffix grammar",
                entry.original_id, attempt, raw
            );
            rejected.push(suffix);
            continue;
        }

        let name = format!("Q{}_{}", job.position, suffix);
        if chosen_suffixes.contains(&suffix) || !registry.try_claim(&name) {
            debug!(
                "'{}' attempt {}: name '{}' collides, retrying",
                entry.original_id, attempt, name
            );
            rejected.push(suffix);
            continue;
        }

        chosen_suffixes.push(suffix);
        return Ok(name);
    }

    Err(DecantError::NamingExhausted {
        original_id: entry.original_id.clone(),
        label: label.to_string(),
        attempts: MAX_ATTEMPTS,
        last_candidate,
    })
}

/// Cross-question duplicate scan over the final name set.
fn detect_global_duplicates(rows: &[crate::metadata::MetadataRow]) -> Result<()> {
    let mut by_name: HashMap<&str, Vec<&str>> = HashMap::new();
    for row in rows {
        by_name
            .entry(&row.id)
            .or_default()
            .push(&row.descriptor.original_id);
    }
    for (name, original_ids) in by_name {
        if original_ids.len() > 1 {
            return Err(DecantError::DuplicateName {
                name: name.to_string(),
                original_ids: original_ids.iter().map(|s| s.to_string()).collect(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::QuestionCategory;
    use crate::metadata::{MetadataRow, VariableDescriptor};
    use crate::naming::MockOracle;
    use crate::naming::sanitize::is_platform_id;
    use crate::schema::ValueType;

    fn row(
        question_id: i64,
        position: i64,
        original_id: &str,
        label: Option<&str>,
        category: QuestionCategory,
    ) -> MetadataRow {
        let mut descriptor = VariableDescriptor::new(
            question_id,
            0,
            original_id,
            position,
            category,
            ValueType::Boolean,
        );
        descriptor.label = label.map(str::to_string);
        MetadataRow {
            id: original_id.to_string(),
            descriptor,
            question_text: format!("Frage {}?", question_id),
            page: 1,
        }
    }

    fn table(rows: Vec<MetadataRow>) -> MetadataTable {
        MetadataTable::new(rows).unwrap()
    }

    #[test]
    fn test_single_variable_is_deterministic() {
        let oracle = MockOracle::with_responses(["should_not_be_used"]);
        let input = table(vec![row(
            1,
            3,
            "V1",
            None,
            QuestionCategory::Scale,
        )]);

        let renamed = rename(input, &oracle).unwrap();
        assert_eq!(renamed.rows()[0].id, "Q3");
        assert_eq!(renamed.rows()[0].descriptor.original_id, "V1");
        assert!(oracle.requests().is_empty());
    }

    #[test]
    fn test_multi_variable_uses_oracle() {
        let oracle = MockOracle::with_responses(["rot", "blau", "gruen"]);
        let input = table(vec![
            row(1, 5, "V6", Some("Rot"), QuestionCategory::MultipleChoice),
            row(1, 5, "V7", Some("Blau"), QuestionCategory::MultipleChoice),
            row(1, 5, "V8", Some("Grün"), QuestionCategory::MultipleChoice),
        ]);

        let renamed = rename(input, &oracle).unwrap();
        let ids: Vec<&str> = renamed.rows().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["Q5_rot", "Q5_blau", "Q5_gruen"]);

        // The third request must carry the suffixes already chosen.
        let requests = oracle.requests();
        assert_eq!(requests[2].avoid, ["rot", "blau"]);
    }

    #[test]
    fn test_other_variables_bypass_oracle() {
        let oracle = MockOracle::with_responses(["spass", "lernen"]);
        let category = QuestionCategory::MultipleChoiceOther;
        let mut toggle = row(1, 4, "V11", Some("Anderes"), category);
        toggle.descriptor.is_other_boolean = true;
        let mut text = row(1, 4, "V11.1", Some("Anderes (Text)"), category);
        text.descriptor.is_other_text = true;
        let input = table(vec![
            row(1, 4, "V9", Some("Spaß"), category),
            row(1, 4, "V10", Some("Lernen"), category),
            toggle,
            text,
        ]);

        let renamed = rename(input, &oracle).unwrap();
        let ids: Vec<&str> = renamed.rows().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["Q4_spass", "Q4_lernen", "Q4_other", "Q4_other_text"]);
        assert_eq!(oracle.requests().len(), 2);
    }

    #[test]
    fn test_collision_retries_then_succeeds() {
        // Oracle repeats "rot" once before yielding a fresh suffix.
        let oracle = MockOracle::with_responses(["rot", "rot", "blau"]);
        let input = table(vec![
            row(1, 2, "V1", Some("Rot"), QuestionCategory::MultipleChoice),
            row(1, 2, "V2", Some("Dunkelrot"), QuestionCategory::MultipleChoice),
        ]);

        let renamed = rename(input, &oracle).unwrap();
        let ids: Vec<&str> = renamed.rows().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["Q2_rot", "Q2_blau"]);

        // The retry carries the rejected candidate as an extra avoid hint.
        let requests = oracle.requests();
        assert_eq!(requests[2].avoid, ["rot", "rot"]);
    }

    #[test]
    fn test_exhaustion_after_three_attempts() {
        let oracle = MockOracle::with_responses(["rot", "rot", "rot", "rot"]);
        let input = table(vec![
            row(1, 2, "V1", Some("Rot"), QuestionCategory::MultipleChoice),
            row(1, 2, "V2", Some("Dunkelrot"), QuestionCategory::MultipleChoice),
        ]);

        let err = rename(input, &oracle).unwrap_err();
        assert!(matches!(
            err,
            DecantError::NamingExhausted {
                attempts: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_grammar_violations_count_as_attempts() {
        let oracle = MockOracle::with_responses(["zwei worte", "q1", "besser"]);
        let input = table(vec![
            row(1, 1, "V1", Some("A"), QuestionCategory::MultipleChoice),
            row(1, 1, "V2", Some("B"), QuestionCategory::MultipleChoice),
        ]);

        let renamed = rename(input, &oracle).unwrap();
        assert_eq!(renamed.rows()[0].id, "Q1_besser");
    }

    #[test]
    fn test_missing_label_fails() {
        let oracle = MockOracle::new();
        let input = table(vec![
            row(1, 1, "V1", Some("A"), QuestionCategory::MultipleChoice),
            row(1, 1, "V2", None, QuestionCategory::MultipleChoice),
        ]);

        let err = rename(input, &oracle).unwrap_err();
        assert!(matches!(
            err,
            DecantError::MissingLabel { question_id: 1, .. }
        ));
    }

    #[test]
    fn test_global_duplicate_detection() {
        // Two single-variable questions wrongly sharing a position collide
        // deterministically and must be reported, not silently kept.
        let oracle = MockOracle::new();
        let input = table(vec![
            row(1, 2, "V1", None, QuestionCategory::Scale),
            row(2, 2, "V2", None, QuestionCategory::Scale),
        ]);

        let err = rename(input, &oracle).unwrap_err();
        match err {
            DecantError::DuplicateName { name, original_ids } => {
                assert_eq!(name, "Q2");
                assert_eq!(original_ids.len(), 2);
                assert!(original_ids.contains(&"V1".to_string()));
                assert!(original_ids.contains(&"V2".to_string()));
            }
            other => panic!("expected DuplicateName, got {:?}", other),
        }
    }

    #[test]
    fn test_no_renamed_id_looks_like_a_platform_id() {
        let oracle = MockOracle::new();
        let input = table(vec![
            row(1, 1, "V1", None, QuestionCategory::Scale),
            row(2, 2, "V2", Some("Rot"), QuestionCategory::MultipleChoice),
            row(2, 2, "V3", Some("Blau"), QuestionCategory::MultipleChoice),
        ]);

        let renamed = rename(input, &oracle).unwrap();
        for r in renamed.rows() {
            assert!(!is_platform_id(&r.id), "raw id survived: {}", r.id);
        }
    }
}
