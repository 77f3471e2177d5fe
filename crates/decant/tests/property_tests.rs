//! Property-based tests for the naming grammar, the consistency gate and
//! strict casting.
//!
//! These tests use proptest to generate random inputs and verify that the
//! core invariants hold under all conditions:
//!
//! 1. **No panics**: sanitization and casting never crash on any input
//! 2. **Determinism**: single-variable names depend only on the position
//! 3. **Idempotence**: sanitization and the preload check are stable
//! 4. **Round trips**: rendering a cast value and casting it again is lossless

use proptest::prelude::*;

use decant::naming::{is_platform_id, is_valid_suffix, sanitize_suffix};
use decant::{
    cast, preload_check, rename, CellValue, LoadDecision, MetadataRow, MetadataTable, MockOracle,
    PriorMetadata, QuestionCategory, ResponseTable, ResultsSchema, ValueType, VariableDescriptor,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Arbitrary short strings, including non-ASCII.
fn any_short_string() -> impl Strategy<Value = String> {
    proptest::string::string_regex(".{0,40}").unwrap()
}

/// German-looking words: lowercase letters with umlauts and sharp s.
fn german_word() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-zäöüß]{1,20}").unwrap()
}

fn scale_row(position: i64, original_id: &str) -> MetadataRow {
    MetadataRow {
        id: original_id.to_string(),
        descriptor: VariableDescriptor::new(
            position,
            0,
            original_id,
            position,
            QuestionCategory::Scale,
            ValueType::Integer,
        ),
        question_text: "Frage?".to_string(),
        page: 1,
    }
}

// =============================================================================
// Sanitization Properties
// =============================================================================

mod sanitize_tests {
    use super::*;

    proptest! {
        /// Sanitization never panics and always yields pure ASCII.
        #[test]
        fn test_sanitize_output_is_ascii(raw in any_short_string()) {
            let sanitized = sanitize_suffix(&raw);
            prop_assert!(sanitized.is_ascii());
        }

        /// Sanitizing twice changes nothing.
        #[test]
        fn test_sanitize_is_idempotent(raw in any_short_string()) {
            let once = sanitize_suffix(&raw);
            let twice = sanitize_suffix(&once);
            prop_assert_eq!(once, twice);
        }

        /// Any German word sanitizes into a grammar-conforming suffix.
        #[test]
        fn test_german_words_sanitize_into_valid_suffixes(word in german_word()) {
            let sanitized = sanitize_suffix(&word);
            prop_assert!(
                is_valid_suffix(&sanitized),
                "'{}' sanitized to invalid '{}'", word, sanitized
            );
        }

        /// A valid suffix is never mistaken for a raw platform identifier.
        #[test]
        fn test_valid_suffixes_are_not_platform_ids(word in german_word()) {
            let sanitized = sanitize_suffix(&word);
            if is_valid_suffix(&sanitized) {
                prop_assert!(!is_platform_id(&sanitized));
            }
        }
    }
}

// =============================================================================
// Naming Properties
// =============================================================================

mod naming_tests {
    use super::*;

    proptest! {
        /// A single-variable question is always named `Q<position>` without
        /// consulting the oracle, whatever the position.
        #[test]
        fn test_single_variable_names_are_position_derived(position in 1i64..1000) {
            let table = MetadataTable::new(vec![scale_row(position, "V1")])
                .expect("unique original id");
            let oracle = MockOracle::with_responses(["unused"]);

            let renamed = rename(table, &oracle).expect("deterministic rename");
            prop_assert_eq!(renamed.rows()[0].id.clone(), format!("Q{}", position));
            prop_assert!(oracle.requests().is_empty());
        }
    }
}

// =============================================================================
// Consistency Gate Properties
// =============================================================================

mod gate_tests {
    use super::*;

    fn fixture_table(count: usize) -> MetadataTable {
        let rows = (0..count)
            .map(|index| scale_row(index as i64 + 1, &format!("V{}", index + 1)))
            .collect();
        MetadataTable::new(rows).expect("unique original ids")
    }

    proptest! {
        /// Matching history always appends with an incremented counter, no
        /// matter how the persisted pairs are ordered.
        #[test]
        fn test_matching_history_appends(
            count in 1usize..20,
            load_counter in 0u64..1000,
        ) {
            let current = fixture_table(count);
            let mut pairs = current.consistency_pairs();
            pairs.reverse();
            let prior = PriorMetadata { load_counter, pairs };

            let decision = preload_check("s", &current, Some(&prior))
                .expect("matching structure");
            prop_assert_eq!(decision.load_counter(), load_counter + 1);
        }

        /// The preload check never mutates its inputs: running it twice
        /// yields the same decision.
        #[test]
        fn test_preload_check_is_idempotent(count in 1usize..20) {
            let current = fixture_table(count);
            let prior = PriorMetadata {
                load_counter: 0,
                pairs: current.consistency_pairs(),
            };

            let first = preload_check("s", &current, Some(&prior)).expect("match");
            let second = preload_check("s", &current, Some(&prior)).expect("match");
            prop_assert_eq!(first, second);
        }

        /// Absent history is always a first load.
        #[test]
        fn test_no_history_is_first_load(count in 0usize..20) {
            let current = fixture_table(count);
            let decision = preload_check("s", &current, None).expect("first load");
            prop_assert_eq!(decision, LoadDecision::FirstLoad);
        }
    }
}

// =============================================================================
// Casting Properties
// =============================================================================

mod cast_tests {
    use super::*;

    fn single_column(column: &str, value: &str) -> ResponseTable {
        ResponseTable::new(vec![column.to_string()], vec![vec![value.to_string()]])
            .expect("rectangular")
    }

    fn platform_schema() -> ResultsSchema {
        ResultsSchema::build(&MetadataTable::new(vec![]).expect("empty table"))
    }

    proptest! {
        /// Integers survive a render/cast round trip exactly.
        #[test]
        fn test_integer_round_trip(value in any::<i64>()) {
            let schema = platform_schema();
            let typed = cast(&single_column("pagetime1", &value.to_string()), &schema)
                .expect("integer casts");
            prop_assert_eq!(typed.get(0, "pagetime1"), Some(&CellValue::Int(value)));

            let rendered = typed.get(0, "pagetime1").expect("cell").render();
            let again = cast(&single_column("pagetime1", &rendered), &schema)
                .expect("rendered integer casts");
            prop_assert_eq!(again.get(0, "pagetime1"), typed.get(0, "pagetime1"));
        }

        /// Finite floats survive a render/cast round trip exactly.
        #[test]
        fn test_float_round_trip(value in proptest::num::f64::NORMAL) {
            let schema = platform_schema();
            let typed = cast(&single_column("duration", &value.to_string()), &schema)
                .expect("float casts");

            let rendered = typed.get(0, "duration").expect("cell").render();
            let again = cast(&single_column("duration", &rendered), &schema)
                .expect("rendered float casts");
            prop_assert_eq!(again.get(0, "duration"), typed.get(0, "duration"));
        }

        /// Well-formed dates cast and render back verbatim.
        #[test]
        fn test_date_round_trip(
            year in 2000i32..2100,
            month in 1u32..=12,
            day in 1u32..=28,
        ) {
            let schema = platform_schema();
            let wire = format!("{:04}-{:02}-{:02}", year, month, day);
            let typed = cast(&single_column("date", &wire), &schema).expect("date casts");
            let rendered = typed.get(0, "date").expect("cell").render();
            prop_assert_eq!(rendered, wire);
        }

        /// Booleans never fail to cast, whatever the raw cell contains.
        #[test]
        fn test_boolean_casting_is_total(raw in any_short_string()) {
            let schema = platform_schema();
            let typed = cast(&single_column("completed", &raw), &schema)
                .expect("boolean casting is total");
            let value = typed.get(0, "completed").expect("cell");
            prop_assert!(matches!(
                value,
                CellValue::Bool(_) | CellValue::Null
            ));
        }
    }
}
