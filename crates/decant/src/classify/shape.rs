//! Recognized question shapes.
//!
//! Classification is split in two steps: [`Shape::resolve`] matches a
//! question's `(type tag, group layout)` against the closed set of shapes the
//! platform is known to produce, validating every structural rule along the
//! way; the classifier then builds variable descriptors from the validated
//! payload without re-checking anything.

use crate::error::{DecantError, Result};
use crate::poll::{Group, InputKind, Question, TypeTag};

/// A question shape the classifier knows how to handle.
///
/// Each variant borrows the validated groups it needs, so constructing a
/// `Shape` proves the structural invariants of its category hold.
#[derive(Debug)]
pub enum Shape<'a> {
    /// INPUT with one group: one free-text variable.
    InputSingle { group: &'a Group, kind: InputKind },
    /// INPUT with several groups: one free-text variable per group, all of
    /// the same input kind.
    InputMultiple { groups: &'a [Group], kind: InputKind },
    /// CHOICE with one group and one varname.
    SingleChoice { group: &'a Group },
    /// CHOICE with one group and several varnames, one label each.
    MultipleChoice { group: &'a Group },
    /// CHOICE with a second "please specify" text group. `other_index`
    /// locates the primary varname acting as the "other" toggle.
    MultipleChoiceOther {
        primary: &'a Group,
        other: &'a Group,
        other_index: usize,
    },
    /// MATRIX with one group: one ordinal variable per item.
    Matrix { group: &'a Group },
    /// SCALE with one group carrying a numeric range.
    Scale { group: &'a Group },
}

impl<'a> Shape<'a> {
    /// Match a question against the recognized shapes.
    ///
    /// Returns `UnknownQuestionType` for a `(type tag, group count)`
    /// combination outside the table, and `MalformedQuestion` when the
    /// combination is recognized but a structural rule is violated.
    pub fn resolve(question: &'a Question) -> Result<Self> {
        let id = question.id;
        match (question.type_tag, question.groups.as_slice()) {
            (TypeTag::Input, [group]) => {
                let kind = validate_input_group(id, group)?;
                Ok(Shape::InputSingle { group, kind })
            }
            (TypeTag::Input, groups) if groups.len() > 1 => {
                let kind = validate_input_group(id, &groups[0])?;
                for group in &groups[1..] {
                    let other_kind = validate_input_group(id, group)?;
                    if other_kind != kind {
                        return Err(malformed(
                            id,
                            format!(
                                "multi-input groups mix input types ({} vs {})",
                                kind.code(),
                                other_kind.code()
                            ),
                        ));
                    }
                }
                Ok(Shape::InputMultiple { groups, kind })
            }
            (TypeTag::Choice, [group]) => match group.varnames.len() {
                0 => Err(malformed(id, "choice group has no varnames".to_string())),
                1 => {
                    if group.items.len() != 1 {
                        return Err(malformed(
                            id,
                            format!(
                                "single choice has {} items, expected 1",
                                group.items.len()
                            ),
                        ));
                    }
                    Ok(Shape::SingleChoice { group })
                }
                n => {
                    if group.labels.len() != n {
                        return Err(malformed(
                            id,
                            format!(
                                "multiple choice has {} varnames but {} labels",
                                n,
                                group.labels.len()
                            ),
                        ));
                    }
                    Ok(Shape::MultipleChoice { group })
                }
            },
            (TypeTag::Choice, [primary, other]) => {
                if primary.varnames.len() <= 1 {
                    return Err(malformed(
                        id,
                        format!(
                            "choice with other text has {} primary varnames, expected more than 1",
                            primary.varnames.len()
                        ),
                    ));
                }
                if primary.labels.len() != primary.varnames.len() {
                    return Err(malformed(
                        id,
                        format!(
                            "choice group has {} varnames but {} labels",
                            primary.varnames.len(),
                            primary.labels.len()
                        ),
                    ));
                }
                let other_index = validate_other_group(id, primary, other)?;
                Ok(Shape::MultipleChoiceOther {
                    primary,
                    other,
                    other_index,
                })
            }
            (TypeTag::Matrix, [group]) => {
                if group.items.len() != group.varnames.len() {
                    return Err(malformed(
                        id,
                        format!(
                            "matrix has {} items but {} varnames",
                            group.items.len(),
                            group.varnames.len()
                        ),
                    ));
                }
                if group.varnames.len() <= 1 {
                    return Err(malformed(id, "matrix needs more than one row".to_string()));
                }
                if group.labels.len() <= 1 {
                    return Err(malformed(
                        id,
                        "matrix needs more than one scale label".to_string(),
                    ));
                }
                Ok(Shape::Matrix { group })
            }
            (TypeTag::Scale, [group]) => {
                if group.varnames.len() != 1 {
                    return Err(malformed(
                        id,
                        format!("scale has {} varnames, expected 1", group.varnames.len()),
                    ));
                }
                Ok(Shape::Scale { group })
            }
            (tag, groups) => Err(DecantError::UnknownQuestionType {
                question_id: id,
                type_tag: tag.as_str().to_string(),
                group_count: groups.len(),
            }),
        }
    }
}

/// One group of a single- or multi-input question: exactly one varname, one
/// item placeholder, no labels, and a declared input kind.
fn validate_input_group(question_id: i64, group: &Group) -> Result<InputKind> {
    if group.varnames.len() != 1 {
        return Err(malformed(
            question_id,
            format!("input group has {} varnames, expected 1", group.varnames.len()),
        ));
    }
    if group.items.len() != 1 {
        return Err(malformed(
            question_id,
            format!("input group has {} items, expected 1", group.items.len()),
        ));
    }
    if !group.labels.is_empty() {
        return Err(malformed(
            question_id,
            format!("input group has {} labels, expected none", group.labels.len()),
        ));
    }
    group
        .input_type
        .ok_or_else(|| malformed(question_id, "input group has no input type".to_string()))
}

/// The "other" text group of a `multiple_choice_other` question.
///
/// The platform names its variable `<primary varname>.1`; the prefix
/// identifies which primary choice is the "other" toggle. Returns the index
/// of that varname within the primary group.
fn validate_other_group(question_id: i64, primary: &Group, other: &Group) -> Result<usize> {
    let [varname] = other.varnames.as_slice() else {
        return Err(malformed(
            question_id,
            format!(
                "other text group has {} varnames, expected 1",
                other.varnames.len()
            ),
        ));
    };
    if other.items.len() != 1 {
        return Err(malformed(
            question_id,
            format!("other text group has {} items, expected 1", other.items.len()),
        ));
    }
    if other.input_type != Some(InputKind::Singleline) {
        return Err(malformed(
            question_id,
            format!("other text group of varname '{}' is not SINGLELINE", varname),
        ));
    }
    let Some((prefix, suffix)) = varname.split_once('.') else {
        return Err(malformed(
            question_id,
            format!("other text varname '{}' has no '.' suffix", varname),
        ));
    };
    if suffix != "1" {
        return Err(malformed(
            question_id,
            format!("other text varname '{}' does not end in '.1'", varname),
        ));
    }
    primary
        .varnames
        .iter()
        .position(|v| v == prefix)
        .ok_or_else(|| {
            malformed(
                question_id,
                format!(
                    "other text varname '{}' has no matching primary varname '{}'",
                    varname, prefix
                ),
            )
        })
}

fn malformed(question_id: i64, message: String) -> DecantError {
    DecantError::MalformedQuestion {
        question_id,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poll::{Item, Localized};

    fn input_group(varname: &str, kind: InputKind) -> Group {
        Group {
            id: 0,
            name: Localized::default(),
            varnames: vec![varname.to_string()],
            labels: vec![],
            codes: vec![],
            items: vec![Item {
                id: "1".to_string(),
                name: Localized::german_only("Eingabe"),
            }],
            input_type: Some(kind),
            range: None,
        }
    }

    fn question(type_tag: TypeTag, groups: Vec<Group>) -> Question {
        Question {
            id: 1,
            poll_id: 1,
            type_tag,
            question: Localized::german_only("Frage?"),
            position: 1,
            page_id: 100,
            groups,
        }
    }

    #[test]
    fn test_input_single_resolves() {
        let q = question(TypeTag::Input, vec![input_group("V1", InputKind::Integer)]);
        let shape = Shape::resolve(&q).unwrap();
        assert!(matches!(
            shape,
            Shape::InputSingle {
                kind: InputKind::Integer,
                ..
            }
        ));
    }

    #[test]
    fn test_input_with_labels_is_malformed() {
        let mut group = input_group("V1", InputKind::Singleline);
        group.labels = vec![Localized::german_only("Label")];
        let q = question(TypeTag::Input, vec![group]);
        assert!(matches!(
            Shape::resolve(&q),
            Err(DecantError::MalformedQuestion { .. })
        ));
    }

    #[test]
    fn test_mixed_input_kinds_are_malformed() {
        let q = question(
            TypeTag::Input,
            vec![
                input_group("V1", InputKind::Singleline),
                input_group("V2", InputKind::Integer),
            ],
        );
        assert!(matches!(
            Shape::resolve(&q),
            Err(DecantError::MalformedQuestion { .. })
        ));
    }

    #[test]
    fn test_single_choice_requires_one_item() {
        let group = Group {
            id: 0,
            name: Localized::default(),
            varnames: vec!["V3".to_string()],
            labels: vec![Localized::german_only("Ja"), Localized::german_only("Nein")],
            codes: vec![],
            items: vec![],
            input_type: None,
            range: None,
        };
        let q = question(TypeTag::Choice, vec![group]);
        let err = Shape::resolve(&q).unwrap_err();
        assert!(err.to_string().contains("single choice has 0 items"));
    }

    #[test]
    fn test_other_requires_multiple_primary_varnames() {
        // A lone "other" toggle is not a valid multiple choice.
        let primary = Group {
            id: 0,
            name: Localized::default(),
            varnames: vec!["V9".to_string()],
            labels: vec![Localized::german_only("Anderes")],
            codes: vec![],
            items: vec![],
            input_type: None,
            range: None,
        };
        let other = input_group("V9.1", InputKind::Singleline);
        let q = question(TypeTag::Choice, vec![primary, other]);
        assert!(matches!(
            Shape::resolve(&q),
            Err(DecantError::MalformedQuestion { .. })
        ));
    }

    #[test]
    fn test_other_group_prefix_must_match() {
        let primary = Group {
            id: 0,
            name: Localized::default(),
            varnames: vec!["V9".to_string(), "V10".to_string()],
            labels: vec![
                Localized::german_only("Spaß"),
                Localized::german_only("Anderes"),
            ],
            codes: vec![],
            items: vec![],
            input_type: None,
            range: None,
        };
        let other = input_group("V99.1", InputKind::Singleline);
        let q = question(TypeTag::Choice, vec![primary, other]);
        let err = Shape::resolve(&q).unwrap_err();
        assert!(err.to_string().contains("V99.1"));
    }

    #[test]
    fn test_unrecognized_combination() {
        let q = question(TypeTag::Scale, vec![]);
        assert!(matches!(
            Shape::resolve(&q),
            Err(DecantError::UnknownQuestionType {
                group_count: 0,
                ..
            })
        ));
    }
}
