//! Variable descriptor construction per question shape.

use indexmap::IndexMap;

use crate::error::Result;
use crate::metadata::VariableDescriptor;
use crate::poll::{Group, InputKind, Question};
use crate::schema::ValueType;

use super::category::QuestionCategory;
use super::shape::Shape;

/// Classify one question into its category and variable descriptors.
///
/// `position` is the question's absolute 1-based position in the survey,
/// assigned by the assembler. Descriptors come back in group/definition
/// order, one per platform variable.
pub fn classify(
    question: &Question,
    position: i64,
) -> Result<(QuestionCategory, Vec<VariableDescriptor>)> {
    match Shape::resolve(question)? {
        Shape::InputSingle { group, kind } => {
            let category = QuestionCategory::InputSingle(kind);
            let descriptor = input_descriptor(question.id, 0, group, kind, position, category);
            Ok((category, vec![descriptor]))
        }
        Shape::InputMultiple { groups, kind } => {
            let category = QuestionCategory::InputMultiple(kind);
            let variables = groups
                .iter()
                .enumerate()
                .map(|(index, group)| {
                    input_descriptor(question.id, index, group, kind, position, category)
                })
                .collect();
            Ok((category, variables))
        }
        Shape::SingleChoice { group } => {
            let category = QuestionCategory::SingleChoice;
            let mut descriptor = VariableDescriptor::new(
                question.id,
                0,
                group.varnames[0].clone(),
                position,
                category,
                ValueType::String,
            );
            descriptor.possible_values = possible_values(group);
            Ok((category, vec![descriptor]))
        }
        Shape::MultipleChoice { group } => {
            let category = QuestionCategory::MultipleChoice;
            let variables = group
                .varnames
                .iter()
                .zip(&group.labels)
                .map(|(varname, label)| {
                    let mut descriptor = VariableDescriptor::new(
                        question.id,
                        0,
                        varname.clone(),
                        position,
                        category,
                        ValueType::Boolean,
                    );
                    descriptor.label = label.german().map(str::to_string);
                    descriptor
                })
                .collect();
            Ok((category, variables))
        }
        Shape::MultipleChoiceOther {
            primary,
            other,
            other_index,
        } => {
            let category = QuestionCategory::MultipleChoiceOther;
            let mut variables = Vec::with_capacity(primary.varnames.len() + 1);
            let mut other_label = String::new();

            for (index, (varname, label)) in
                primary.varnames.iter().zip(&primary.labels).enumerate()
            {
                let mut descriptor = VariableDescriptor::new(
                    question.id,
                    0,
                    varname.clone(),
                    position,
                    category,
                    ValueType::Boolean,
                );
                if index == other_index {
                    descriptor.is_other_boolean = true;
                    other_label = label.german().unwrap_or("Other").to_string();
                    descriptor.label = Some(other_label.clone());
                } else {
                    descriptor.label = label.german().map(str::to_string);
                }
                variables.push(descriptor);
            }

            let mut text = VariableDescriptor::new(
                question.id,
                1,
                other.varnames[0].clone(),
                position,
                category,
                ValueType::String,
            );
            text.is_other_text = true;
            text.label = Some(format!("{} (Text)", other_label));
            variables.push(text);

            Ok((category, variables))
        }
        Shape::Matrix { group } => {
            let category = QuestionCategory::Matrix;
            let scale_labels: Vec<String> = group
                .labels
                .iter()
                .map(|label| label.german().unwrap_or_default().to_string())
                .collect();
            let (min, max) = matrix_range(group);
            let variables = group
                .varnames
                .iter()
                .zip(&group.items)
                .map(|(varname, item)| {
                    let mut descriptor = VariableDescriptor::new(
                        question.id,
                        0,
                        varname.clone(),
                        position,
                        category,
                        ValueType::Integer,
                    )
                    .with_range(min, max);
                    descriptor.label = item.name.german().map(str::to_string);
                    descriptor.scale_labels = Some(scale_labels.clone());
                    descriptor
                })
                .collect();
            Ok((category, variables))
        }
        Shape::Scale { group } => {
            let category = QuestionCategory::Scale;
            let descriptor = VariableDescriptor::new(
                question.id,
                0,
                group.varnames[0].clone(),
                position,
                category,
                ValueType::Integer,
            )
            .with_range(group.range_min(), group.range_max());
            Ok((category, vec![descriptor]))
        }
    }
}

fn input_descriptor(
    question_id: i64,
    group_index: usize,
    group: &Group,
    kind: InputKind,
    position: i64,
    category: QuestionCategory,
) -> VariableDescriptor {
    let value_type = match kind {
        InputKind::Integer => ValueType::Integer,
        InputKind::Singleline | InputKind::Multiline => ValueType::String,
    };
    let mut descriptor = VariableDescriptor::new(
        question_id,
        group_index,
        group.varnames[0].clone(),
        position,
        category,
        value_type,
    );
    // Group name wins; the lone item's name is the placeholder fallback.
    descriptor.label = group
        .name
        .german()
        .or_else(|| group.items[0].name.german())
        .map(str::to_string);
    descriptor
}

/// Code-to-label mapping for a single-choice group.
///
/// Codes are auto-numbered 1..N in label order only when every code is blank
/// or missing; with a mix of explicit and blank codes the blank-code entries
/// are dropped instead, so a synthetic code can never shadow an explicit one.
/// Entries without a usable label are dropped; a codes/labels length mismatch
/// or an empty result yields no mapping at all.
fn possible_values(group: &Group) -> Option<IndexMap<String, String>> {
    if group.labels.is_empty() {
        return None;
    }

    let all_blank = group.codes.is_empty() || group.codes.iter().all(|c| c.trim().is_empty());
    let codes: Vec<String> = if all_blank {
        (1..=group.labels.len()).map(|i| i.to_string()).collect()
    } else {
        group.codes.clone()
    };
    if codes.len() != group.labels.len() {
        return None;
    }

    let mut values = IndexMap::new();
    for (code, label) in codes.iter().zip(&group.labels) {
        if code.trim().is_empty() {
            continue;
        }
        let Some(text) = label.german() else {
            continue;
        };
        values.insert(code.clone(), text.to_string());
    }

    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

/// Matrix range: the group's range when it carries both ends, else
/// `[1, len(labels)]`.
fn matrix_range(group: &Group) -> (Option<f64>, Option<f64>) {
    match &group.range {
        Some(range) if range.len() >= 2 => (group.range_min(), group.range_max()),
        _ => (Some(1.0), Some(group.labels.len() as f64)),
    }
}
