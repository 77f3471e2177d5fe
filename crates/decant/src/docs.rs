//! Markdown codebook generation.

use crate::metadata::{MetadataRow, MetadataTable};

/// Render the survey codebook: one section per question with a table of its
/// variables, the range/enumeration metadata, and the other-flags.
pub fn render_codebook(survey_id: &str, metadata: &MetadataTable) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Codebook: {}\n\n", survey_id));
    out.push_str(&format!("{} variables.\n", metadata.len()));

    for question in group_by_question(metadata) {
        let first = question[0];
        out.push_str(&format!(
            "\n## {} — {}\n\n",
            name_stem(&first.id),
            first.question_text
        ));
        out.push_str(&format!(
            "Question {} ({}), page {}, position {}.\n\n",
            first.descriptor.question_id,
            first.descriptor.question_type,
            first.page,
            first.descriptor.position
        ));

        out.push_str("| id | original id | type | details |\n");
        out.push_str("|---|---|---|---|\n");
        for row in &question {
            out.push_str(&format!(
                "| `{}` | `{}` | {} | {} |\n",
                row.id,
                row.descriptor.original_id,
                row.descriptor.value_type,
                details(row)
            ));
        }
    }

    out
}

/// Consecutive rows of one question.
fn group_by_question(metadata: &MetadataTable) -> Vec<Vec<&MetadataRow>> {
    let mut groups: Vec<Vec<&MetadataRow>> = Vec::new();
    for row in metadata.rows() {
        match groups.last_mut() {
            Some(group) if group[0].descriptor.question_id == row.descriptor.question_id => {
                group.push(row)
            }
            _ => groups.push(vec![row]),
        }
    }
    groups
}

/// Shared name stem of a question's variables ("Q5_rot" -> "Q5").
fn name_stem(id: &str) -> &str {
    id.split('_').next().unwrap_or(id)
}

fn details(row: &MetadataRow) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(label) = &row.descriptor.label {
        parts.push(label.clone());
    }
    match (row.descriptor.range_min, row.descriptor.range_max) {
        (None, None) => {}
        (min, max) => parts.push(format!(
            "range {}..{}",
            min.map(fmt_bound).unwrap_or_default(),
            max.map(fmt_bound).unwrap_or_default()
        )),
    }
    if let Some(values) = &row.descriptor.possible_values {
        let rendered: Vec<String> = values
            .iter()
            .map(|(code, label)| format!("{}={}", code, label))
            .collect();
        parts.push(rendered.join(", "));
    }
    if let Some(labels) = &row.descriptor.scale_labels {
        parts.push(format!("scale: {}", labels.join(" / ")));
    }
    if row.descriptor.is_other_boolean {
        parts.push("other toggle".to_string());
    }
    if row.descriptor.is_other_text {
        parts.push("other text".to_string());
    }
    parts.join("; ")
}

fn fmt_bound(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
