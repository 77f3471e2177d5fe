//! Assembly of the metadata table from classified questions.

use indexmap::IndexMap;
use log::debug;

use crate::classify::classify;
use crate::error::Result;
use crate::poll::Question;

use super::table::{MetadataRow, MetadataTable};

/// Classify every question and flatten the result into one metadata table.
///
/// Questions are processed in fetch order: the absolute position is the
/// 1-based index in that order, and pages are numbered 1..N by first
/// appearance of their platform page id. Rows keep classification order; the
/// `id` column initially repeats the platform identifier.
pub fn assemble(questions: &[Question]) -> Result<MetadataTable> {
    let pages = page_numbers(questions);
    let mut rows = Vec::new();

    for (index, question) in questions.iter().enumerate() {
        let position = (index + 1) as i64;
        let page = pages[&question.page_id];
        let text = question.text()?.to_string();

        let (category, variables) = classify(question, position)?;
        debug!(
            "question {} at position {} (page {}): {} -> {} variable(s)",
            question.id,
            position,
            page,
            category,
            variables.len()
        );

        for descriptor in variables {
            rows.push(MetadataRow {
                id: descriptor.original_id.clone(),
                descriptor,
                question_text: text.clone(),
                page,
            });
        }
    }

    MetadataTable::new(rows)
}

/// Page numbers 1..N in first-seen order of the platform page ids.
fn page_numbers(questions: &[Question]) -> IndexMap<i64, i64> {
    let mut pages = IndexMap::new();
    for question in questions {
        let next = pages.len() as i64 + 1;
        pages.entry(question.page_id).or_insert(next);
    }
    pages
}
