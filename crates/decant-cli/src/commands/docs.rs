//! Docs command - regenerate the codebook from stored metadata.

use std::path::PathBuf;

use colored::Colorize;
use decant::docs::render_codebook;
use decant::{MetadataTable, SurveyStore};

pub fn run(
    survey_id: String,
    store: PathBuf,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = SurveyStore::new(store);
    let metadata = store
        .load_metadata(&survey_id)?
        .ok_or_else(|| format!("no stored metadata for survey '{}'", survey_id))?;

    let table = MetadataTable::new(metadata.rows)?;
    let codebook = render_codebook(&survey_id, &table);

    let path = output.unwrap_or_else(|| PathBuf::from(format!("{}.md", survey_id)));
    std::fs::write(&path, codebook)?;

    println!(
        "{} codebook to {}",
        "Wrote".green().bold(),
        path.display().to_string().white()
    );
    Ok(())
}
