//! Status command - show load counter and provenance for a survey.

use std::path::PathBuf;

use colored::Colorize;
use decant::SurveyStore;

pub fn run(
    survey_id: String,
    store: PathBuf,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = SurveyStore::new(store);

    let Some(metadata) = store.load_metadata(&survey_id)? else {
        return Err(format!(
            "no stored metadata for survey '{}'. Run 'decant etl' first.",
            survey_id
        )
        .into());
    };
    let results = store.load_results(&survey_id)?;

    if json_output {
        let status = serde_json::json!({
            "survey_id": metadata.survey_id,
            "load_counter": metadata.load_counter,
            "variables": metadata.rows.len(),
            "rows": results.len(),
            "provenance": {
                "source": metadata.provenance.source,
                "sha256": metadata.provenance.sha256,
                "fetched_at": metadata.provenance.fetched_at,
            },
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!(
            "{} {}",
            "Survey".cyan().bold(),
            metadata.survey_id.white()
        );
        println!("  Load counter: {}", metadata.load_counter.to_string().green());
        println!("  Variables:    {}", metadata.rows.len());
        println!("  Rows stored:  {}", results.len());
        println!("  Fetched from: {}", metadata.provenance.source);
        println!("  Fetched at:   {}", metadata.provenance.fetched_at);
        println!("  Payload hash: {}", metadata.provenance.sha256);
    }

    Ok(())
}
