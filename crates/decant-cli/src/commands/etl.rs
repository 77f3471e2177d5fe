//! Etl command - run the full pipeline for one poll.

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use decant::{Config, MockOracle, NamingOracle, OpenAiOracle, Pipeline};
use log::info;

pub fn run(
    poll_id: i64,
    survey_id: Option<String>,
    mock_oracle: bool,
    store: PathBuf,
    docs: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let survey_id = survey_id.unwrap_or_else(|| poll_id.to_string());

    let api_url = std::env::var("DECANT_API_URL")
        .map_err(|_| "DECANT_API_URL environment variable not set")?;
    let api_token = std::env::var("DECANT_API_TOKEN")
        .map_err(|_| "DECANT_API_TOKEN environment variable not set")?;

    let config = Config::new(survey_id, poll_id, api_url, api_token)?
        .with_store_dir(store)
        .with_docs_dir(docs);

    let oracle: Arc<dyn NamingOracle> = if mock_oracle {
        Arc::new(MockOracle::new())
    } else {
        Arc::new(OpenAiOracle::from_env()?)
    };
    info!(
        "running etl for poll {} with the '{}' oracle",
        poll_id,
        oracle.name()
    );

    let pipeline = Pipeline::new(config, oracle);
    let summary = pipeline.run()?;

    println!(
        "{} survey '{}', load {}",
        "Loaded".green().bold(),
        summary.survey_id.white(),
        summary.load_counter.to_string().cyan()
    );
    println!("  Variables:   {}", summary.variables);
    println!("  Rows loaded: {}", summary.rows_loaded);
    println!("  Rows total:  {}", summary.total_rows);

    Ok(())
}
