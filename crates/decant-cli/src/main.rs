//! Decant CLI - survey ETL pipeline.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Commands::Etl {
            poll_id,
            survey_id,
            mock_oracle,
            store,
            docs,
        } => commands::etl::run(poll_id, survey_id, mock_oracle, store, docs),

        Commands::Docs {
            survey_id,
            store,
            output,
        } => commands::docs::run(survey_id, store, output),

        Commands::Status {
            survey_id,
            store,
            json,
        } => commands::status::run(survey_id, store, json),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
