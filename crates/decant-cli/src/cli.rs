//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Decant: survey ETL pipeline
#[derive(Parser)]
#[command(name = "decant")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full ETL pipeline for one poll
    Etl {
        /// Platform poll identifier
        #[arg(long)]
        poll_id: i64,

        /// Logical survey identifier (store key; defaults to the poll id)
        #[arg(long)]
        survey_id: Option<String>,

        /// Use the offline mock oracle instead of the LLM
        #[arg(long)]
        mock_oracle: bool,

        /// Root directory of the survey store
        #[arg(long, default_value = "store")]
        store: PathBuf,

        /// Output directory for the generated codebook
        #[arg(long, default_value = "docs")]
        docs: PathBuf,
    },

    /// Regenerate the codebook from stored metadata
    Docs {
        /// Logical survey identifier
        #[arg(long)]
        survey_id: String,

        /// Root directory of the survey store
        #[arg(long, default_value = "store")]
        store: PathBuf,

        /// Output path (default: <survey_id>.md in the current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show load counter and last fetch provenance
    Status {
        /// Logical survey identifier
        #[arg(long)]
        survey_id: String,

        /// Root directory of the survey store
        #[arg(long, default_value = "store")]
        store: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
