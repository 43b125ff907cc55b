//! CLI argument parsing for knowledgestore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ks")]
#[command(author, version, about = "Single-record knowledge store", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Knowledge file (overrides the config)
    #[arg(short, long)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract a PDF and replace the stored knowledge with its text
    Ingest {
        /// PDF file to ingest
        #[arg(required = true)]
        path: PathBuf,
    },

    /// Print the text of a PDF without storing it
    Extract {
        /// PDF file to extract
        #[arg(required = true)]
        path: PathBuf,

        /// Print page by page with headers
        #[arg(short, long)]
        pages: bool,
    },

    /// Show the stored knowledge
    Show {
        /// Print the raw JSON record
        #[arg(long)]
        json: bool,
    },

    /// Remove the stored knowledge
    Clear,
}
