//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// Intake - conversational intake assistant
#[derive(Parser)]
#[command(
    name = "intake",
    about = "Conversational intake assistant grounded in an uploaded PDF",
    version = env!("CARGO_PKG_VERSION"),
    after_help = after_help()
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute (defaults to chat)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive intake dialogue
    Chat {
        /// PDF to ingest before the first question
        #[arg(short, long)]
        pdf: Option<PathBuf>,
    },

    /// Extract a PDF into the knowledge file and print the assistant name
    Ingest {
        /// PDF document to ingest
        path: PathBuf,
    },

    /// Print the stored knowledge record
    Knowledge {
        /// Print the raw JSON record
        #[arg(long)]
        json: bool,
    },

    /// Render the first-turn prompt for a response without calling the model
    Prompt {
        /// The user's answer to the opening question
        response: String,

        /// Override the opening question
        #[arg(short, long)]
        question: Option<String>,
    },
}

/// Where the log file is written
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("intake")
        .join("logs")
        .join("intake.log")
}

fn after_help() -> String {
    format!("Logs are written to: {}", get_log_path().display())
}
