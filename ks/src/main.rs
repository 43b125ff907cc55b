use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use knowledgestore::KnowledgeStore;
use knowledgestore::cli::{Cli, Command};
use knowledgestore::config::Config;

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let store_path = cli.store.unwrap_or(config.store_path);

    info!("knowledgestore starting");

    match cli.command {
        Command::Ingest { path } => {
            let store = KnowledgeStore::open(&store_path)?;
            let bytes = std::fs::read(&path).context(format!("Failed to read {}", path.display()))?;
            let text = knowledgestore::ingest(&store, &bytes)?;
            println!(
                "{} Ingested {} chars into {}",
                "✓".green(),
                text.len(),
                store.path().display().to_string().cyan()
            );
        }
        Command::Extract { path, pages } => {
            let bytes = std::fs::read(&path).context(format!("Failed to read {}", path.display()))?;
            if pages {
                for page in knowledgestore::extract_pages(&bytes)? {
                    println!("{}", format!("--- page {} ---", page.page_number).dimmed());
                    println!("{}", page.text);
                }
            } else {
                print!("{}", knowledgestore::extract_text(&bytes)?);
            }
        }
        Command::Show { json } => {
            let store = KnowledgeStore::open(&store_path)?;
            let record = store.load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else if record.is_empty() {
                println!("No knowledge stored");
            } else {
                println!("{}", record.general_info);
            }
        }
        Command::Clear => {
            let store = KnowledgeStore::open(&store_path)?;
            store.clear()?;
            println!("{} Cleared {}", "✓".green(), store.path().display());
        }
    }

    Ok(())
}
