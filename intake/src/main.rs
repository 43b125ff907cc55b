//! Intake - conversational intake assistant
//!
//! CLI entry point.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info};

use intake::cli::{Cli, Command, get_log_path};
use intake::config::Config;
use intake::dialogue::{DialogueState, derive_assistant_name};
use intake::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, create_client};
use intake::repl::Repl;
use intake::{Session, build_engine};
use knowledgestore::KnowledgeStore;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Priority: CLI --log-level > config file > INFO
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(provider = %config.llm.provider, model = %config.llm.model, "Intake loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command.unwrap_or(Command::Chat { pdf: None }) {
        Command::Chat { pdf } => cmd_chat(&config, pdf).await,
        Command::Ingest { path } => cmd_ingest(&config, &path),
        Command::Knowledge { json } => cmd_knowledge(&config, json),
        Command::Prompt { response, question } => cmd_prompt(&config, &response, question),
    }
}

fn open_store(config: &Config) -> Result<KnowledgeStore> {
    KnowledgeStore::open(&config.knowledge.path)
        .context(format!("Failed to open knowledge file {}", config.knowledge.path.display()))
}

async fn cmd_chat(config: &Config, pdf: Option<PathBuf>) -> Result<()> {
    config.validate()?;

    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let engine = build_engine(config, llm);
    let mut session = Session::start(engine, open_store(config)?, config.dialogue.clone());

    if let Some(path) = pdf {
        let state = session
            .ingest_file(&path)
            .context(format!("Failed to ingest {}", path.display()))?;
        println!(
            "{} Loaded {} (assistant: {})",
            "✓".green(),
            path.display().to_string().cyan(),
            state.assistant_name().bright_white()
        );
    }

    Repl::new(session).run().await
}

fn cmd_ingest(config: &Config, path: &Path) -> Result<()> {
    let store = open_store(config)?;
    let bytes = fs::read(path).context(format!("Failed to read {}", path.display()))?;
    let text = knowledgestore::ingest(&store, &bytes)?;
    let name = derive_assistant_name(&text, &config.dialogue.default_assistant_name);

    println!(
        "{} Ingested {} chars into {}",
        "✓".green(),
        text.len(),
        store.path().display().to_string().cyan()
    );
    println!("Assistant name: {}", name.bright_white());
    Ok(())
}

fn cmd_knowledge(config: &Config, json: bool) -> Result<()> {
    let record = open_store(config)?.load()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else if record.is_empty() {
        println!("{}", "No knowledge stored".dimmed());
    } else {
        println!("{}", record.general_info);
    }
    Ok(())
}

/// Stands in for a provider when only rendering prompts
struct Offline;

#[async_trait]
impl LlmClient for Offline {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::Config("prompt preview does not call the model".to_string()))
    }
}

fn cmd_prompt(config: &Config, response: &str, question: Option<String>) -> Result<()> {
    let store = open_store(config)?;
    let knowledge = store.load()?.general_info;
    let name = derive_assistant_name(&knowledge, &config.dialogue.default_assistant_name);
    let state = DialogueState::new(name, question.unwrap_or_else(|| config.dialogue.opening_question.clone()));

    let engine = build_engine(config, Arc::new(Offline));
    let prompt = engine.render_prompt(&state, &knowledge, response)?;
    print!("{}", prompt);
    Ok(())
}
