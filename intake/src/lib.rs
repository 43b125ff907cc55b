//! Intake - conversational intake assistant
//!
//! A user uploads a PDF; its text becomes the assistant's knowledge. The
//! assistant then asks one question per turn, each time handing the model the
//! whole transcript, until the model replies with a summary.
//!
//! # Modules
//!
//! - [`dialogue`] - Two-state dialogue engine and the name/summary heuristics
//! - [`session`] - Ties a knowledge store to a dialogue
//! - [`llm`] - LLM client trait with OpenAI and Anthropic implementations
//! - [`prompts`] - Handlebars prompt templates
//! - [`repl`] - Terminal front end
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod dialogue;
pub mod llm;
pub mod prompts;
pub mod repl;
pub mod session;

pub use config::Config;
pub use dialogue::{DialogueEngine, DialogueError, DialoguePhase, DialogueState, TurnOutcome};
pub use session::{Session, SessionError};

/// Build a dialogue engine from configuration
pub fn build_engine(config: &Config, llm: std::sync::Arc<dyn llm::LlmClient>) -> DialogueEngine {
    let base = std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
    DialogueEngine::new(llm, prompts::PromptLoader::new(base))
        .with_max_tokens(config.llm.max_tokens)
        .with_temperature(config.llm.temperature)
}
