//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::{ASSISTANT_TEMPLATE, embedded};

/// The five named fields of a dialogue turn prompt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PromptContext {
    /// Name the assistant introduces itself with
    pub assistant_name: String,
    /// Stored knowledge text
    pub knowledge: String,
    /// Transcript so far, including the latest user line
    pub history: String,
    /// Question the user was answering
    pub current_question: String,
    /// The user's latest answer
    pub user_response: String,
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (e.g., `.intake/prompts/`)
    user_dir: Option<PathBuf>,
    /// Project default directory (e.g., `prompts/`)
    repo_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a new prompt loader rooted at `base`
    ///
    /// Looks for `.intake/prompts/` and `prompts/` under `base`.
    pub fn new(base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        debug!(?base, "PromptLoader::new: called");
        let user_dir = base.join(".intake/prompts");
        let repo_dir = base.join("prompts");

        let user_dir_exists = user_dir.exists();
        let repo_dir_exists = repo_dir.exists();
        debug!(
            ?user_dir,
            %user_dir_exists,
            ?repo_dir,
            %repo_dir_exists,
            "PromptLoader::new: checking directories"
        );

        Self {
            hbs: Self::engine(),
            user_dir: user_dir_exists.then_some(user_dir),
            repo_dir: repo_dir_exists.then_some(repo_dir),
        }
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            user_dir: None,
            repo_dir: None,
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        hbs.set_strict_mode(true);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `.intake/prompts/{name}.pmt`
    /// 2. Project default: `prompts/{name}.pmt`
    /// 3. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        for dir in [&self.user_dir, &self.repo_dir].into_iter().flatten() {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found on disk");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt {}: {}", path.display(), e));
            }
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!(%name, "PromptLoader::load_template: found in embedded");
            return Ok(content.to_string());
        }

        debug!(%name, "PromptLoader::load_template: not found anywhere");
        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &PromptContext) -> Result<String> {
        debug!(%template_name, history_len = context.history.len(), "PromptLoader::render: called");
        let template = self.load_template(template_name)?;
        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }

    /// Render the per-turn dialogue prompt
    pub fn render_turn(&self, context: &PromptContext) -> Result<String> {
        self.render(ASSISTANT_TEMPLATE, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn context() -> PromptContext {
        PromptContext {
            assistant_name: "Dr. Aria".to_string(),
            knowledge: "Full Name: Dr. Aria\nSpecialty: <cardiology> & more".to_string(),
            history: "User: my chest hurts\n".to_string(),
            current_question: "What seems to be the problem?".to_string(),
            user_response: "my chest hurts".to_string(),
        }
    }

    #[test]
    fn test_render_turn_fills_all_fields() {
        let loader = PromptLoader::embedded_only();
        let rendered = loader.render_turn(&context()).unwrap();

        assert!(rendered.starts_with("You are Dr. Aria, a knowledgeable medical assistant bot."));
        assert!(rendered.contains("Conversation History:\nUser: my chest hurts\n"));
        assert!(rendered.contains("Current Question:\nWhat seems to be the problem?"));
        assert!(rendered.contains("User's Response:\nmy chest hurts"));
        assert!(!rendered.contains("{{"));
    }

    #[test]
    fn test_render_does_not_escape_html() {
        let loader = PromptLoader::embedded_only();
        let rendered = loader.render_turn(&context()).unwrap();
        assert!(rendered.contains("<cardiology> & more"));
    }

    #[test]
    fn test_render_empty_knowledge() {
        let loader = PromptLoader::embedded_only();
        let ctx = PromptContext {
            knowledge: String::new(),
            ..context()
        };
        assert!(loader.render_turn(&ctx).is_ok());
    }

    #[test]
    fn test_user_override_wins() {
        let temp = TempDir::new().unwrap();
        let user_dir = temp.path().join(".intake/prompts");
        std::fs::create_dir_all(&user_dir).unwrap();
        std::fs::write(user_dir.join("assistant.pmt"), "{{assistant_name}} asks: {{current_question}}").unwrap();

        let repo_dir = temp.path().join("prompts");
        std::fs::create_dir_all(&repo_dir).unwrap();
        std::fs::write(repo_dir.join("assistant.pmt"), "repo version").unwrap();

        let loader = PromptLoader::new(temp.path());
        let rendered = loader.render_turn(&context()).unwrap();
        assert_eq!(rendered, "Dr. Aria asks: What seems to be the problem?");
    }

    #[test]
    fn test_repo_dir_used_without_override() {
        let temp = TempDir::new().unwrap();
        let repo_dir = temp.path().join("prompts");
        std::fs::create_dir_all(&repo_dir).unwrap();
        std::fs::write(repo_dir.join("assistant.pmt"), "repo: {{user_response}}").unwrap();

        let loader = PromptLoader::new(temp.path());
        assert_eq!(loader.render_turn(&context()).unwrap(), "repo: my chest hurts");
    }

    #[test]
    fn test_unknown_field_in_template_is_error() {
        let temp = TempDir::new().unwrap();
        let repo_dir = temp.path().join("prompts");
        std::fs::create_dir_all(&repo_dir).unwrap();
        std::fs::write(repo_dir.join("assistant.pmt"), "{{patient_name}}").unwrap();

        let loader = PromptLoader::new(temp.path());
        assert!(loader.render_turn(&context()).is_err());
    }

    #[test]
    fn test_unknown_template() {
        let loader = PromptLoader::embedded_only();
        assert!(loader.load_template("nonexistent-template").is_err());
    }
}
