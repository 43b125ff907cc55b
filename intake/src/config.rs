//! Intake configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Assistant name used when the uploaded document does not name one
pub const DEFAULT_ASSISTANT_NAME: &str = "Rohit";

/// First question shown in a fresh session
pub const DEFAULT_OPENING_QUESTION: &str = "What seems to be the problem?";

/// Main Intake configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Knowledge file location
    pub knowledge: KnowledgeConfig,

    /// Dialogue defaults
    pub dialogue: DialogueConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Only the commands that talk to the model need this; ingesting a document
    /// works without an API key.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(self.llm.api_key_env()).is_err() {
            return Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env()
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .intake.yml
        let local_config = PathBuf::from(".intake.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/intake/intake.yml
        if let Some(user_config) = Self::user_config_path()
            && user_config.exists()
        {
            match Self::load_from_file(&user_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Errors are ignored here; the full load reports them once logging works.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = match config_path {
            Some(path) => vec![path.clone()],
            None => {
                let mut paths = vec![PathBuf::from(".intake.yml")];
                paths.extend(Self::user_config_path());
                paths
            }
        };

        candidates
            .iter()
            .find(|p| p.exists())
            .and_then(|p| Self::load_from_file(p).ok())
            .and_then(|c| c.log_level)
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("intake").join("intake.yml"))
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("openai" or "anthropic")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key; provider default when unset
    #[serde(rename = "api-key-env", skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// API base URL; provider default when unset
    #[serde(rename = "base-url", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4".to_string(),
            api_key_env: None,
            base_url: None,
            max_tokens: 1024,
            temperature: 0.7,
            timeout_ms: 60_000,
        }
    }
}

impl LlmConfig {
    /// Environment variable holding the API key
    pub fn api_key_env(&self) -> &str {
        match &self.api_key_env {
            Some(var) => var.as_str(),
            None if self.provider == "anthropic" => "ANTHROPIC_API_KEY",
            None => "OPENAI_API_KEY",
        }
    }

    /// API base URL, without a trailing slash
    pub fn base_url(&self) -> &str {
        let url = match &self.base_url {
            Some(url) => url.as_str(),
            None if self.provider == "anthropic" => "https://api.anthropic.com",
            None => "https://api.openai.com",
        };
        url.trim_end_matches('/')
    }

    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        let var = self.api_key_env();
        let key = std::env::var(var).map_err(|_| eyre::eyre!("Environment variable {} is not set", var))?;
        if key.trim().is_empty() {
            return Err(eyre::eyre!("Environment variable {} is empty", var));
        }
        Ok(key)
    }
}

/// Knowledge file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Path of the knowledge JSON file
    pub path: PathBuf,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(knowledgestore::DEFAULT_STORE_FILE),
        }
    }
}

/// Dialogue defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogueConfig {
    /// Name used when the document has no "Full Name" line
    #[serde(rename = "default-assistant-name")]
    pub default_assistant_name: String,

    /// Question shown before the first turn
    #[serde(rename = "opening-question")]
    pub opening_question: String,
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            default_assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
            opening_question: DEFAULT_OPENING_QUESTION.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.model, "gpt-4");
        assert!((config.llm.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.knowledge.path, PathBuf::from("knowledge_store.json"));
        assert_eq!(config.dialogue.default_assistant_name, "Rohit");
        assert_eq!(config.dialogue.opening_question, "What seems to be the problem?");
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
llm:
  provider: anthropic
  model: claude-sonnet-4
  api-key-env: MY_API_KEY
  base-url: https://api.example.com
  max-tokens: 2048
  temperature: 0.2
  timeout-ms: 30000

knowledge:
  path: /tmp/knowledge.json

dialogue:
  default-assistant-name: Ada
  opening-question: How can I help?

log-level: debug
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.provider, "anthropic");
        assert_eq!(config.llm.api_key_env(), "MY_API_KEY");
        assert_eq!(config.llm.base_url(), "https://api.example.com");
        assert_eq!(config.llm.max_tokens, 2048);
        assert_eq!(config.llm.timeout_ms, 30_000);
        assert_eq!(config.knowledge.path, PathBuf::from("/tmp/knowledge.json"));
        assert_eq!(config.dialogue.default_assistant_name, "Ada");
        assert_eq!(config.dialogue.opening_question, "How can I help?");
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
llm:
  model: gpt-4o
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.api_key_env(), "OPENAI_API_KEY");
        assert_eq!(config.llm.base_url(), "https://api.openai.com");
        assert_eq!(config.dialogue.default_assistant_name, "Rohit");
    }

    #[test]
    fn test_anthropic_provider_gets_its_own_defaults() {
        let yaml = r#"
llm:
  provider: anthropic
  model: claude-3
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.api_key_env(), "ANTHROPIC_API_KEY");
        assert_eq!(config.llm.base_url(), "https://api.anthropic.com");
    }

    #[test]
    fn test_explicit_endpoint_overrides_provider_default() {
        let config = LlmConfig {
            provider: "anthropic".to_string(),
            api_key_env: Some("PROXY_KEY".to_string()),
            base_url: Some("http://localhost:8080/".to_string()),
            ..Default::default()
        };

        assert_eq!(config.api_key_env(), "PROXY_KEY");
        assert_eq!(config.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_load_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("intake.yml");
        fs::write(&path, "log-level: warn\ndialogue:\n  default-assistant-name: Bo\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.dialogue.default_assistant_name, "Bo");
        assert_eq!(Config::load_log_level(Some(&path)).as_deref(), Some("warn"));
    }

    #[test]
    fn test_load_explicit_path_missing_is_error() {
        let path = PathBuf::from("/nonexistent/intake.yml");
        assert!(Config::load(Some(&path)).is_err());
        assert!(Config::load_log_level(Some(&path)).is_none());
    }

    #[test]
    #[serial]
    fn test_validate_requires_api_key() {
        let mut config = Config::default();
        config.llm.api_key_env = Some("INTAKE_TEST_VALIDATE_KEY".to_string());

        // SAFETY: serialized with other env-mutating tests
        unsafe { std::env::remove_var("INTAKE_TEST_VALIDATE_KEY") };
        assert!(config.validate().is_err());

        unsafe { std::env::set_var("INTAKE_TEST_VALIDATE_KEY", "sk-test") };
        assert!(config.validate().is_ok());
        assert_eq!(config.llm.get_api_key().unwrap(), "sk-test");

        unsafe { std::env::remove_var("INTAKE_TEST_VALIDATE_KEY") };
    }

    #[test]
    #[serial]
    fn test_empty_api_key_rejected() {
        let config = LlmConfig {
            api_key_env: Some("INTAKE_TEST_EMPTY_KEY".to_string()),
            ..Default::default()
        };

        unsafe { std::env::set_var("INTAKE_TEST_EMPTY_KEY", "  ") };
        assert!(config.get_api_key().is_err());
        unsafe { std::env::remove_var("INTAKE_TEST_EMPTY_KEY") };
    }
}
