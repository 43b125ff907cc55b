//! Configuration for knowledgestore

use eyre::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "knowledgestore.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Path to the knowledge file
    #[serde(rename = "store-path", default = "default_store_path")]
    pub store_path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(crate::DEFAULT_STORE_FILE)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
        }
    }
}

impl Config {
    /// Resolve the config: an explicit path must load; otherwise the first
    /// existing of the user config and the local file, else defaults
    pub fn load(path: Option<&PathBuf>) -> Result<Self> {
        if let Some(config_path) = path {
            return Self::from_file(config_path);
        }

        let candidates = [
            dirs::config_dir().map(|p| p.join("knowledgestore").join("config.yml")),
            Some(PathBuf::from(LOCAL_CONFIG_FILE)),
        ];

        match candidates.iter().flatten().find(|p| p.exists()) {
            Some(found) => Self::from_file(found),
            None => {
                debug!("Config::load: no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).wrap_err_with(|| format!("Failed to read config {}", path.display()))?;
        let config: Self =
            serde_yaml::from_str(&content).wrap_err_with(|| format!("Failed to parse config {}", path.display()))?;
        debug!(?path, store_path = %config.store_path.display(), "Config::from_file: loaded");
        Ok(config)
    }
}
