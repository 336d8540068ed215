//! `chatlog.toml` loading.

use anyhow::Context;
use chatlog_reply::ReplyConfig;
use chatlog_session::DEFAULT_STORAGE_KEY;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
pub struct ChatlogConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default)]
    pub reply: ReplyConfig,
}

impl Default for ChatlogConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: default_storage_key(),
            reply: ReplyConfig::default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl ChatlogConfig {
    /// Reads `path`, or returns defaults when the file does not exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::parse(&raw)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Fills an empty API key from the provider's environment variable.
    pub fn resolve_api_key(&mut self) {
        self.resolve_api_key_with(|var| std::env::var(var).ok());
    }

    fn resolve_api_key_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let model = &mut self.reply.model;
        if !model.api_key.is_empty() {
            return;
        }
        let var = model.api_key_env_var();
        if let Some(key) = lookup(var).filter(|k| !k.trim().is_empty()) {
            debug!(var, "API key taken from environment");
            model.api_key = key;
        }
    }
}
