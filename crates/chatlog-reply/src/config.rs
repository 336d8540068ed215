//! Reply source configuration.

use serde::{Deserialize, Serialize};

/// Which reply source answers user messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyMode {
    /// Local pattern-matching responder. Needs no network or credentials.
    #[default]
    Eliza,
    /// Remote OpenAI-compatible chat completions endpoint.
    Llm,
}

/// OpenAI-compatible providers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Groq cloud inference.
    #[default]
    Groq,
    /// OpenRouter; gets the extra attribution headers.
    OpenRouter,
    /// OpenAI itself.
    OpenAi,
}

/// Settings for the remote responder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default)]
    pub provider: LlmProvider,
    /// Model name; the provider default is used when unset.
    #[serde(default)]
    pub model_id: Option<String>,
    /// Bearer token. An empty key makes every request fail as a missing credential.
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

impl ModelConfig {
    pub fn base_url(&self) -> &str {
        if let Some(url) = &self.api_base_url {
            url
        } else {
            match self.provider {
                LlmProvider::Groq => "https://api.groq.com/openai",
                LlmProvider::OpenRouter => "https://openrouter.ai/api",
                LlmProvider::OpenAi => "https://api.openai.com",
            }
        }
    }

    pub fn model(&self) -> &str {
        if let Some(model) = &self.model_id {
            model
        } else {
            match self.provider {
                LlmProvider::Groq => "llama-3.1-8b-instant",
                LlmProvider::OpenRouter => "openai/gpt-4o-mini",
                LlmProvider::OpenAi => "gpt-4o-mini",
            }
        }
    }

    /// Environment variable consulted when no key is configured.
    pub fn api_key_env_var(&self) -> &'static str {
        match self.provider {
            LlmProvider::Groq => "GROQ_API_KEY",
            LlmProvider::OpenRouter => "OPENROUTER_API_KEY",
            LlmProvider::OpenAi => "OPENAI_API_KEY",
        }
    }
}

/// The `[reply]` section of the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplyConfig {
    #[serde(default)]
    pub mode: ReplyMode,
    #[serde(default)]
    pub model: ModelConfig,
}
