//! OpenAI-compatible chat completions responder.

use crate::config::{LlmProvider, ModelConfig};
use crate::error::ReplyError;
use crate::source::ReplySource;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Remote responder for any OpenAI-compatible chat completions endpoint.
///
/// Works with Groq, OpenRouter, OpenAI, and local servers that implement the
/// same API. Each call sends only the current user message (plus the optional
/// system prompt).
pub struct OpenAiCompatResponder {
    config: ModelConfig,
    http: reqwest::Client,
}

impl OpenAiCompatResponder {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    fn build_body(&self, text: &str) -> serde_json::Value {
        let mut messages = Vec::new();
        if let Some(sys) = &self.config.system_prompt {
            messages.push(serde_json::json!({ "role": "system", "content": sys }));
        }
        messages.push(serde_json::json!({ "role": "user", "content": text }));

        let mut body = serde_json::json!({
            "model": self.config.model(),
            "messages": messages,
        });
        if let Some(max_tokens) = self.config.max_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }
        body
    }

    fn add_provider_headers(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let request = request
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json");

        // OpenRouter asks clients to identify themselves
        if self.config.provider == LlmProvider::OpenRouter {
            request
                .header("HTTP-Referer", "https://github.com/chatlog/chatlog")
                .header("X-Title", "chatlog")
        } else {
            request
        }
    }
}

#[async_trait]
impl ReplySource for OpenAiCompatResponder {
    fn name(&self) -> &str {
        match self.config.provider {
            LlmProvider::Groq => "groq",
            LlmProvider::OpenRouter => "openrouter",
            LlmProvider::OpenAi => "openai",
        }
    }

    async fn reply(&self, text: &str) -> Result<String, ReplyError> {
        if self.config.api_key.trim().is_empty() {
            return Err(ReplyError::MissingCredential);
        }

        let url = format!("{}/v1/chat/completions", self.config.base_url());
        let request = self.add_provider_headers(self.http.post(&url));

        let resp = request
            .json(&self.build_body(text))
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "Completion request failed");
                ReplyError::network(e.to_string())
            })?;

        let status = resp.status();
        let resp_body: serde_json::Value = resp.json().await.map_err(|e| {
            warn!(status = %status, error = %e, "Completion response is not JSON");
            ReplyError::network(e.to_string())
        })?;

        if !status.is_success() {
            debug!(status = %status, body = %resp_body, "Completion endpoint returned an error");
        }

        parse_completion(&resp_body)
    }
}

/// Extracts `choices[0].message.content`.
pub fn parse_completion(body: &serde_json::Value) -> Result<String, ReplyError> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            warn!(body = %body, "Completion response has no message content");
            ReplyError::bad_response("choices[0].message.content missing")
        })
}
