//! The reply source abstraction.

use crate::config::{ReplyConfig, ReplyMode};
use crate::eliza::ElizaResponder;
use crate::error::ReplyError;
use crate::openai::OpenAiCompatResponder;
use async_trait::async_trait;

/// Turns user text into bot text.
///
/// To add a new variant:
/// 1. Implement `ReplySource` for your struct
/// 2. Add a [`ReplyMode`] variant
/// 3. Wire it up in [`build_source`]
#[async_trait]
pub trait ReplySource: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &str;

    /// Produces a reply for `text`. Completes exactly once.
    async fn reply(&self, text: &str) -> Result<String, ReplyError>;
}

/// Builds the reply source selected by `config.mode`.
pub fn build_source(config: &ReplyConfig) -> Box<dyn ReplySource> {
    match config.mode {
        ReplyMode::Eliza => Box::new(ElizaResponder::new()),
        ReplyMode::Llm => Box::new(OpenAiCompatResponder::new(config.model.clone())),
    }
}
