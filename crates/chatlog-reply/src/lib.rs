//! Reply sources and orchestration for chatlog.
//!
//! A [`ReplySource`] turns user text into bot text or a classified
//! [`ReplyError`]. [`ChatRunner`] drives a [`chatlog_session::SessionManager`]
//! so that every user message is followed by exactly one bot message.

pub mod config;
pub mod eliza;
pub mod error;
pub mod openai;
pub mod runner;
pub mod source;

pub use config::{LlmProvider, ModelConfig, ReplyConfig, ReplyMode};
pub use eliza::ElizaResponder;
pub use error::{ReplyError, ERROR_PREFIX};
pub use openai::OpenAiCompatResponder;
pub use runner::{ChatRunner, Exchange};
pub use source::{build_source, ReplySource};
