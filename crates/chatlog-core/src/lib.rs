//! Core types and error definitions for chatlog.
//!
//! This crate provides the foundational types shared across all chatlog crates.
//!
//! # Main types
//!
//! - [`ChatError`] — Unified error enum for the chatlog subsystems.
//! - [`ChatResult`] — Convenience alias for `Result<T, ChatError>`.
//! - [`Role`] — Message author (user or bot).
//! - [`Message`] — A single turn in the session log.

/// Error types.
pub mod error;
/// Message types.
pub mod message;

pub use error::{ChatError, ChatResult};
pub use message::{new_message_id, Message, Role};
