//! Reply failure classification.

use thiserror::Error;

/// Prefix shared by every failure message shown in the chat log.
pub const ERROR_PREFIX: &str = "LLM error:";

/// Why a reply source could not produce text.
///
/// The `Display` text is what the user sees after [`ERROR_PREFIX`]; the
/// `detail` fields only reach the logs.
#[derive(Debug, Error)]
pub enum ReplyError {
    #[error("No API key found.")]
    MissingCredential,

    #[error("Network Error")]
    Network { detail: String },

    #[error("Bad response format.")]
    BadResponse { detail: String },
}

impl ReplyError {
    pub fn network(detail: impl Into<String>) -> Self {
        Self::Network {
            detail: detail.into(),
        }
    }

    pub fn bad_response(detail: impl Into<String>) -> Self {
        Self::BadResponse {
            detail: detail.into(),
        }
    }

    /// Text appended to the log in place of a reply.
    pub fn user_text(&self) -> String {
        format!("{ERROR_PREFIX}{self}")
    }
}
