use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The participant that authored a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A human end-user.
    User,
    /// The reply source.
    Bot,
}

impl Role {
    /// Parses the wire tag. Anything other than `user` or `bot` is rejected.
    pub fn parse_tag(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Role::User),
            "bot" => Some(Role::Bot),
            _ => None,
        }
    }

    /// The wire tag for this role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Bot => "bot",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single chat turn in the session log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Opaque identifier, unique within the log.
    pub id: String,
    /// The textual content of the message.
    pub text: String,
    /// Who wrote it.
    pub role: Role,
    /// UTC creation time. Never changes after creation.
    pub time: DateTime<Utc>,
    /// Set once the text has been modified; never cleared.
    pub edited: bool,
}

impl Message {
    /// Creates a new message with a fresh identifier and the current time.
    pub fn new(text: impl Into<String>, role: Role) -> Self {
        Self {
            id: new_message_id(),
            text: text.into(),
            role,
            time: Utc::now(),
            edited: false,
        }
    }

    /// Creates a new message with [`Role::User`].
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text, Role::User)
    }

    /// Creates a new message with [`Role::Bot`].
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(text, Role::Bot)
    }

    /// Replaces the text and marks the message as edited.
    pub fn edit(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.edited = true;
    }
}

/// Generates a message identifier (random UUID v4, hyphenated).
pub fn new_message_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_message_creation() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.text, "Hello");
        assert!(!msg.edited);
        assert!(!msg.id.is_empty());
    }

    #[test]
    fn test_edit_is_sticky() {
        let mut msg = Message::bot("Hi!");
        let created = msg.time;
        msg.edit("Hi again");
        assert!(msg.edited);
        msg.edit("");
        assert!(msg.edited);
        assert_eq!(msg.text, "");
        assert_eq!(msg.time, created);
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Bot).unwrap(), "\"bot\"");
        assert!(serde_json::from_str::<Role>("\"alien\"").is_err());
        assert_eq!(Role::parse_tag("bot"), Some(Role::Bot));
        assert_eq!(Role::parse_tag("Bot"), None);
    }

    #[test]
    fn test_message_serialization() {
        let msg = Message::user("test");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["edited"], false);
        assert!(json["time"].as_str().unwrap().ends_with('Z'));

        let back: Message = serde_json::from_value(json).unwrap();
        assert_eq!(back, msg);
    }
}
