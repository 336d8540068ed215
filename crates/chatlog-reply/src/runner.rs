//! Orchestration between the session log and a reply source.

use crate::source::ReplySource;
use chatlog_core::{Message, Role};
use chatlog_session::{ChatState, SessionManager, SubscriptionId};
use tracing::{info, warn};

/// A user message and the bot message appended for it.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub user: Message,
    pub bot: Message,
}

/// Drives the send/reply cycle: user text → log → reply source → log.
///
/// The user message is appended before the reply is requested, so it always
/// precedes its reply in the log.
pub struct ChatRunner {
    session: SessionManager,
    source: Box<dyn ReplySource>,
}

impl ChatRunner {
    pub fn new(session: SessionManager, source: Box<dyn ReplySource>) -> Self {
        Self { session, source }
    }

    /// Sends `text` and appends exactly one bot message for it.
    ///
    /// Blank input is ignored and returns `None`. Reply failures become a bot
    /// message carrying the error text.
    pub async fn send(&mut self, text: &str) -> Option<Exchange> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let user = self.session.append(text, Role::User);

        let reply = match self.source.reply(text).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(source = %self.source.name(), error = ?e, "Reply source failed");
                e.user_text()
            }
        };

        let bot = self.session.append(reply, Role::Bot);
        info!(source = %self.source.name(), user_id = %user.id, bot_id = %bot.id, "Exchange complete");
        Some(Exchange { user, bot })
    }

    pub fn edit(&mut self, id: &str, text: &str) -> bool {
        self.session.update(id, text)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        self.session.remove(id)
    }

    pub fn clear(&mut self) {
        self.session.clear();
    }

    pub fn export(&self) -> String {
        self.session.export_snapshot()
    }

    pub fn import(&mut self, text: &str) -> bool {
        self.session.import_snapshot(text)
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(ChatState) + Send + 'static,
    {
        self.session.subscribe(listener)
    }

    /// Swaps the reply source; the log is untouched.
    pub fn set_source(&mut self, source: Box<dyn ReplySource>) {
        info!(from = %self.source.name(), to = %source.name(), "Switching reply source");
        self.source = source;
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionManager {
        &mut self.session
    }
}
