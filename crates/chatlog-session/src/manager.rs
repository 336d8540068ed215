use crate::import::parse_snapshot;
use crate::store::SnapshotStore;
use chatlog_core::{Message, Role};
use tracing::{debug, info, warn};

/// Storage key used when the caller does not pick one.
pub const DEFAULT_STORAGE_KEY: &str = "chatlog";

/// Snapshot of the session log handed to subscribers.
///
/// Each subscriber receives its own copy; changing it has no effect on the
/// manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatState {
    /// Messages in append order.
    pub messages: Vec<Message>,
}

impl ChatState {
    /// Number of messages in the snapshot.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the snapshot holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Handle returned by [`SessionManager::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Callback invoked with every published snapshot.
pub type Listener = Box<dyn FnMut(ChatState) + Send>;

/// Owns the canonical message log.
///
/// Every mutating call writes the whole log through to the store and then
/// publishes a fresh snapshot to all listeners, synchronously, before
/// returning.
pub struct SessionManager {
    messages: Vec<Message>,
    store: Box<dyn SnapshotStore>,
    key: String,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl SessionManager {
    /// Creates a manager and restores whatever `store` holds under `key`.
    ///
    /// Unreadable or unparseable data yields an empty log.
    pub fn new(store: Box<dyn SnapshotStore>, key: impl Into<String>) -> Self {
        let mut manager = Self {
            messages: Vec::new(),
            store,
            key: key.into(),
            listeners: Vec::new(),
            next_subscription: 0,
        };
        manager.restore();
        manager
    }

    /// Creates a manager using [`DEFAULT_STORAGE_KEY`].
    pub fn with_store(store: Box<dyn SnapshotStore>) -> Self {
        Self::new(store, DEFAULT_STORAGE_KEY)
    }

    fn restore(&mut self) {
        self.messages = match self.store.load(&self.key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Message>>(&raw) {
                Ok(messages) => {
                    debug!(key = %self.key, count = messages.len(), "Restored session log");
                    messages
                }
                Err(e) => {
                    warn!(key = %self.key, error = %e, "Stored session log is corrupt, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read session log, starting empty");
                Vec::new()
            }
        };
        self.publish();
    }

    /// Registers a listener and immediately calls it with the current state.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(ChatState) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;

        let mut listener: Listener = Box::new(listener);
        listener(self.snapshot());
        self.listeners.push((id, listener));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Appends a new message and returns a copy of it.
    pub fn append(&mut self, text: impl Into<String>, role: Role) -> Message {
        let msg = Message::new(text, role);
        self.messages.push(msg.clone());
        self.commit();
        msg
    }

    /// Replaces the text of message `id` and marks it edited.
    ///
    /// Returns `false` without touching anything when no message has that id.
    pub fn update(&mut self, id: &str, text: impl Into<String>) -> bool {
        let Some(msg) = self.messages.iter_mut().find(|m| m.id == id) else {
            return false;
        };
        msg.edit(text);
        self.commit();
        true
    }

    /// Removes message `id`. Returns `false` when nothing matched.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.messages.len();
        self.messages.retain(|m| m.id != id);
        if self.messages.len() == before {
            return false;
        }
        self.commit();
        true
    }

    /// Empties the log.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.commit();
    }

    /// Pretty-printed JSON of the current log. No side effects.
    pub fn export_snapshot(&self) -> String {
        serde_json::to_string_pretty(&self.messages).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to serialize session log for export");
            "[]".to_string()
        })
    }

    /// Replaces the log with the valid records of an exported snapshot.
    ///
    /// Returns `false` and leaves the log untouched if `text` is not a JSON
    /// array. Invalid records inside the array are skipped.
    pub fn import_snapshot(&mut self, text: &str) -> bool {
        let outcome = match parse_snapshot(text) {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!(error = %e, "Rejected import");
                return false;
            }
        };
        info!(
            imported = outcome.messages.len(),
            dropped = outcome.dropped,
            "Imported session log"
        );
        self.messages = outcome.messages;
        self.commit();
        true
    }

    /// Owned copy of the current log.
    pub fn snapshot(&self) -> ChatState {
        ChatState {
            messages: self.messages.clone(),
        }
    }

    /// Borrowed view of the current log.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Looks up a message by id.
    pub fn get(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Storage key this manager writes to.
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    fn commit(&mut self) {
        self.persist();
        self.publish();
    }

    fn persist(&self) {
        let json = match serde_json::to_string(&self.messages) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize session log");
                return;
            }
        };
        if let Err(e) = self.store.save(&self.key, &json) {
            warn!(key = %self.key, error = %e, "Failed to persist session log");
        }
    }

    fn publish(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let state = self.snapshot();
        for (_, listener) in &mut self.listeners {
            listener(state.clone());
        }
    }
}
