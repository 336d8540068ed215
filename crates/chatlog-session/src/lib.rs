//! Session state management for chatlog.
//!
//! [`SessionManager`] owns the ordered message log. Every mutation is written
//! through to a [`SnapshotStore`] and then published to all subscribers as an
//! owned [`ChatState`] copy.

/// Snapshot import parsing and record normalization.
pub mod import;
/// The session state manager.
pub mod manager;
/// Persistent key/value stores.
pub mod store;

pub use import::{parse_snapshot, ImportOutcome};
pub use manager::{ChatState, Listener, SessionManager, SubscriptionId, DEFAULT_STORAGE_KEY};
pub use store::{FileStore, MemoryStore, SnapshotStore};
