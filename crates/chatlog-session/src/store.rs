use chatlog_core::{ChatError, ChatResult};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Durable key/value target for serialized session logs.
///
/// The manager only ever saves and loads whole strings under one key, so
/// implementations need no notion of partial updates.
pub trait SnapshotStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if nothing was saved yet.
    fn load(&self, key: &str) -> ChatResult<Option<String>>;

    /// Replaces the value stored under `key`.
    fn save(&self, key: &str, value: &str) -> ChatResult<()>;
}

/// In-memory store. Clones share the same entries, so a test can keep a
/// handle and inspect what the manager wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a single entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let store = Self::new();
        store.entries.lock().insert(key.into(), value.into());
        store
    }

    /// Raw value under `key`, bypassing the trait.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &str) -> ChatResult<Option<String>> {
        Ok(self.get(key))
    }

    fn save(&self, key: &str, value: &str) -> ChatResult<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-based store: one `<key>.json` file per key inside a directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (and creates if needed) the store directory.
    pub fn new(dir: impl Into<PathBuf>) -> ChatResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Directory backing this store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> ChatResult<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(ChatError::Storage(format!("Invalid storage key '{key}'")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl SnapshotStore for FileStore {
    fn load(&self, key: &str) -> ChatResult<Option<String>> {
        let path = self.entry_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    fn save(&self, key: &str, value: &str) -> ChatResult<()> {
        let path = self.entry_path(key)?;
        // Write beside the target and rename so a crash never leaves half a log.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn memory_store_clones_share_entries() {
        let store = MemoryStore::new();
        let handle = store.clone();
        store.save("k", "v").unwrap();
        assert_eq!(handle.load("k").unwrap().as_deref(), Some("v"));
        assert!(handle.load("other").unwrap().is_none());
    }

    #[test]
    fn file_store_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("nested")).unwrap();
        assert!(store.load("chat").unwrap().is_none());

        store.save("chat", "[]").unwrap();
        store.save("chat", "[1]").unwrap();
        assert_eq!(store.load("chat").unwrap().as_deref(), Some("[1]"));
        assert!(store.dir().join("chat.json").exists());
        assert!(!store.dir().join("chat.json.tmp").exists());
    }

    #[test]
    fn file_store_persists_across_instances() {
        let tmp = TempDir::new().unwrap();
        FileStore::new(tmp.path()).unwrap().save("chat", "hello").unwrap();

        let reopened = FileStore::new(tmp.path()).unwrap();
        assert_eq!(reopened.load("chat").unwrap().as_deref(), Some("hello"));
    }

    #[test]
    fn file_store_rejects_path_like_keys() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path()).unwrap();
        for key in ["", "../escape", "a/b", ".hidden"] {
            let err = store.save(key, "x").unwrap_err();
            assert!(matches!(err, ChatError::Storage(_)), "key {key:?}");
        }
    }
}
