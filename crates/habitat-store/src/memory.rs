use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::backend::{validate_key, KvBackend};
use crate::error::KvError;

/// In-memory, `BTreeMap`-based backend.
///
/// Intended for tests and ephemeral servers. Values are held behind a
/// `RwLock`; each call takes the lock once, so every single-key operation
/// is atomic. Data is lost when the backend is dropped.
pub struct InMemoryBackend {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryBackend {
    /// Create a new empty backend.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All stored keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.entries
            .read()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> KvError {
    KvError::Unavailable(format!("lock poisoned: {e}"))
}

fn in_subtree(key: &str, prefix: &str) -> bool {
    key == prefix
        || key
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

impl KvBackend for InMemoryBackend {
    fn get(&self, key: &str) -> Result<Vec<u8>, KvError> {
        validate_key(key)?;
        let map = self.entries.read().map_err(poisoned)?;
        map.get(key)
            .cloned()
            .ok_or_else(|| KvError::KeyNotFound(key.to_string()))
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), KvError> {
        validate_key(key)?;
        let mut map = self.entries.write().map_err(poisoned)?;
        map.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete_tree(&self, prefix: &str) -> Result<(), KvError> {
        validate_key(prefix)?;
        let mut map = self.entries.write().map_err(poisoned)?;
        let before = map.len();
        map.retain(|key, _| !in_subtree(key, prefix));
        if map.len() == before {
            return Err(KvError::KeyNotFound(prefix.to_string()));
        }
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBackend")
            .field("key_count", &self.len())
            .finish()
    }
}
