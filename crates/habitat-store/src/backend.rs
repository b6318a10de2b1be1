use crate::error::KvError;

/// Flat key-value storage with `/`-separated keys.
///
/// All implementations must satisfy these invariants:
/// - Each single-key operation is atomic.
/// - There are no multi-key transactions.
/// - `delete_tree(prefix)` removes the key `prefix` itself and every key
///   below `prefix/`, and reports [`KvError::KeyNotFound`] when neither exists.
/// - Keys are validated with [`validate_key`] before use.
pub trait KvBackend: Send + Sync {
    /// Read the value stored at `key`.
    ///
    /// Returns [`KvError::KeyNotFound`] if no value exists.
    fn get(&self, key: &str) -> Result<Vec<u8>, KvError>;

    /// Store `value` at `key`, replacing any previous value.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), KvError>;

    /// Remove `prefix` and everything beneath it.
    fn delete_tree(&self, prefix: &str) -> Result<(), KvError>;

    /// Check whether a value exists at `key`.
    fn exists(&self, key: &str) -> Result<bool, KvError> {
        match self.get(key) {
            Ok(_) => Ok(true),
            Err(KvError::KeyNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Reject keys that cannot be mapped onto a hierarchy unambiguously.
pub fn validate_key(key: &str) -> Result<(), KvError> {
    let invalid = |reason: &str| KvError::InvalidKey {
        key: key.to_string(),
        reason: reason.to_string(),
    };
    if key.is_empty() {
        return Err(invalid("key must not be empty"));
    }
    for segment in key.split('/') {
        match segment {
            "" => return Err(invalid("empty path segment")),
            "." | ".." => return Err(invalid("relative path segment")),
            _ => {}
        }
    }
    Ok(())
}
