use habitat_types::TypeError;

/// Errors reported by a key-value backend.
#[derive(Debug, thiserror::Error)]
pub enum KvError {
    /// No value (or, for subtree deletes, nothing at all) exists at the key.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// The key is empty or contains empty, `.` or `..` segments.
    #[error("invalid key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// I/O error from the underlying storage.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend refused or failed the operation.
    #[error("{0}")]
    Unavailable(String),
}

impl KvError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound(_))
    }
}

/// Errors from hierarchical store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A point lookup found no entity with the requested id.
    #[error("{0}")]
    NotFound(String),

    /// The backend failed; the message is the backend's own.
    #[error(transparent)]
    Backend(#[from] KvError),

    /// A persisted value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<TypeError> for StoreError {
    fn from(err: TypeError) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
