//! Error types for stores, codecs and bindings

/// Failure reported by a [`Store`](crate::store::Store) backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing storage cannot be reached (no window, storage disabled).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected the operation (quota exceeded, security error).
    #[error("storage backend error: {0}")]
    Backend(String),

    /// I/O error from a file-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The store's own on-disk representation could not be encoded or decoded.
    #[error("store encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Failure converting between a value and its stored text.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("cannot serialize value: {0}")]
    Serialize(String),

    #[error("cannot deserialize entry: {0}")]
    Deserialize(String),
}

/// Failure surfaced to the consumer of a [`PersistentState`](crate::PersistentState).
#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    #[error("slot key must not be empty")]
    EmptyKey,

    /// The current value could not be serialized; the store was not touched.
    #[error("cannot serialize value for key '{key}': {source}")]
    Serialize { key: String, source: CodecError },

    /// The store failed; the in-memory value is still authoritative.
    #[error("store failure for key '{key}': {source}")]
    Store { key: String, source: StoreError },
}

pub type StoreResult<T> = Result<T, StoreError>;
pub type BindingResult<T> = Result<T, BindingError>;
