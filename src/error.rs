use thiserror::Error;

use crate::remote::RemoteError;

/// Error type for store, cache and key-value backend operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The remote seed source rejected the read or was unreachable.
    #[error("network failure: {0}")]
    Network(#[from] RemoteError),
    /// No entity with this id exists (locally, and remotely for single reads).
    #[error("{collection} entry not found: {id}")]
    NotFound { collection: &'static str, id: u64 },
    /// A draft failed validation before reaching the cache.
    #[error("invalid input: {0}")]
    Invalid(String),
    /// Cached content could not be encoded or decoded.
    #[error("cache serialization error: {0}")]
    Serde(String),
    /// Key-value backend failure.
    #[error("cache storage error: {0}")]
    Storage(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}

impl StoreError {
    pub(crate) fn not_found<M: crate::Resource>(id: u64) -> Self {
        StoreError::NotFound {
            collection: M::COLLECTION,
            id,
        }
    }

    /// True when the failure came from the remote source.
    pub fn is_network(&self) -> bool {
        matches!(self, StoreError::Network(_))
    }
}
