//! Persisted cache - whole-collection JSON storage over a key-value backend.
//!
//! A [`KeyValueStore`] is the durable string storage the stores are given at
//! construction; [`PersistedCache`] reads and writes one resource type's full
//! collection under its `COLLECTION` key.
//!
//! ## Example
//!
//! ```ignore
//! use taskdeck::{InMemoryKeyValueStore, PersistedCache, Project};
//!
//! let backend = Arc::new(InMemoryKeyValueStore::new());
//! let cache = PersistedCache::<Project>::new(backend);
//! cache.save(&projects)?;
//! let loaded = cache.load()?;
//! ```

mod file;
mod in_memory;

use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::StoreError;
use crate::model::{Resource, Scope};

pub use file::FileKeyValueStore;
pub use in_memory::InMemoryKeyValueStore;

/// Abstract string storage, keyed by name.
pub trait KeyValueStore: Send + Sync {
    /// Get the value under `key`. Returns None if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the value under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove the value under `key`. Returns true if it existed.
    fn remove(&self, key: &str) -> Result<bool, StoreError>;
}

/// Typed view of one resource type's cached collection.
pub struct PersistedCache<M> {
    backend: Arc<dyn KeyValueStore>,
    _marker: PhantomData<fn() -> M>,
}

impl<M> Clone for PersistedCache<M> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            _marker: PhantomData,
        }
    }
}

impl<M> fmt::Debug for PersistedCache<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistedCache")
            .field("collection", &std::any::type_name::<M>())
            .finish()
    }
}

impl<M: Resource> PersistedCache<M> {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            _marker: PhantomData,
        }
    }

    /// Key under which fetched scopes are recorded.
    pub fn fetched_key() -> String {
        format!("{}:fetched", M::COLLECTION)
    }

    /// Load the whole collection. An absent key is an empty collection;
    /// unparseable content is an error.
    pub fn load(&self) -> Result<Vec<M>, StoreError> {
        match self.backend.get(M::COLLECTION)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Overwrite the whole collection.
    pub fn save(&self, all: &[M]) -> Result<(), StoreError> {
        let json = serde_json::to_string(all)?;
        self.backend.set(M::COLLECTION, &json)
    }

    /// Scopes already seeded from the remote source.
    pub fn fetched_scopes(&self) -> Result<BTreeSet<Scope>, StoreError> {
        match self.backend.get(&Self::fetched_key())? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(BTreeSet::new()),
        }
    }

    pub fn is_fetched(&self, scope: Scope) -> Result<bool, StoreError> {
        Ok(self.fetched_scopes()?.contains(&scope))
    }

    /// Record that `scope` has been seeded, even if it turned out empty.
    pub fn mark_fetched(&self, scope: Scope) -> Result<(), StoreError> {
        let mut scopes = self.fetched_scopes()?;
        if scopes.insert(scope) {
            let json = serde_json::to_string(&scopes)?;
            self.backend.set(&Self::fetched_key(), &json)?;
        }
        Ok(())
    }
}
