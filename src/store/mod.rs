//! Resource stores - cache-or-fetch reads and cache-only writes.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │          ProjectStore / TaskStore (per resource)          │
//! │  fetch_all | fetch_by_parent | fetch_one | create | ...  │
//! └──────────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                  ResourceStore<M> (shared)               │
//! │  read_scope: cache hit, or one remote read + merge       │
//! │  insert / modify / remove: serialized read-modify-write  │
//! │  every change publishes its scope to the Notifier        │
//! └──────────────────────────────────────────────────────────┘
//!          │                  │                     │
//!          ▼                  ▼                     ▼
//! ┌────────────────┐  ┌────────────────┐  ┌────────────────────┐
//! │ PersistedCache │  │  RemoteSource  │  │  Notifier<Vec<M>>  │
//! └────────────────┘  └────────────────┘  └────────────────────┘
//! ```

mod project;
mod task;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::cache::{KeyValueStore, PersistedCache};
use crate::error::StoreError;
use crate::model::{next_id, Resource, Scope};
use crate::notifier::{Notifier, Subscription};
use crate::remote::RemoteSource;

pub use project::ProjectStore;
pub use task::TaskStore;

/// Shared machinery behind [`ProjectStore`] and [`TaskStore`].
pub struct ResourceStore<M: Resource> {
    cache: PersistedCache<M>,
    remote: Arc<dyn RemoteSource<M>>,
    notifier: Notifier<Vec<M>>,
    write_lock: Mutex<()>,
}

impl<M: Resource> fmt::Debug for ResourceStore<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceStore")
            .field("collection", &M::COLLECTION)
            .field("subscribers", &self.notifier.subscriber_count())
            .finish()
    }
}

impl<M: Resource> ResourceStore<M> {
    pub fn new(backend: Arc<dyn KeyValueStore>, remote: Arc<dyn RemoteSource<M>>) -> Self {
        Self {
            cache: PersistedCache::new(backend),
            remote,
            notifier: Notifier::new(Vec::new()),
            write_lock: Mutex::new(()),
        }
    }

    pub fn cache(&self) -> &PersistedCache<M> {
        &self.cache
    }

    /// Attach a listener to the published subset. See [`Notifier::subscribe`].
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Vec<M>) + Send + Sync + 'static,
    {
        self.notifier.subscribe(listener)
    }

    /// The most recently published subset.
    pub fn current(&self) -> Vec<M> {
        self.notifier.latest()
    }

    /// Serve `scope` from the cache when it is known locally, otherwise read
    /// it once from the remote and merge it into the cache.
    pub async fn read_scope(&self, scope: Scope) -> Result<Vec<M>, StoreError> {
        {
            let all = self.cache.load()?;
            let subset = scope.select(&all);
            if !subset.is_empty() || self.cache.is_fetched(scope)? {
                debug!(collection = M::COLLECTION, ?scope, count = subset.len(), "cache hit");
                self.notifier.publish(subset.clone());
                return Ok(subset);
            }
        }

        let fetched = match self.remote.list(scope.parent()).await {
            Ok(fetched) => fetched,
            Err(err) => {
                warn!(collection = M::COLLECTION, ?scope, error = %err, "remote read failed");
                return Err(err.into());
            }
        };
        // Only the requested slice is trusted, whatever the remote sent.
        let fetched: Vec<M> = fetched.into_iter().filter(|m| scope.contains(m)).collect();

        {
            let _guard = self.lock()?;
            // Reload: writes may have landed while the request was in flight.
            let mut all = self.cache.load()?;
            all.retain(|m| !scope.contains(m));
            all.extend(fetched.iter().cloned());
            self.cache.save(&all)?;
            self.cache.mark_fetched(scope)?;
        }
        info!(collection = M::COLLECTION, ?scope, count = fetched.len(), "seeded from remote");

        self.notifier.publish(fetched.clone());
        Ok(fetched)
    }

    /// Look an entity up in the cache, falling back to a remote single read.
    /// The remote result is not written to the cache.
    pub async fn read_one(&self, id: u64) -> Result<M, StoreError> {
        if let Some(found) = self.cache.load()?.into_iter().find(|m| m.id() == id) {
            debug!(collection = M::COLLECTION, id, "cache hit");
            return Ok(found);
        }

        match self.remote.get(id).await {
            Ok(Some(found)) => Ok(found),
            Ok(None) => Err(StoreError::not_found::<M>(id)),
            Err(err) => {
                warn!(collection = M::COLLECTION, id, error = %err, "remote read failed");
                Err(err.into())
            }
        }
    }

    /// Assign the next id to `entity`, append it and publish its scope.
    pub fn insert(&self, mut entity: M) -> Result<M, StoreError> {
        let snapshot = {
            let _guard = self.lock()?;
            let mut all = self.cache.load()?;
            entity.set_id(next_id(&all));
            all.push(entity.clone());
            self.cache.save(&all)?;
            Scope::of(&entity).select(&all)
        };
        info!(collection = M::COLLECTION, id = entity.id(), "created");
        self.notifier.publish(snapshot);
        Ok(entity)
    }

    /// Apply `change` to the stored entity with `id`, persist and publish.
    /// The id survives whatever `change` does.
    pub fn modify<F>(&self, id: u64, change: F) -> Result<M, StoreError>
    where
        F: FnOnce(&mut M),
    {
        let (updated, snapshot) = {
            let _guard = self.lock()?;
            let mut all = self.cache.load()?;
            let slot = all
                .iter_mut()
                .find(|m| m.id() == id)
                .ok_or_else(|| StoreError::not_found::<M>(id))?;
            change(slot);
            slot.set_id(id);
            let updated = slot.clone();
            self.cache.save(&all)?;
            let snapshot = Scope::of(&updated).select(&all);
            (updated, snapshot)
        };
        info!(collection = M::COLLECTION, id, "updated");
        self.notifier.publish(snapshot);
        Ok(updated)
    }

    /// Remove the entity with `id`. Returns true if it existed; an unknown
    /// id leaves the cache untouched and publishes nothing.
    pub fn remove(&self, id: u64) -> Result<bool, StoreError> {
        let snapshot = {
            let _guard = self.lock()?;
            let mut all = self.cache.load()?;
            let Some(index) = all.iter().position(|m| m.id() == id) else {
                debug!(collection = M::COLLECTION, id, "delete of unknown id ignored");
                return Ok(false);
            };
            let removed = all.remove(index);
            self.cache.save(&all)?;
            Scope::of(&removed).select(&all)
        };
        info!(collection = M::COLLECTION, id, "deleted");
        self.notifier.publish(snapshot);
        Ok(true)
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, StoreError> {
        self.write_lock
            .lock()
            .map_err(|_| StoreError::Storage("store lock poisoned".into()))
    }
}
