use std::sync::Arc;

use super::ResourceStore;
use crate::cache::KeyValueStore;
use crate::error::StoreError;
use crate::model::{Scope, Task, TaskDraft, TaskPatch};
use crate::notifier::Subscription;
use crate::remote::RemoteSource;

/// Store for tasks. Every publish carries one project's tasks.
#[derive(Debug)]
pub struct TaskStore {
    inner: ResourceStore<Task>,
}

impl TaskStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, remote: Arc<dyn RemoteSource<Task>>) -> Self {
        Self {
            inner: ResourceStore::new(backend, remote),
        }
    }

    /// Tasks of one project. Served from the cache when the project has
    /// cached tasks or was fetched before; otherwise read once from
    /// `GET /todos?userId={id}`, replacing only that project's slice.
    pub async fn fetch_by_parent(&self, project_id: u64) -> Result<Vec<Task>, StoreError> {
        self.inner.read_scope(Scope::Parent(project_id)).await
    }

    /// One task, from the cache or `GET /todos/{id}`.
    pub async fn fetch_one(&self, id: u64) -> Result<Task, StoreError> {
        self.inner.read_one(id).await
    }

    /// Create a task and publish its project's tasks.
    pub fn create(&self, draft: TaskDraft) -> Result<Task, StoreError> {
        draft.validate()?;
        self.inner.insert(draft.into_task())
    }

    /// Merge `patch` onto the stored task. Unknown ids are `NotFound`.
    pub fn update(&self, id: u64, patch: &TaskPatch) -> Result<Task, StoreError> {
        patch.validate()?;
        self.inner.modify(id, |task| task.apply(patch))
    }

    /// Flip the completion flag.
    pub fn toggle(&self, id: u64) -> Result<Task, StoreError> {
        self.inner.modify(id, |task| task.completed = !task.completed)
    }

    pub fn delete(&self, id: u64) -> Result<bool, StoreError> {
        self.inner.remove(id)
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Vec<Task>) + Send + Sync + 'static,
    {
        self.inner.subscribe(listener)
    }

    pub fn current(&self) -> Vec<Task> {
        self.inner.current()
    }
}
