use std::sync::Arc;

use super::ResourceStore;
use crate::cache::KeyValueStore;
use crate::error::StoreError;
use crate::model::{filter_projects, Project, ProjectDraft, Scope};
use crate::notifier::Subscription;
use crate::remote::RemoteSource;

/// Store for projects. Every publish carries the whole project list.
#[derive(Debug)]
pub struct ProjectStore {
    inner: ResourceStore<Project>,
}

impl ProjectStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, remote: Arc<dyn RemoteSource<Project>>) -> Self {
        Self {
            inner: ResourceStore::new(backend, remote),
        }
    }

    /// All projects: from the cache when populated, otherwise seeded once
    /// from `GET /users`, which replaces the cached collection.
    pub async fn fetch_all(&self) -> Result<Vec<Project>, StoreError> {
        self.inner.read_scope(Scope::All).await
    }

    /// One project, from the cache or `GET /users/{id}`.
    pub async fn fetch_one(&self, id: u64) -> Result<Project, StoreError> {
        self.inner.read_one(id).await
    }

    /// Create a project from form input and publish the full list.
    pub fn create(&self, draft: &ProjectDraft) -> Result<Project, StoreError> {
        draft.validate()?;
        self.inner.insert(Project::from_draft(draft))
    }

    /// Replace the stored project with `project`. The stored id is kept.
    pub fn update(&self, id: u64, project: Project) -> Result<Project, StoreError> {
        if project.name.trim().is_empty() {
            return Err(StoreError::Invalid("project name is required".into()));
        }
        self.inner.modify(id, move |slot| *slot = project)
    }

    /// Apply form input (name and description) onto the stored project.
    pub fn edit(&self, id: u64, draft: &ProjectDraft) -> Result<Project, StoreError> {
        draft.validate()?;
        self.inner.modify(id, |slot| slot.apply_draft(draft))
    }

    /// Remove a project. Its tasks are left in place.
    pub fn delete(&self, id: u64) -> Result<bool, StoreError> {
        self.inner.remove(id)
    }

    /// Cached projects matching `term` by name, client or description.
    pub fn search(&self, term: &str) -> Result<Vec<Project>, StoreError> {
        let all = self.inner.cache().load()?;
        Ok(filter_projects(&all, term).into_iter().cloned().collect())
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Vec<Project>) + Send + Sync + 'static,
    {
        self.inner.subscribe(listener)
    }

    pub fn current(&self) -> Vec<Project> {
        self.inner.current()
    }
}
