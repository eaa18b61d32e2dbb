//! Workspace - both stores and the session gate over one storage backend.
//!
//! ## Example
//!
//! ```ignore
//! use taskdeck::{Config, Workspace};
//!
//! let workspace = Workspace::open(&Config::default())?;
//! workspace.auth().require()?;
//! let projects = workspace.projects().fetch_all().await?;
//! let tasks = workspace.tasks().fetch_by_parent(projects[0].id).await?;
//! ```

use std::sync::Arc;

use crate::auth::AuthGate;
use crate::cache::{InMemoryKeyValueStore, KeyValueStore};
use crate::model::{Project, Task};
use crate::remote::RemoteSource;
use crate::store::{ProjectStore, TaskStore};

pub struct Workspace {
    backend: Arc<dyn KeyValueStore>,
    projects: ProjectStore,
    tasks: TaskStore,
    auth: AuthGate,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("projects", &self.projects)
            .field("tasks", &self.tasks)
            .finish_non_exhaustive()
    }
}

impl Workspace {
    /// Assemble a workspace from explicit parts.
    pub fn new(
        backend: Arc<dyn KeyValueStore>,
        project_remote: Arc<dyn RemoteSource<Project>>,
        task_remote: Arc<dyn RemoteSource<Task>>,
    ) -> Self {
        Self {
            projects: ProjectStore::new(Arc::clone(&backend), project_remote),
            tasks: TaskStore::new(Arc::clone(&backend), task_remote),
            auth: AuthGate::new(Arc::clone(&backend)),
            backend,
        }
    }

    /// A workspace with non-durable in-memory storage.
    pub fn in_memory(
        project_remote: Arc<dyn RemoteSource<Project>>,
        task_remote: Arc<dyn RemoteSource<Task>>,
    ) -> Self {
        Self::new(
            Arc::new(InMemoryKeyValueStore::new()),
            project_remote,
            task_remote,
        )
    }

    /// File-backed storage under `config.cache_dir`, seeded over HTTP from
    /// `config.api_base_url`.
    #[cfg(feature = "http")]
    pub fn open(config: &crate::Config) -> Result<Self, crate::StoreError> {
        use crate::cache::FileKeyValueStore;
        use crate::remote::HttpRemote;

        let backend = Arc::new(FileKeyValueStore::open(&config.cache_dir)?);
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| crate::remote::RemoteError::Transport {
                url: config.api_base_url.clone(),
                message: e.to_string(),
            })?;
        tracing::debug!(
            cache_dir = %config.cache_dir.display(),
            api = %config.api_base_url,
            "opening workspace"
        );

        Ok(Self::new(
            backend,
            Arc::new(HttpRemote::<Project>::with_client(
                client.clone(),
                &config.api_base_url,
            )),
            Arc::new(HttpRemote::<Task>::with_client(client, &config.api_base_url)),
        ))
    }

    pub fn projects(&self) -> &ProjectStore {
        &self.projects
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn auth(&self) -> &AuthGate {
        &self.auth
    }

    pub fn backend(&self) -> &Arc<dyn KeyValueStore> {
        &self.backend
    }
}
