//! taskdeck - project and task stores over a local persisted cache.
//!
//! Projects and their tasks are seeded once from a read-only REST API and
//! from then on served and mutated against a durable key-value cache. Every
//! change is published to subscribers with replay-latest semantics.

pub mod auth;
pub mod cache;
pub mod config;
mod error;
pub mod logging;
pub mod model;
pub mod notifier;
pub mod remote;
pub mod store;
mod workspace;

pub use auth::{AuthError, AuthGate, Credentials};
pub use cache::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, PersistedCache};
pub use config::{Config, ConfigError, PartialConfig};
pub use error::StoreError;
pub use model::{
    filter_projects, next_id, Address, Company, Geo, Project, ProjectDraft, Resource, Scope, Task,
    TaskDraft, TaskPatch,
};
pub use notifier::{Notifier, Subscription};
#[cfg(feature = "http")]
pub use remote::HttpRemote;
pub use remote::{RemoteError, RemoteSource, DEFAULT_BASE_URL};
pub use store::{ProjectStore, ResourceStore, TaskStore};
pub use workspace::Workspace;
