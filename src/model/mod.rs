//! Models - the entity types held by the stores.
//!
//! Every cached entity implements [`Resource`], which ties a Rust struct to
//! its cache key, its remote endpoint and, for nested resources, its parent.
//!
//! ## Example
//!
//! ```ignore
//! use taskdeck::{Resource, Scope};
//!
//! #[derive(Serialize, Deserialize, Clone)]
//! struct Note {
//!     pub id: u64,
//!     #[serde(rename = "postId")]
//!     pub post_id: u64,
//! }
//!
//! impl Resource for Note {
//!     const COLLECTION: &'static str = "notes_data";
//!     const ENDPOINT: &'static str = "comments";
//!     const PARENT_PARAM: Option<&'static str> = Some("postId");
//!     fn id(&self) -> u64 { self.id }
//!     fn set_id(&mut self, id: u64) { self.id = id }
//!     fn parent_id(&self) -> Option<u64> { Some(self.post_id) }
//! }
//! ```

mod project;
mod task;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub use project::{filter_projects, Address, Company, Geo, Project, ProjectDraft};
pub use task::{Task, TaskDraft, TaskPatch};

/// Trait for types that can be cached and served by a resource store.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The persisted-cache key holding the whole collection (e.g. "projects_data").
    const COLLECTION: &'static str;

    /// Path segment of the remote collection (e.g. "users" for `GET /users`).
    const ENDPOINT: &'static str;

    /// Query parameter the remote filters children by, for nested resources.
    const PARENT_PARAM: Option<&'static str> = None;

    /// Returns the unique identifier for this entity.
    fn id(&self) -> u64;

    /// Assigns the identifier. Only the store calls this, on create.
    fn set_id(&mut self, id: u64);

    /// Returns the owning parent's id, for nested resources.
    fn parent_id(&self) -> Option<u64> {
        None
    }
}

/// The slice of a collection a read or publish concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", content = "id", rename_all = "lowercase")]
pub enum Scope {
    /// The whole collection.
    All,
    /// Children of one parent.
    Parent(u64),
}

impl Scope {
    /// The scope an entity is published under once it changes.
    pub fn of<M: Resource>(entity: &M) -> Scope {
        match (M::PARENT_PARAM, entity.parent_id()) {
            (Some(_), Some(parent)) => Scope::Parent(parent),
            _ => Scope::All,
        }
    }

    /// Returns true if the entity belongs to this scope.
    pub fn contains<M: Resource>(&self, entity: &M) -> bool {
        match self {
            Scope::All => true,
            Scope::Parent(parent) => entity.parent_id() == Some(*parent),
        }
    }

    /// The parent id the remote should filter by, if any.
    pub fn parent(&self) -> Option<u64> {
        match self {
            Scope::All => None,
            Scope::Parent(parent) => Some(*parent),
        }
    }

    /// Derives the slice of `all` in this scope.
    pub fn select<M: Resource>(&self, all: &[M]) -> Vec<M> {
        all.iter().filter(|m| self.contains(*m)).cloned().collect()
    }
}

/// Computes the next identifier: one past the largest id present, or 1.
pub fn next_id<M: Resource>(all: &[M]) -> u64 {
    all.iter().map(Resource::id).max().unwrap_or(0) + 1
}
