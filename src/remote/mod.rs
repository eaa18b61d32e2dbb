//! Remote source - read-only access to the seed API.
//!
//! The stores only ever read from the remote: bulk reads seed the cache,
//! single reads answer `fetch_one` misses.
//!
//! ```text
//! GET /users              -> Vec<Project>
//! GET /users/{id}         -> Project
//! GET /todos?userId={id}  -> Vec<Task>
//! GET /todos/{id}         -> Task
//! ```

#[cfg(feature = "http")]
mod http;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::Resource;

#[cfg(feature = "http")]
pub use http::HttpRemote;

/// Default seed API.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Error type for remote reads.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    /// The server answered with a non-success status.
    #[error("GET {url} returned status {status}")]
    Status { url: String, status: u16 },
    /// The body did not match the expected shape.
    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Read-only source of seed data for one resource type.
#[async_trait]
pub trait RemoteSource<M: Resource>: Send + Sync {
    /// Read the collection, filtered server-side by parent when given.
    async fn list(&self, parent: Option<u64>) -> Result<Vec<M>, RemoteError>;

    /// Read one entity. Returns None if the remote does not know the id.
    async fn get(&self, id: u64) -> Result<Option<M>, RemoteError>;
}
