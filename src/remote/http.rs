//! HTTP remote source over `reqwest`.
//!
//! Requires the `http` feature.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::{RemoteError, RemoteSource};
use crate::model::Resource;

/// Reads `M` from `<base_url>/<M::ENDPOINT>`.
pub struct HttpRemote<M> {
    client: reqwest::Client,
    base_url: String,
    _marker: PhantomData<fn() -> M>,
}

impl<M> Clone for HttpRemote<M> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            _marker: PhantomData,
        }
    }
}

impl<M: Resource> HttpRemote<M> {
    /// Build a remote with its own client and the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        let base_url = base_url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::Transport {
                url: base_url.clone(),
                message: e.to_string(),
            })?;
        Ok(Self::with_client(client, base_url))
    }

    /// Build a remote sharing an existing client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            _marker: PhantomData,
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, M::ENDPOINT)
    }

    async fn read<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Option<T>, RemoteError> {
        let response = request.send().await.map_err(|e| RemoteError::Transport {
            url: e.url().map(|u| u.to_string()).unwrap_or_else(|| self.base_url.clone()),
            message: e.to_string(),
        })?;
        let url = response.url().to_string();
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(RemoteError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.json::<T>().await.map_err(|e| RemoteError::Decode {
            url: url.clone(),
            message: e.to_string(),
        })?;
        Ok(Some(body))
    }
}

#[async_trait]
impl<M: Resource> RemoteSource<M> for HttpRemote<M> {
    async fn list(&self, parent: Option<u64>) -> Result<Vec<M>, RemoteError> {
        let url = self.collection_url();
        let mut request = self.client.get(&url);
        if let (Some(parent), Some(param)) = (parent, M::PARENT_PARAM) {
            request = request.query(&[(param, parent)]);
        }
        tracing::debug!(collection = M::COLLECTION, %url, ?parent, "remote list");

        // A missing collection endpoint is a failure, not an empty list.
        self.read::<Vec<M>>(request)
            .await?
            .ok_or(RemoteError::Status { url, status: 404 })
    }

    async fn get(&self, id: u64) -> Result<Option<M>, RemoteError> {
        let url = format!("{}/{}", self.collection_url(), id);
        tracing::debug!(collection = M::COLLECTION, %url, "remote get");
        self.read::<M>(self.client.get(&url)).await
    }
}
