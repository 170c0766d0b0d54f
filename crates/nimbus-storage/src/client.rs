//! HTTP client for the object storage service API
//!
//! Unlike the action-style services, storage is resource-oriented: tag
//! documents live under `/buckets/{name}/tagging`.

use crate::api::{BucketInfo, StorageApi};
use async_trait::async_trait;
use nimbus_tags::{CloudError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

const STORAGE_ENDPOINT: &str = "https://storage.api.nimbus.cloud/v1";

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: String,
    message: String,
}

/// Authenticated HTTP client for the storage service.
pub struct StorageClient {
    http: reqwest::Client,
    api_token: String,
    endpoint: String,
}

impl StorageClient {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_token: api_token.into(),
            endpoint: STORAGE_ENDPOINT.to_string(),
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Map a non-success response to the structured API error.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let body: ApiErrorBody = response
            .json()
            .await
            .map_err(|e| CloudError::InvalidResponse(e.to_string()))?;
        Err(CloudError::Api {
            code: body.code,
            message: body.message,
        })
    }

    fn url(&self, bucket: &str, suffix: &str) -> String {
        format!("{}/buckets/{bucket}{suffix}", self.endpoint)
    }
}

#[async_trait]
impl StorageApi for StorageClient {
    async fn get_bucket_tagging(&self, bucket: &str) -> Result<BTreeMap<String, String>> {
        let url = self.url(bucket, "/tagging");
        tracing::debug!(%url, "fetching tag document");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| CloudError::Transport(e.to_string()))?;

        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| CloudError::InvalidResponse(e.to_string()))
    }

    async fn put_bucket_tagging(
        &self,
        bucket: &str,
        tags: &BTreeMap<String, String>,
    ) -> Result<()> {
        let url = self.url(bucket, "/tagging");
        tracing::debug!(%url, count = tags.len(), "replacing tag document");

        let response = self
            .http
            .put(&url)
            .bearer_auth(&self.api_token)
            .json(tags)
            .send()
            .await
            .map_err(|e| CloudError::Transport(e.to_string()))?;

        Self::check(response).await.map(|_| ())
    }

    async fn delete_bucket_tagging(&self, bucket: &str) -> Result<()> {
        let url = self.url(bucket, "/tagging");
        tracing::debug!(%url, "deleting tag document");

        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| CloudError::Transport(e.to_string()))?;

        Self::check(response).await.map(|_| ())
    }

    async fn head_bucket(&self, bucket: &str) -> Result<BucketInfo> {
        let url = self.url(bucket, "");
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| CloudError::Transport(e.to_string()))?;

        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| CloudError::InvalidResponse(e.to_string()))
    }
}
