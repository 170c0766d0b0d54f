//! HTTP client for the queue service API
//!
//! Thin action-style JSON client. Credential acquisition happens
//! upstream; this only holds the resulting bearer token.

use crate::api::QueueApi;
use async_trait::async_trait;
use nimbus_tags::{CloudError, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::collections::BTreeMap;

const QUEUE_ENDPOINT: &str = "https://queue.api.nimbus.cloud/v1";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: Option<T>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct TagMap {
    tags: BTreeMap<String, Option<String>>,
}

#[derive(Debug, Deserialize)]
struct QueueList {
    #[serde(default)]
    queue_urls: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct QueueState {
    state: String,
}

/// Authenticated HTTP client for the queue service.
pub struct QueueClient {
    http: reqwest::Client,
    api_token: String,
    endpoint: String,
}

impl QueueClient {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_token: api_token.into(),
            endpoint: QUEUE_ENDPOINT.to_string(),
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn call_raw<T: DeserializeOwned>(
        &self,
        action: &str,
        body: &serde_json::Value,
    ) -> Result<Envelope<T>> {
        let url = format!("{}/{}", self.endpoint, action);
        tracing::debug!(%url, "calling backend");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(body)
            .send()
            .await
            .map_err(|e| CloudError::Transport(e.to_string()))?;

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| CloudError::Transport(e.to_string()))?;

        if let Some(err) = envelope.error {
            return Err(CloudError::Api {
                code: err.code,
                message: err.message,
            });
        }
        Ok(envelope)
    }

    async fn call<T: DeserializeOwned>(&self, action: &str, body: &serde_json::Value) -> Result<T> {
        self.call_raw(action, body)
            .await?
            .result
            .ok_or_else(|| CloudError::InvalidResponse(format!("{action}: missing result")))
    }

    async fn call_ok(&self, action: &str, body: &serde_json::Value) -> Result<()> {
        self.call_raw::<serde_json::Value>(action, body).await?;
        Ok(())
    }
}

#[async_trait]
impl QueueApi for QueueClient {
    async fn list_queue_tags(&self, queue_url: &str) -> Result<BTreeMap<String, Option<String>>> {
        let map: TagMap = self
            .call("ListQueueTags", &json!({ "queue_url": queue_url }))
            .await?;
        Ok(map.tags)
    }

    async fn tag_queue(&self, queue_url: &str, tags: &BTreeMap<String, String>) -> Result<()> {
        self.call_ok("TagQueue", &json!({ "queue_url": queue_url, "tags": tags }))
            .await
    }

    async fn untag_queue(&self, queue_url: &str, keys: &[String]) -> Result<()> {
        self.call_ok("UntagQueue", &json!({ "queue_url": queue_url, "tag_keys": keys }))
            .await
    }

    async fn list_queues(&self, name_prefix: &str) -> Result<Vec<String>> {
        let list: QueueList = self
            .call("ListQueues", &json!({ "queue_name_prefix": name_prefix }))
            .await?;
        Ok(list.queue_urls)
    }

    async fn get_queue_state(&self, queue_url: &str) -> Result<String> {
        let state: QueueState = self
            .call("GetQueueState", &json!({ "queue_url": queue_url }))
            .await?;
        Ok(state.state)
    }
}
