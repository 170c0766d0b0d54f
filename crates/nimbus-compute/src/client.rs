//! HTTP clients for the compute-family APIs
//!
//! Thin action-style JSON clients. Credential acquisition and region
//! choice happen upstream; these only hold the resulting bearer token.

use crate::api::{ComputeApi, Filter, Instance, TagDescription, WireTag};
use crate::pools::{AutoscalingApi, Pool, PoolTag};
use async_trait::async_trait;
use nimbus_tags::{CloudError, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

const COMPUTE_ENDPOINT: &str = "https://compute.api.nimbus.cloud/v2";
const AUTOSCALING_ENDPOINT: &str = "https://autoscaling.api.nimbus.cloud/v2";

/// Response envelope every compute-family action returns.
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

/// Shared action-call plumbing for the two service endpoints.
struct Rest {
    http: reqwest::Client,
    api_token: String,
    endpoint: String,
}

impl Rest {
    fn new(api_token: String, endpoint: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_token,
            endpoint,
        }
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

    async fn call<T: DeserializeOwned>(
        &self,
        action: &str,
        body: &serde_json::Value,
    ) -> Result<T> {
        self.call_raw(action, body)
            .await?
            .result
            .ok_or_else(|| CloudError::InvalidResponse(format!("{action}: missing result")))
    }

    /// Action whose success response carries no payload worth keeping.
    async fn call_ok(&self, action: &str, body: &serde_json::Value) -> Result<()> {
        self.call_raw::<serde_json::Value>(action, body).await?;
        Ok(())
    }
}

/// Authenticated HTTP client for the compute service.
pub struct ComputeClient {
    rest: Rest,
}

impl ComputeClient {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            rest: Rest::new(api_token.into(), COMPUTE_ENDPOINT.to_string()),
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.rest.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl ComputeApi for ComputeClient {
    async fn describe_tags(&self, filters: &[Filter]) -> Result<Vec<TagDescription>> {
        self.rest
            .call("DescribeTags", &json!({ "filters": filters }))
            .await
    }

    async fn create_tags(&self, resource_ids: &[String], tags: &[WireTag]) -> Result<()> {
        self.rest
            .call_ok(
                "CreateTags",
                &json!({ "resource_ids": resource_ids, "tags": tags }),
            )
            .await
    }

    async fn delete_tags(&self, resource_ids: &[String], keys: &[String]) -> Result<()> {
        self.rest
            .call_ok(
                "DeleteTags",
                &json!({ "resource_ids": resource_ids, "keys": keys }),
            )
            .await
    }

    async fn describe_instances(&self, instance_ids: &[String]) -> Result<Vec<Instance>> {
        self.rest
            .call("DescribeInstances", &json!({ "instance_ids": instance_ids }))
            .await
    }
}

/// Authenticated HTTP client for the autoscaling service.
pub struct AutoscalingClient {
    rest: Rest,
}

impl AutoscalingClient {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            rest: Rest::new(api_token.into(), AUTOSCALING_ENDPOINT.to_string()),
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.rest.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl AutoscalingApi for AutoscalingClient {
    async fn describe_pool_tags(&self, filters: &[Filter]) -> Result<Vec<PoolTag>> {
        self.rest
            .call("DescribePoolTags", &json!({ "filters": filters }))
            .await
    }

    async fn upsert_pool_tags(&self, tags: &[PoolTag]) -> Result<()> {
        self.rest
            .call_ok("CreateOrUpdatePoolTags", &json!({ "tags": tags }))
            .await
    }

    async fn delete_pool_tags(&self, tags: &[PoolTag]) -> Result<()> {
        self.rest
            .call_ok("DeletePoolTags", &json!({ "tags": tags }))
            .await
    }

    async fn describe_pools(&self, names: &[String]) -> Result<Vec<Pool>> {
        self.rest
            .call("DescribePools", &json!({ "pool_names": names }))
            .await
    }
}
