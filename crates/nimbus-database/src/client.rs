//! HTTP client for the database service API

use crate::api::{DatabaseApi, SnapshotPage, Table, TagPage, WireTag};
use async_trait::async_trait;
use nimbus_tags::{CloudError, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

const DATABASE_ENDPOINT: &str = "https://database.api.nimbus.cloud/v1";

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

/// Authenticated HTTP client for the database service.
pub struct DatabaseClient {
    http: reqwest::Client,
    api_token: String,
    endpoint: String,
}

impl DatabaseClient {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_token: api_token.into(),
            endpoint: DATABASE_ENDPOINT.to_string(),
        }
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn call<T: DeserializeOwned>(
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

    async fn call_result<T: DeserializeOwned>(
        &self,
        action: &str,
        body: &serde_json::Value,
    ) -> Result<T> {
        self.call(action, body)
            .await?
            .result
            .ok_or_else(|| CloudError::InvalidResponse(format!("{action}: missing result")))
    }

    async fn call_ok(&self, action: &str, body: &serde_json::Value) -> Result<()> {
        self.call::<serde_json::Value>(action, body).await?;
        Ok(())
    }
}

#[async_trait]
impl DatabaseApi for DatabaseClient {
    async fn list_tags_of_resource(&self, arn: &str, page_token: Option<&str>) -> Result<TagPage> {
        self.call_result(
            "ListTagsOfResource",
            &json!({ "resource_arn": arn, "next_token": page_token }),
        )
        .await
    }

    async fn tag_resource(&self, arn: &str, tags: &[WireTag]) -> Result<()> {
        self.call_ok("TagResource", &json!({ "resource_arn": arn, "tags": tags }))
            .await
    }

    async fn untag_resource(&self, arn: &str, keys: &[String]) -> Result<()> {
        self.call_ok(
            "UntagResource",
            &json!({ "resource_arn": arn, "tag_keys": keys }),
        )
        .await
    }

    async fn describe_table(&self, name: &str) -> Result<Option<Table>> {
        // The service reports a success envelope with no payload for
        // tables in early provisioning; surface that as None.
        Ok(self
            .call::<Table>("DescribeTable", &json!({ "table_name": name }))
            .await?
            .result)
    }

    async fn list_snapshots(&self, table: &str, page_token: Option<&str>) -> Result<SnapshotPage> {
        self.call_result(
            "ListSnapshots",
            &json!({ "table_name": table, "next_token": page_token }),
        )
        .await
    }
}
