//! Compute service API surface
//!
//! The trait below is the opaque client handle the rest of the provider
//! passes around; [`crate::client::ComputeClient`] implements it over
//! HTTP and tests substitute in-memory fakes.

use async_trait::async_trait;
use nimbus_tags::Result;
use serde::{Deserialize, Serialize};

/// Filter expression for describe calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub name: String,
    pub values: Vec<String>,
}

impl Filter {
    pub fn new<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Tag as reported by `DescribeTags`, annotated with the resource it
/// belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDescription {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    pub resource_id: String,
}

/// Tag in the shape the write calls accept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTag {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub instance_id: String,
    pub state: String,
    #[serde(default)]
    pub image_id: Option<String>,
}

/// Opaque authenticated handle to the compute service.
#[async_trait]
pub trait ComputeApi: Send + Sync {
    /// Tags matching all of `filters`, across resources.
    async fn describe_tags(&self, filters: &[Filter]) -> Result<Vec<TagDescription>>;

    /// Add or overwrite tags on the given resources.
    async fn create_tags(&self, resource_ids: &[String], tags: &[WireTag]) -> Result<()>;

    /// Delete tags by key from the given resources.
    async fn delete_tags(&self, resource_ids: &[String], keys: &[String]) -> Result<()>;

    /// Instances matching `instance_ids`; unknown ids surface as the
    /// service's `InvalidInstanceId.NotFound` API error.
    async fn describe_instances(&self, instance_ids: &[String]) -> Result<Vec<Instance>>;
}
