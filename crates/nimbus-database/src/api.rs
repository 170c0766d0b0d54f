//! Database service API surface

use async_trait::async_trait;
use nimbus_tags::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireTag {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// One page of a resource's tag listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagPage {
    pub tags: Vec<WireTag>,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub arn: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub snapshot_id: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotPage {
    pub snapshots: Vec<SnapshotSummary>,
    #[serde(default)]
    pub next_token: Option<String>,
}

/// Opaque authenticated handle to the database service.
#[async_trait]
pub trait DatabaseApi: Send + Sync {
    /// One page of tags for the resource; pass the previous page's token
    /// to continue.
    async fn list_tags_of_resource(&self, arn: &str, page_token: Option<&str>) -> Result<TagPage>;

    async fn tag_resource(&self, arn: &str, tags: &[WireTag]) -> Result<()>;

    async fn untag_resource(&self, arn: &str, keys: &[String]) -> Result<()>;

    /// `Ok(None)` models the service returning a success envelope with no
    /// table payload; callers classify that as absence.
    async fn describe_table(&self, name: &str) -> Result<Option<Table>>;

    async fn list_snapshots(&self, table: &str, page_token: Option<&str>) -> Result<SnapshotPage>;
}
