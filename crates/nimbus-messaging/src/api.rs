//! Queue service API surface

use async_trait::async_trait;
use nimbus_tags::Result;
use std::collections::BTreeMap;

/// Opaque authenticated handle to the queue service.
///
/// Queues are addressed by URL; [`crate::find::find_queue_by_name`]
/// resolves a bare name to one.
#[async_trait]
pub trait QueueApi: Send + Sync {
    /// The queue's tag map. Values are null for bare keys. An unknown
    /// queue surfaces the `QueueDoesNotExist` API error.
    async fn list_queue_tags(&self, queue_url: &str)
    -> Result<BTreeMap<String, Option<String>>>;

    async fn tag_queue(&self, queue_url: &str, tags: &BTreeMap<String, String>) -> Result<()>;

    async fn untag_queue(&self, queue_url: &str, keys: &[String]) -> Result<()>;

    /// URLs of queues whose name starts with `name_prefix`.
    async fn list_queues(&self, name_prefix: &str) -> Result<Vec<String>>;

    /// Lifecycle state of the queue ("active", "deleting", ...).
    async fn get_queue_state(&self, queue_url: &str) -> Result<String>;
}
