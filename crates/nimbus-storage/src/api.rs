//! Object storage service API surface

use async_trait::async_trait;
use nimbus_tags::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketInfo {
    pub name: String,
    pub region: String,
}

/// Opaque authenticated handle to the object storage service.
#[async_trait]
pub trait StorageApi: Send + Sync {
    /// The bucket's full tag document. A bucket that has never been
    /// tagged surfaces the `NoSuchTagSet` API error.
    async fn get_bucket_tagging(&self, bucket: &str) -> Result<BTreeMap<String, String>>;

    /// Replace the bucket's tag document wholesale.
    async fn put_bucket_tagging(&self, bucket: &str, tags: &BTreeMap<String, String>)
    -> Result<()>;

    /// Delete the bucket's tag document.
    async fn delete_bucket_tagging(&self, bucket: &str) -> Result<()>;

    async fn head_bucket(&self, bucket: &str) -> Result<BucketInfo>;
}
