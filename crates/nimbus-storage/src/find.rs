//! Bucket lookups

use crate::api::{BucketInfo, StorageApi};
use nimbus_tags::{Result, translate_not_found};

const NOT_FOUND_CODES: &[&str] = &["NoSuchBucket", "NotFound"];

/// Fetch a bucket's current remote state by name.
pub async fn find_bucket_by_name(client: &dyn StorageApi, name: &str) -> Result<BucketInfo> {
    client
        .head_bucket(name)
        .await
        .map_err(|err| translate_not_found(err, NOT_FOUND_CODES, name))
}
