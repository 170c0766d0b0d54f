//! Tag adapter for storage buckets

use crate::api::StorageApi;
use async_trait::async_trait;
use nimbus_tags::{
    CloudError, Result, SYSTEM_TAG_PREFIX, TagAdapter, TagSet, translate_not_found,
};
use std::collections::{BTreeMap, BTreeSet};

const NOT_FOUND_CODES: &[&str] = &["NoSuchBucket"];

/// API code for a bucket that has never been tagged; an empty set, not
/// an error.
const NO_SUCH_TAG_SET: &str = "NoSuchTagSet";

/// [`TagAdapter`] over the whole-document bucket tagging API.
pub struct StorageTags;

/// The raw document, tolerating the never-tagged case.
async fn read_document(
    client: &dyn StorageApi,
    bucket: &str,
) -> Result<BTreeMap<String, String>> {
    match client.get_bucket_tagging(bucket).await {
        Ok(document) => Ok(document),
        Err(CloudError::Api { ref code, .. }) if code == NO_SUCH_TAG_SET => Ok(BTreeMap::new()),
        Err(err) => Err(translate_not_found(err, NOT_FOUND_CODES, bucket)),
    }
}

#[async_trait]
impl TagAdapter for StorageTags {
    type Client = dyn StorageApi;
    type Identity = str;

    async fn list_tags(&self, client: &Self::Client, identity: &str) -> Result<TagSet> {
        let document = read_document(client, identity).await?;
        Ok(document.into_iter().collect::<TagSet>().ignore_system())
    }

    /// Read-merge-write: the service only accepts full-document
    /// replacement, so the current document is fetched, the plan applied
    /// to its user-managed half, and reserved keys carried through
    /// untouched.
    async fn update_tags(
        &self,
        client: &Self::Client,
        identity: &str,
        to_add: &TagSet,
        to_remove: &BTreeSet<String>,
    ) -> Result<()> {
        if to_add.is_empty() && to_remove.is_empty() {
            return Ok(());
        }

        let document = read_document(client, identity).await?;
        let (reserved, user): (BTreeMap<_, _>, BTreeMap<_, _>) = document
            .into_iter()
            .partition(|(k, _)| k.starts_with(SYSTEM_TAG_PREFIX));

        let merged = user
            .into_iter()
            .collect::<TagSet>()
            .merge(&to_add.ignore_system());
        let mut next = reserved;
        for tag in merged.iter() {
            if !to_remove.contains(&tag.key) {
                next.insert(tag.key, tag.value);
            }
        }

        if next.is_empty() {
            tracing::debug!(bucket = identity, "deleting empty tag document");
            client
                .delete_bucket_tagging(identity)
                .await
                .map_err(|err| translate_not_found(err, NOT_FOUND_CODES, identity))
        } else {
            tracing::debug!(bucket = identity, count = next.len(), "replacing tag document");
            client
                .put_bucket_tagging(identity, &next)
                .await
                .map_err(|err| translate_not_found(err, NOT_FOUND_CODES, identity))
        }
    }
}
