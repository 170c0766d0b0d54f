//! Tag adapter for queues

use crate::api::QueueApi;
use async_trait::async_trait;
use nimbus_tags::{Result, TagAdapter, TagSet, translate_not_found};
use std::collections::{BTreeMap, BTreeSet};

const NOT_FOUND_CODES: &[&str] = &["QueueDoesNotExist"];

/// [`TagAdapter`] over the queue tagging API.
pub struct QueueTags;

#[async_trait]
impl TagAdapter for QueueTags {
    type Client = dyn QueueApi;
    type Identity = str;

    async fn list_tags(&self, client: &Self::Client, identity: &str) -> Result<TagSet> {
        let raw = client
            .list_queue_tags(identity)
            .await
            .map_err(|err| translate_not_found(err, NOT_FOUND_CODES, identity))?;

        Ok(raw
            .into_iter()
            .map(|(k, v)| (k, v.unwrap_or_default()))
            .collect::<TagSet>()
            .ignore_system())
    }

    async fn update_tags(
        &self,
        client: &Self::Client,
        identity: &str,
        to_add: &TagSet,
        to_remove: &BTreeSet<String>,
    ) -> Result<()> {
        let keys: Vec<String> = to_remove
            .iter()
            .filter(|k| !k.starts_with(nimbus_tags::SYSTEM_TAG_PREFIX))
            .cloned()
            .collect();
        if !keys.is_empty() {
            tracing::debug!(queue = identity, count = keys.len(), "untagging queue");
            client
                .untag_queue(identity, &keys)
                .await
                .map_err(|err| translate_not_found(err, NOT_FOUND_CODES, identity))?;
        }

        let adds: BTreeMap<String, String> = to_add
            .ignore_system()
            .iter()
            .map(|t| (t.key, t.value))
            .collect();
        if !adds.is_empty() {
            tracing::debug!(queue = identity, count = adds.len(), "tagging queue");
            client
                .tag_queue(identity, &adds)
                .await
                .map_err(|err| translate_not_found(err, NOT_FOUND_CODES, identity))?;
        }

        Ok(())
    }
}
