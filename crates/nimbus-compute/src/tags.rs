//! Tag adapter for compute instances

use crate::api::{ComputeApi, Filter, TagDescription, WireTag};
use async_trait::async_trait;
use nimbus_tags::{NotFoundError, Result, Tag, TagAdapter, TagSet, translate_not_found};
use std::collections::BTreeSet;

/// API error codes the compute service uses for absent resources.
const NOT_FOUND_CODES: &[&str] = &["InvalidInstanceId.NotFound", "InvalidResourceId.NotFound"];

/// [`TagAdapter`] over the instance tagging API.
pub struct ComputeTags;

#[async_trait]
impl TagAdapter for ComputeTags {
    type Client = dyn ComputeApi;
    type Identity = str;

    async fn list_tags(&self, client: &Self::Client, identity: &str) -> Result<TagSet> {
        let filters = [Filter::new("resource-id", [identity])];
        let described = client
            .describe_tags(&filters)
            .await
            .map_err(|err| translate_not_found(err, NOT_FOUND_CODES, &filters))?;

        Ok(from_descriptions(described))
    }

    async fn update_tags(
        &self,
        client: &Self::Client,
        identity: &str,
        to_add: &TagSet,
        to_remove: &BTreeSet<String>,
    ) -> Result<()> {
        let ids = [identity.to_owned()];

        let keys: Vec<String> = to_remove
            .iter()
            .filter(|k| !k.starts_with(nimbus_tags::SYSTEM_TAG_PREFIX))
            .cloned()
            .collect();
        if !keys.is_empty() {
            tracing::debug!(resource = identity, count = keys.len(), "deleting tags");
            client
                .delete_tags(&ids, &keys)
                .await
                .map_err(|err| translate_not_found(err, NOT_FOUND_CODES, &ids))?;
        }

        let adds: Vec<WireTag> = to_wire(&to_add.ignore_system());
        if !adds.is_empty() {
            tracing::debug!(resource = identity, count = adds.len(), "creating tags");
            client
                .create_tags(&ids, &adds)
                .await
                .map_err(|err| translate_not_found(err, NOT_FOUND_CODES, &ids))?;
        }

        Ok(())
    }
}

/// Point lookup using the service's server-side key filter.
///
/// Agrees with the generic [`nimbus_tags::get_tag`] over [`ComputeTags`]
/// for any backend state; only the transfer size differs.
pub async fn get_tag(client: &dyn ComputeApi, identity: &str, key: &str) -> Result<Tag> {
    let filters = [
        Filter::new("resource-id", [identity]),
        Filter::new("key", [key]),
    ];
    let described = client
        .describe_tags(&filters)
        .await
        .map_err(|err| translate_not_found(err, NOT_FOUND_CODES, &filters))?;

    from_descriptions(described)
        .get(key)
        .ok_or_else(|| NotFoundError::empty_result(&filters).into())
}

/// Fold the raw describe output into the uniform model: absent values
/// become empty strings, duplicates resolve last-write-wins, reserved
/// keys drop out.
pub fn from_descriptions(described: Vec<TagDescription>) -> TagSet {
    described
        .into_iter()
        .map(|t| (t.key, t.value.unwrap_or_default()))
        .collect::<TagSet>()
        .ignore_system()
}

fn to_wire(tags: &TagSet) -> Vec<WireTag> {
    tags.iter()
        .map(|t| WireTag {
            key: t.key,
            value: Some(t.value),
        })
        .collect()
}
