//! Tag adapter and lookups for autoscaling pools
//!
//! Pool tags are keyed by a composite identity: the pool name plus the
//! kind of resource the tag applies to. The adapter takes both parts
//! explicitly; it never derives them by splitting a joined string.

use async_trait::async_trait;
use nimbus_tags::{
    NotFoundError, Result, Tag, TagAdapter, TagSet, translate_not_found,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::api::Filter;

const NOT_FOUND_CODES: &[&str] = &["PoolNotFound", "ValidationError.NoSuchPool"];

/// Composite identity of a pool's tag namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolId {
    pub name: String,
    pub resource_kind: String,
}

impl PoolId {
    pub fn new(name: impl Into<String>, resource_kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resource_kind: resource_kind.into(),
        }
    }
}

/// Tag in the pool service's wire shape.
///
/// `propagate` controls whether the tag is copied onto resources the
/// pool launches; writes default it to true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolTag {
    pub pool_name: String,
    pub resource_kind: String,
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default = "default_propagate")]
    pub propagate: bool,
}

fn default_propagate() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub name: String,
    pub resource_kind: String,
    pub status: String,
    pub desired_capacity: u32,
}

/// Opaque authenticated handle to the autoscaling service.
#[async_trait]
pub trait AutoscalingApi: Send + Sync {
    async fn describe_pool_tags(&self, filters: &[Filter]) -> Result<Vec<PoolTag>>;

    /// Add or overwrite pool tags.
    async fn upsert_pool_tags(&self, tags: &[PoolTag]) -> Result<()>;

    /// Delete pool tags; only the identity fields and key are read.
    async fn delete_pool_tags(&self, tags: &[PoolTag]) -> Result<()>;

    async fn describe_pools(&self, names: &[String]) -> Result<Vec<Pool>>;
}

/// [`TagAdapter`] over the pool tagging API.
pub struct PoolTags;

impl PoolTags {
    fn filters(id: &PoolId) -> [Filter; 2] {
        [
            Filter::new("pool-name", [id.name.as_str()]),
            Filter::new("resource-kind", [id.resource_kind.as_str()]),
        ]
    }

    fn wire(id: &PoolId, key: String, value: Option<String>) -> PoolTag {
        PoolTag {
            pool_name: id.name.clone(),
            resource_kind: id.resource_kind.clone(),
            key,
            value,
            propagate: true,
        }
    }
}

#[async_trait]
impl TagAdapter for PoolTags {
    type Client = dyn AutoscalingApi;
    type Identity = PoolId;

    async fn list_tags(&self, client: &Self::Client, identity: &PoolId) -> Result<TagSet> {
        let filters = Self::filters(identity);
        let described = client
            .describe_pool_tags(&filters)
            .await
            .map_err(|err| translate_not_found(err, NOT_FOUND_CODES, &filters))?;

        Ok(described
            .into_iter()
            .map(|t| (t.key, t.value.unwrap_or_default()))
            .collect::<TagSet>()
            .ignore_system())
    }

    async fn update_tags(
        &self,
        client: &Self::Client,
        identity: &PoolId,
        to_add: &TagSet,
        to_remove: &BTreeSet<String>,
    ) -> Result<()> {
        let removals: Vec<PoolTag> = to_remove
            .iter()
            .filter(|k| !k.starts_with(nimbus_tags::SYSTEM_TAG_PREFIX))
            .map(|k| Self::wire(identity, k.clone(), None))
            .collect();
        if !removals.is_empty() {
            client
                .delete_pool_tags(&removals)
                .await
                .map_err(|err| translate_not_found(err, NOT_FOUND_CODES, identity))?;
        }

        let additions: Vec<PoolTag> = to_add
            .ignore_system()
            .iter()
            .map(|t| Self::wire(identity, t.key, Some(t.value)))
            .collect();
        if !additions.is_empty() {
            client
                .upsert_pool_tags(&additions)
                .await
                .map_err(|err| translate_not_found(err, NOT_FOUND_CODES, identity))?;
        }

        Ok(())
    }
}

/// Point lookup through the pool service's server-side key filter.
pub async fn get_tag(client: &dyn AutoscalingApi, identity: &PoolId, key: &str) -> Result<Tag> {
    let [by_name, by_kind] = PoolTags::filters(identity);
    let filters = [by_name, by_kind, Filter::new("key", [key])];
    let described = client
        .describe_pool_tags(&filters)
        .await
        .map_err(|err| translate_not_found(err, NOT_FOUND_CODES, &filters))?;

    described
        .into_iter()
        .map(|t| (t.key, t.value.unwrap_or_default()))
        .collect::<TagSet>()
        .get(key)
        .ok_or_else(|| NotFoundError::empty_result(&filters).into())
}

/// Fetch a pool's current remote state by name.
pub async fn find_pool_by_name(client: &dyn AutoscalingApi, name: &str) -> Result<Pool> {
    let names = [name.to_owned()];
    let pools = client
        .describe_pools(&names)
        .await
        .map_err(|err| translate_not_found(err, NOT_FOUND_CODES, &names))?;

    pools
        .into_iter()
        .next()
        .ok_or_else(|| NotFoundError::empty_result(&names).into())
}
