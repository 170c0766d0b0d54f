//! Uniform adapter capability over one backend's tagging API

use crate::error::Result;
use crate::tags::TagSet;
use async_trait::async_trait;
use std::collections::BTreeSet;

/// Tagging capability implemented once per backend service.
///
/// `Client` is the opaque authenticated handle for the backend (its
/// construction, credentials, and region resolution are the caller's
/// concern). `Identity` is the backend's resource identifier shape; a
/// backend keyed by several sub-identifiers uses a composite type here
/// instead of splitting an opaque string.
#[async_trait]
pub trait TagAdapter: Send + Sync {
    type Client: ?Sized + Sync;
    type Identity: ?Sized + Sync;

    /// Fetch all current tags for a resource, exhausting pagination where
    /// the backend requires it. Platform-reserved keys are filtered out.
    async fn list_tags(&self, client: &Self::Client, identity: &Self::Identity)
    -> Result<TagSet>;

    /// Issue the minimal backend call(s) to add/overwrite `to_add` and
    /// delete `to_remove`. An empty half issues no call; callers never
    /// invoke this with both halves empty.
    async fn update_tags(
        &self,
        client: &Self::Client,
        identity: &Self::Identity,
        to_add: &TagSet,
        to_remove: &BTreeSet<String>,
    ) -> Result<()>;
}
