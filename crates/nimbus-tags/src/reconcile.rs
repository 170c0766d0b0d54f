//! Diff-and-patch convergence of a resource's remote tags

use crate::adapter::TagAdapter;
use crate::error::{NotFoundError, Result};
use crate::tags::{Tag, TagSet};
use std::collections::BTreeSet;

/// Minimal tag mutation needed to move a current set to a desired set.
///
/// Ephemeral: computed fresh on every reconciliation pass, never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub to_add: TagSet,
    pub to_remove: BTreeSet<String>,
}

impl ReconcilePlan {
    /// Diff `desired` against `current`.
    ///
    /// Keys present in both with different values count as adds
    /// (overwrites); `to_remove` carries pure removals only.
    pub fn diff(current: &TagSet, desired: &TagSet) -> Self {
        let to_add = current.added(desired);
        let to_remove = current
            .removed(desired)
            .keys()
            .filter(|k| !desired.key_exists(k))
            .map(str::to_owned)
            .collect();

        Self { to_add, to_remove }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Converge a resource's remote tags to `desired`.
///
/// Fetches the current set, diffs, and issues at most one
/// [`TagAdapter::update_tags`] call. Idempotent: a second call with an
/// unchanged desired set computes an empty plan and performs zero backend
/// writes. Platform-reserved keys in `desired` are ignored so they never
/// produce a diff against the filtered remote view.
pub async fn reconcile<A: TagAdapter>(
    adapter: &A,
    client: &A::Client,
    identity: &A::Identity,
    desired: &TagSet,
) -> Result<()> {
    let current = adapter.list_tags(client, identity).await?;
    let plan = ReconcilePlan::diff(&current, &desired.ignore_system());

    if plan.is_empty() {
        tracing::debug!("tags already converged, nothing to apply");
        return Ok(());
    }

    tracing::debug!(
        add = plan.to_add.len(),
        remove = plan.to_remove.len(),
        "applying tag plan"
    );
    adapter
        .update_tags(client, identity, &plan.to_add, &plan.to_remove)
        .await
}

/// Fetch a single tag by key with the generic list-then-filter strategy.
///
/// An absent key yields the not-found signal, never `Ok` with nothing.
/// Backends whose list API supports server-side key filtering expose an
/// optimized equivalent in their own crate; both strategies must agree
/// for the same backend state.
pub async fn get_tag<A: TagAdapter>(
    adapter: &A,
    client: &A::Client,
    identity: &A::Identity,
    key: &str,
) -> Result<Tag> {
    let tags = adapter.list_tags(client, identity).await?;
    tags.get(key)
        .ok_or_else(|| NotFoundError::empty_result(key).into())
}
