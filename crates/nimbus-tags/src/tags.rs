//! Normalized key/value tag model
//!
//! Every backend exposes tags in its own shape (list of structs, plain
//! map, paginated list); adapters fold those into a [`TagSet`] so the
//! rest of the provider only ever sees one representation.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Prefix of keys the platform injects and manages itself.
///
/// Matching is case-sensitive. These keys are excluded on both the read
/// and the write path so they never show up as spurious diffs.
pub const SYSTEM_TAG_PREFIX: &str = "nimbus:";

/// A single key/value tag attached to a cloud resource.
///
/// Backends that allow bare keys report the value as absent; the model
/// treats that as an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered mapping from key to value, keys unique.
///
/// Construction from a raw backend list deduplicates by key with
/// last-write-wins semantics. Equality is set equality over (key, value)
/// pairs; the order of the input list never affects comparisons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet {
    tags: BTreeMap<String, String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag, overwriting any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }

    pub fn key_exists(&self, key: &str) -> bool {
        self.tags.contains_key(key)
    }

    pub fn key_value(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<Tag> {
        self.tags.get(key).map(|value| Tag::new(key, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Iterate tags in key order.
    pub fn iter(&self) -> impl Iterator<Item = Tag> + '_ {
        self.tags.iter().map(|(k, v)| Tag::new(k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    /// Right-biased union: values in `other` win on key collision.
    pub fn merge(&self, other: &TagSet) -> TagSet {
        let mut merged = self.tags.clone();
        for (k, v) in &other.tags {
            merged.insert(k.clone(), v.clone());
        }
        TagSet { tags: merged }
    }

    /// Pairs in `other` that are new relative to `self`, or whose value
    /// differs from the one in `self`.
    pub fn added(&self, other: &TagSet) -> TagSet {
        other
            .tags
            .iter()
            .filter(|(k, v)| self.tags.get(k.as_str()) != Some(*v))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Pairs in `self` whose key is absent from `other`, or whose value
    /// differs from the one in `other`.
    pub fn removed(&self, other: &TagSet) -> TagSet {
        self.tags
            .iter()
            .filter(|(k, v)| other.tags.get(k.as_str()) != Some(*v))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Drop every key matched by `config`.
    pub fn ignore(&self, config: &IgnoreConfig) -> TagSet {
        self.tags
            .iter()
            .filter(|(k, _)| !config.matches(k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Drop platform-reserved keys.
    pub fn ignore_system(&self) -> TagSet {
        self.tags
            .iter()
            .filter(|(k, _)| !k.starts_with(SYSTEM_TAG_PREFIX))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for (k, v) in iter {
            set.insert(k, v);
        }
        set
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        iter.into_iter().map(|t| (t.key, t.value)).collect()
    }
}

/// Keys to exclude from diffs: reserved prefixes plus a literal key list.
///
/// The platform prefix is always in effect; this carries the
/// user-configured additions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreConfig {
    pub prefixes: Vec<String>,
    pub keys: BTreeSet<String>,
}

impl IgnoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.keys.insert(key.into());
        self
    }

    /// Case-sensitive match against the reserved prefix, the configured
    /// prefixes, and the configured literal keys.
    pub fn matches(&self, key: &str) -> bool {
        key.starts_with(SYSTEM_TAG_PREFIX)
            || self.prefixes.iter().any(|p| key.starts_with(p.as_str()))
            || self.keys.contains(key)
    }
}
