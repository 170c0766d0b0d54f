//! Database service adapter for the Nimbus provider
//!
//! The database backend pages its tag listing: one resource's tags can
//! span several `ListTagsOfResource` responses chained by a page token.
//! The adapter exhausts the pages and folds them into a single
//! [`nimbus_tags::TagSet`] before anything else sees them.

pub mod api;
pub mod client;
pub mod find;
pub mod status;
pub mod tags;

// Re-exports
pub use api::{DatabaseApi, SnapshotPage, SnapshotSummary, Table, TagPage, WireTag};
pub use client::DatabaseClient;
pub use find::{SNAPSHOT_VERSION_UNPUBLISHED, find_latest_snapshot_version, find_table_by_name};
pub use status::wait_for_table_status;
pub use tags::DatabaseTags;
