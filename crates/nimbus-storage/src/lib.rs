//! Object storage service adapter for the Nimbus provider
//!
//! Storage buckets expose tags as a single document: reads return the
//! whole map, and the only write replaces the whole map (or deletes the
//! document). The adapter therefore turns incremental add/remove plans
//! into a read-merge-write, preserving platform-reserved keys the
//! service keeps inside the same document.

pub mod api;
pub mod client;
pub mod find;
pub mod tags;

// Re-exports
pub use api::{BucketInfo, StorageApi};
pub use client::StorageClient;
pub use find::find_bucket_by_name;
pub use tags::StorageTags;
