//! Compute service adapters for the Nimbus provider
//!
//! Covers the two compute-family backends:
//!
//! - **Instances**: tags live behind a filter-based `DescribeTags` call
//!   and support a server-side key filter, so point lookups avoid
//!   transferring the full tag set.
//! - **Autoscaling pools**: tags are keyed by a composite identity
//!   (pool name plus resource kind) and carry a propagation flag.
//!
//! Client construction and credentials are the caller's concern; every
//! operation takes the service handle ([`ComputeApi`] /
//! [`AutoscalingApi`]) by reference.

pub mod api;
pub mod client;
pub mod find;
pub mod pools;
pub mod status;
pub mod tags;

// Re-exports
pub use api::{ComputeApi, Filter, Instance, TagDescription, WireTag};
pub use client::{AutoscalingClient, ComputeClient};
pub use find::find_instance_by_id;
pub use pools::{AutoscalingApi, Pool, PoolId, PoolTag, PoolTags, find_pool_by_name};
pub use status::wait_for_instance_state;
pub use tags::ComputeTags;
