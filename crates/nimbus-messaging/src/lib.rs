//! Queue service adapter for the Nimbus provider
//!
//! Queue tags come back as a plain map whose values may be null (bare
//! keys); the adapter folds those into the uniform model with empty
//! string values. Queue lookup goes through a name-prefix listing, so an
//! empty result page is the absence signal rather than an API error.

pub mod api;
pub mod client;
pub mod find;
pub mod status;
pub mod tags;

// Re-exports
pub use api::QueueApi;
pub use client::QueueClient;
pub use find::find_queue_by_name;
pub use status::wait_for_queue_state;
pub use tags::QueueTags;
