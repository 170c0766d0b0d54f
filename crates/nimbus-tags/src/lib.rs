//! Nimbus provider tag layer
//!
//! This crate provides the uniform tagging abstraction shared by every
//! Nimbus service adapter: a normalized key/value tag model, a typed
//! not-found signal, a diff-and-patch reconciler, and a generic waiter
//! for asynchronous backend state transitions.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │           resource lifecycle driver              │
//! │         (create/read/update/delete)              │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                nimbus-tags                       │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │        trait TagAdapter { ... }           │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────┐ ┌───────────┐ ┌────────────┐     │
//! │  │  TagSet  │ │ reconcile │ │   waiter   │     │
//! │  └──────────┘ └───────────┘ └────────────┘     │
//! └───────┬───────────┬──────────────┬──────────────┘
//!         │           │              │
//! ┌───────▼────┐ ┌────▼───────┐ ┌───▼──────────┐
//! │  compute   │ │  database  │ │ storage, ... │
//! │  adapters  │ │  adapters  │ │   adapters   │
//! └────────────┘ └────────────┘ └──────────────┘
//! ```
//!
//! Each backend service crate implements [`TagAdapter`] over its own
//! opaque client handle; the reconciler and waiter work against any of
//! them through static dispatch.

pub mod adapter;
pub mod error;
pub mod reconcile;
pub mod tags;
pub mod waiter;

// Re-exports
pub use adapter::TagAdapter;
pub use error::{CloudError, NotFoundError, Result, translate_not_found};
pub use reconcile::{ReconcilePlan, get_tag, reconcile};
pub use tags::{IgnoreConfig, SYSTEM_TAG_PREFIX, Tag, TagSet};
pub use waiter::{STATE_ABSENT, WaitConfig, WaitError, wait_for_state};
