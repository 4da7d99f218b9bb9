//! share-harness - Integration test support for a share service API
//!
//! This crate provides the pieces an integration suite needs around a share
//! (storage-as-a-service) API client: a per-tenant harness with
//! skip-aware setup and automatic teardown, a LIFO resource tracker, a
//! share-network provisioning helper for multi-tenant deployments, and
//! status/deletion waiting with backoff.
//!
//! The API itself is consumed through the [`api::SharesApi`] and
//! [`api::NetworkApi`] traits; this crate ships no HTTP transport.
//!
//! ## Modules
//!
//! - [`api`]: API capability traits and entity/parameter types
//! - [`case`]: Per-tenant harness (setup gates, create helpers, teardown)
//! - [`data`]: Test data generators
//! - [`error`]: API and harness error types
//! - [`provision`]: Share-network lookup-or-create
//! - [`tracker`]: LIFO resource tracking for cleanup
//! - [`wait`]: Status and deletion waiting with exponential backoff

pub mod api;
pub mod case;
pub mod data;
pub mod error;
pub mod provision;
pub mod tracker;
pub mod wait;

// Re-export commonly used items
pub use api::{NetworkApi, SharesApi};
pub use case::{HarnessBuilder, ShareHarness};
pub use error::{ApiError, HarnessError, SkipReason};
pub use provision::provide_share_network;
pub use share_harness_common::{ResourceKind, ResourceStatus, Tenant};
pub use tracker::{CleanupOutcome, ResourceRecord, ResourceTracker};
pub use wait::WaitConfig;
