//! Share service resource types and cleanup ordering
//!
//! Provides consistent cleanup priority across all cleanup implementations.
//! Resources must be cleaned in dependency order to avoid failures.

use serde::{Deserialize, Serialize};

/// Types of share service resources tracked by the harness
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ResourceKind {
    /// Snapshot of a share (must be deleted before its parent share)
    Snapshot,
    /// Share (must be deleted before its share-network can go)
    Share,
    /// Share-network binding a tenant network/subnet to the service
    ShareNetwork,
    /// Security service attached to a share-network
    SecurityService,
}

impl ResourceKind {
    /// Get cleanup priority (lower number = cleanup first)
    ///
    /// Resources must be cleaned up in dependency order:
    /// - 0: Delete snapshots (block deletion of their parent shares)
    /// - 1: Delete shares (keep their share-network in use)
    /// - 2: Delete share-networks (keep attached security services in use)
    /// - 3: Delete security services
    ///
    /// The LIFO tracker already yields this order for resources created
    /// through the harness; the explicit priority is for cleaning up
    /// unordered sets of leaked resources.
    pub fn cleanup_priority(self) -> u8 {
        match self {
            ResourceKind::Snapshot => 0,
            ResourceKind::Share => 1,
            ResourceKind::ShareNetwork => 2,
            ResourceKind::SecurityService => 3,
        }
    }

    /// Stable string form used in logs and record bodies
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Snapshot => "snapshot",
            ResourceKind::Share => "share",
            ResourceKind::ShareNetwork => "share_network",
            ResourceKind::SecurityService => "security_service",
        }
    }
}
