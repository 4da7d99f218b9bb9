//! Canonical status values for share service resources
//!
//! The API reports resource status as lowercase strings; this enum replaces
//! string comparisons throughout the harness.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a share service resource
///
/// These values match the wire format and must remain stable:
/// shares and snapshots move `creating -> available`, deletion moves
/// `deleting` until the resource disappears, and failures land in
/// `error` or `error_deleting`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ResourceStatus {
    /// Being provisioned, not yet usable
    #[default]
    Creating,
    /// Ready for use
    Available,
    /// Provisioning failed
    Error,
    /// Deletion in progress
    Deleting,
    /// Deletion failed
    ErrorDeleting,
}

impl ResourceStatus {
    /// Check if the status represents a terminal state for creation waits
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Available | Self::Error)
    }

    /// Check if the status represents a failure
    pub fn is_error(self) -> bool {
        matches!(self, Self::Error | Self::ErrorDeleting)
    }

    /// Parse from string, returning None for unknown values
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}
