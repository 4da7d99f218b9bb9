//! Error classification for the share API and the harness
//!
//! Provides typed errors so cleanup and retry logic can match on error
//! categories instead of string matching on messages.

use std::time::Duration;

use share_harness_common::{ResourceKind, ResourceStatus, Tenant};
use thiserror::Error;

/// API error categories for retry and cleanup logic
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource was not found (safe to treat as already deleted in cleanup)
    #[error("{resource} '{id}' not found")]
    NotFound {
        resource: &'static str,
        id: String,
    },

    /// Resource already exists (safe to ignore in lookup-or-create paths)
    #[error("resource already exists")]
    AlreadyExists,

    /// Credentials were rejected
    #[error("request unauthorized")]
    Unauthorized,

    /// Rate limit exceeded (retryable with backoff)
    #[error("rate limit exceeded")]
    RateLimited,

    /// Resource is in a state that blocks the operation (retryable, e.g.
    /// deleting a share-network that still has shares)
    #[error("conflicting resource state")]
    Conflict,

    /// Unexpected HTTP response
    #[error("unexpected HTTP status {status}: {message}")]
    Http { status: u16, message: String },

    /// Connection-level failure before any response
    #[error("transport error: {0}")]
    Transport(String),
}

impl ApiError {
    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::RateLimited | ApiError::Conflict)
    }

    /// Check if this is an "already exists" error
    pub fn is_already_exists(&self) -> bool {
        matches!(self, ApiError::AlreadyExists)
    }
}

/// Classify an HTTP response status into an [`ApiError`].
///
/// `resource` and `id` name what the request was about, so a 404 carries
/// enough context for cleanup logic and log lines.
pub fn classify_status(
    resource: &'static str,
    id: &str,
    status: u16,
    message: &str,
) -> ApiError {
    match status {
        404 => ApiError::NotFound {
            resource,
            id: id.to_string(),
        },
        401 | 403 => ApiError::Unauthorized,
        // 409 on create usually means a duplicate; on delete it means the
        // resource is still in use. Callers that can tell the difference
        // construct AlreadyExists directly.
        409 => ApiError::Conflict,
        429 => ApiError::RateLimited,
        _ => ApiError::Http {
            status,
            message: message.to_string(),
        },
    }
}

/// Why a harness refused to run a suite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The tenant's credential triplet is incomplete
    MissingCredentials { tenant: Tenant },
    /// None of the suite's protocols are enabled in the deployment
    ProtocolsDisabled,
    /// Multi-tenant mode needs the network service, which is unavailable
    NetworkServiceUnavailable,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingCredentials { tenant } => {
                write!(f, "missing API credentials for tenant '{tenant}'")
            }
            SkipReason::ProtocolsDisabled => write!(f, "share service protocols are disabled"),
            SkipReason::NetworkServiceUnavailable => {
                write!(f, "network service support is required")
            }
        }
    }
}

/// Errors produced by harness setup, waiting, and cleanup
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The suite should be skipped, not failed
    #[error("skipped: {reason}")]
    Skip { reason: SkipReason },

    /// No active, non-external network with a subnet exists to bind a
    /// share-network to
    #[error("no available network for share-network provisioning")]
    NoAvailableNetwork,

    /// The API rejected or failed a request
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A wait gave up before the resource reached the expected state
    #[error("timed out waiting for {what} after {attempts} attempts in {timeout:?}")]
    Timeout {
        what: String,
        attempts: u32,
        timeout: Duration,
    },

    /// A wait was cancelled via its cancellation token
    #[error("wait for {what} cancelled")]
    Cancelled { what: String },

    /// A resource transitioned into a failure status while being waited on
    #[error("{what} entered status '{status}'")]
    ErrorStatus {
        what: String,
        status: ResourceStatus,
    },

    /// A tracked record body carries no usable id
    #[error("tracked {kind} record has no id field")]
    MissingId { kind: ResourceKind },

    /// A resource body could not be encoded for tracking
    #[error("failed to encode resource body")]
    Body(#[from] serde_json::Error),
}

impl HarnessError {
    /// Build a skip signal
    pub fn skip(reason: SkipReason) -> Self {
        HarnessError::Skip { reason }
    }

    /// Check whether this error means "skip the suite" rather than "fail it"
    pub fn is_skip(&self) -> bool {
        matches!(self, HarnessError::Skip { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_not_found() {
        let err = classify_status("share", "share-1", 404, "gone");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "share 'share-1' not found");
    }

    #[test]
    fn classify_auth_and_throttle() {
        assert!(matches!(
            classify_status("share", "x", 401, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            classify_status("share", "x", 403, ""),
            ApiError::Unauthorized
        ));
        let throttled = classify_status("share", "x", 429, "slow down");
        assert!(throttled.is_retryable());
    }

    #[test]
    fn classify_conflict_is_retryable() {
        let err = classify_status("share_network", "sn-1", 409, "in use");
        assert!(err.is_retryable());
        assert!(!err.is_not_found());
    }

    #[test]
    fn classify_unknown_keeps_status_and_message() {
        match classify_status("share", "x", 503, "maintenance") {
            ApiError::Http { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("expected Http, got {other:?}"),
        }
    }

    #[test]
    fn skip_signals_are_distinguishable() {
        let err = HarnessError::skip(SkipReason::MissingCredentials {
            tenant: Tenant::Alt,
        });
        assert!(err.is_skip());
        assert!(err.to_string().contains("alt"));

        let err = HarnessError::NoAvailableNetwork;
        assert!(!err.is_skip());
    }
}
