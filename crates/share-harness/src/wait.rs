//! Resource waiting with exponential backoff and cancellation support.
//!
//! Provides a generic abstraction for waiting on share service resources
//! (or any async condition) to reach a state, with configurable exponential
//! backoff, jitter, and cancellation.

use std::future::Future;
use std::time::Duration;

use backon::{BackoffBuilder, ExponentialBuilder};
use share_harness_common::defaults::{
    DEFAULT_POLL_INITIAL_MS, DEFAULT_POLL_MAX_SECS, DEFAULT_WAIT_TIMEOUT_SECS,
};
use share_harness_common::{ResourceKind, ResourceStatus};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::{Share, SharesApi, Snapshot};
use crate::error::{ApiError, HarnessError};

/// Configuration for resource waiting with exponential backoff.
#[derive(Debug, Clone)]
pub struct WaitConfig {
    /// Initial delay between checks
    pub initial_delay: Duration,
    /// Maximum delay between checks (cap for exponential growth)
    pub max_delay: Duration,
    /// Maximum total time to wait before timeout
    pub timeout: Duration,
    /// Whether to add jitter to delays
    pub jitter: bool,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(DEFAULT_POLL_INITIAL_MS),
            max_delay: Duration::from_secs(DEFAULT_POLL_MAX_SECS),
            timeout: Duration::from_secs(DEFAULT_WAIT_TIMEOUT_SECS),
            jitter: true,
        }
    }
}

/// Wait for a condition to produce a value, with exponential backoff.
///
/// Uses `backon::ExponentialBuilder` for delay calculation and
/// `tokio::select!` for cancellation support.
///
/// # Arguments
/// * `config` - Wait configuration
/// * `cancel` - Optional cancellation token
/// * `what` - Description for logging and error messages
/// * `check` - Async function returning `Ok(Some(v))` when done,
///   `Ok(None)` to retry, or `Err` to fail fast
pub async fn wait_for<T, F, Fut>(
    config: &WaitConfig,
    cancel: Option<&CancellationToken>,
    what: &str,
    check: F,
) -> Result<T, HarnessError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Option<T>, HarnessError>>,
{
    let start = std::time::Instant::now();
    let mut attempts = 0u32;

    let mut builder = ExponentialBuilder::default()
        .with_min_delay(config.initial_delay)
        .with_max_delay(config.max_delay)
        .with_factor(2.0);
    if config.jitter {
        builder = builder.with_jitter();
    }
    let mut delays = builder.build();

    loop {
        attempts += 1;

        // Check cancellation before each attempt
        if let Some(token) = cancel {
            if token.is_cancelled() {
                return Err(HarnessError::Cancelled {
                    what: what.to_string(),
                });
            }
        }

        // Check timeout
        if start.elapsed() >= config.timeout {
            return Err(HarnessError::Timeout {
                what: what.to_string(),
                attempts,
                timeout: config.timeout,
            });
        }

        // Run the check
        match check().await {
            Ok(Some(value)) => {
                debug!(what = %what, attempts, "Condition met");
                return Ok(value);
            }
            Ok(None) => {
                let delay = delays.next().unwrap_or(config.max_delay);
                debug!(
                    what = %what,
                    attempt = attempts,
                    delay_ms = delay.as_millis(),
                    "Not ready, retrying"
                );

                // Wait with cancellation support
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = async {
                        if let Some(token) = cancel {
                            token.cancelled().await
                        } else {
                            std::future::pending::<()>().await
                        }
                    } => {
                        return Err(HarnessError::Cancelled { what: what.to_string() });
                    }
                }
            }
            Err(e) => {
                warn!(what = %what, error = ?e, "Check failed");
                return Err(e);
            }
        }
    }
}

/// Wait for a share to reach the target status.
///
/// Returns the share in its final state. Fails fast when the share lands in
/// an error status instead of the target.
pub async fn wait_for_share_status<S: SharesApi>(
    client: &S,
    id: &str,
    target: ResourceStatus,
    config: &WaitConfig,
    cancel: Option<&CancellationToken>,
) -> Result<Share, HarnessError> {
    let what = format!("share {id} to become {target}");
    wait_for(config, cancel, &what, || async {
        let share = client.get_share(id).await?;
        status_step(&what, share.status, target).map(|done| done.then_some(share))
    })
    .await
}

/// Wait for a snapshot to reach the target status.
pub async fn wait_for_snapshot_status<S: SharesApi>(
    client: &S,
    id: &str,
    target: ResourceStatus,
    config: &WaitConfig,
    cancel: Option<&CancellationToken>,
) -> Result<Snapshot, HarnessError> {
    let what = format!("snapshot {id} to become {target}");
    wait_for(config, cancel, &what, || async {
        let snapshot = client.get_snapshot(id).await?;
        status_step(&what, snapshot.status, target).map(|done| done.then_some(snapshot))
    })
    .await
}

/// One status poll step: done, keep waiting, or fail on an error status.
fn status_step(
    what: &str,
    current: ResourceStatus,
    target: ResourceStatus,
) -> Result<bool, HarnessError> {
    if current == target {
        Ok(true)
    } else if current.is_error() {
        Err(HarnessError::ErrorStatus {
            what: what.to_string(),
            status: current,
        })
    } else {
        Ok(false)
    }
}

/// Wait until a resource's GET reports not-found, confirming deletion.
pub async fn wait_for_deletion<S: SharesApi>(
    client: &S,
    kind: ResourceKind,
    id: &str,
    config: &WaitConfig,
    cancel: Option<&CancellationToken>,
) -> Result<(), HarnessError> {
    let what = format!("{kind} {id} deletion");
    wait_for(config, cancel, &what, || async {
        let gone = match kind {
            ResourceKind::Share => absent(client.get_share(id).await)?,
            ResourceKind::Snapshot => absent(client.get_snapshot(id).await)?,
            ResourceKind::ShareNetwork => absent(client.get_share_network(id).await)?,
            ResourceKind::SecurityService => absent(client.get_security_service(id).await)?,
        };
        Ok(gone.then_some(()))
    })
    .await
}

/// Map a GET result to "still exists" / "gone", failing on real errors.
fn absent<T>(result: Result<T, ApiError>) -> Result<bool, HarnessError> {
    match result {
        Ok(_) => Ok(false),
        Err(e) if e.is_not_found() => Ok(true),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config() -> WaitConfig {
        WaitConfig {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            timeout: Duration::from_millis(200),
            jitter: false,
        }
    }

    #[tokio::test]
    async fn returns_value_once_ready() {
        let polls = AtomicU32::new(0);
        let result = wait_for(&fast_config(), None, "counter", || async {
            let n = polls.fetch_add(1, Ordering::Relaxed);
            Ok((n >= 2).then_some("done"))
        })
        .await;
        assert_eq!(result.unwrap(), "done");
        assert!(polls.load(Ordering::Relaxed) >= 3);
    }

    #[tokio::test]
    async fn times_out_when_never_ready() {
        let result: Result<(), _> =
            wait_for(&fast_config(), None, "never", || async { Ok(None) }).await;
        match result {
            Err(HarnessError::Timeout { what, attempts, .. }) => {
                assert_eq!(what, "never");
                assert!(attempts > 1);
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn check_errors_fail_fast() {
        let polls = AtomicU32::new(0);
        let result: Result<(), _> = wait_for(&fast_config(), None, "boom", || async {
            polls.fetch_add(1, Ordering::Relaxed);
            Err(HarnessError::Api(ApiError::Transport("refused".to_string())))
        })
        .await;
        assert!(matches!(result, Err(HarnessError::Api(_))));
        assert_eq!(polls.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn cancellation_stops_the_wait() {
        let token = CancellationToken::new();
        token.cancel();
        let result: Result<(), _> =
            wait_for(&fast_config(), Some(&token), "cancelled", || async { Ok(None) }).await;
        assert!(matches!(result, Err(HarnessError::Cancelled { .. })));
    }

    #[test]
    fn status_step_fails_on_error_status() {
        assert!(status_step("s", ResourceStatus::Available, ResourceStatus::Available).unwrap());
        assert!(!status_step("s", ResourceStatus::Creating, ResourceStatus::Available).unwrap());
        assert!(matches!(
            status_step("s", ResourceStatus::Error, ResourceStatus::Available),
            Err(HarnessError::ErrorStatus { .. })
        ));
    }
}
