//! Test environment utilities
//!
//! Provides endpoint/region detection and unique run ID generation for
//! integration tests against a real deployment.

use chrono::Utc;

/// Get the share API endpoint for tests.
///
/// Checks `SHARE_API_ENDPOINT`, falling back to the service's default
/// local port.
pub fn test_endpoint() -> String {
    std::env::var("SHARE_API_ENDPOINT").unwrap_or_else(|_| "http://127.0.0.1:8786/v2".to_string())
}

/// Get the deployment region for tests.
///
/// Checks environment variables in order:
/// 1. SHARE_API_REGION
/// 2. OS_REGION_NAME
/// 3. Falls back to RegionOne
pub fn test_region() -> String {
    std::env::var("SHARE_API_REGION")
        .or_else(|_| std::env::var("OS_REGION_NAME"))
        .unwrap_or_else(|_| "RegionOne".to_string())
}

/// Generate a unique run ID for test resources.
///
/// Format: `test-{timestamp_ms}-{counter}`. The counter keeps IDs unique
/// even when tests start on the same millisecond.
pub fn test_run_id() -> String {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);

    let ts = Utc::now().timestamp_millis();
    let counter = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("test-{ts}-{counter}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_id_format() {
        let run_id = test_run_id();
        assert!(run_id.starts_with("test-"));
        let parts: Vec<&str> = run_id.strip_prefix("test-").unwrap().split('-').collect();
        assert_eq!(parts.len(), 2);
        parts[0].parse::<i64>().expect("Should be valid timestamp");
        parts[1].parse::<u32>().expect("Should be valid counter");
    }

    #[test]
    fn test_run_id_unique() {
        let id1 = test_run_id();
        let id2 = test_run_id();
        let id3 = test_run_id();
        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
    }

    #[test]
    fn test_endpoint_default_shape() {
        // Whatever the environment says, the value must be a usable URL.
        let endpoint = test_endpoint();
        assert!(endpoint.starts_with("http"));
    }
}
