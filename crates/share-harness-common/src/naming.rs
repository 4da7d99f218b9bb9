//! Name generation for autogenerated test resources
//!
//! Resources created by the harness carry recognizable names so that leaked
//! ones can be spotted (and swept) in a shared deployment.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;

/// Name given to share-networks the harness creates on its own
pub const AUTO_SHARE_NETWORK_NAME: &str = "autogenerated-by-share-harness";

/// Description attached to autogenerated share-networks
pub const AUTO_SHARE_NETWORK_DESCRIPTION: &str =
    "This share-network was created by share-harness";

/// Generate a unique resource name with the given prefix.
///
/// Format: `{prefix}-{timestamp_ms}-{counter}-{random}`. The counter keeps
/// names unique within a process even when calls land on the same
/// millisecond; the random suffix keeps concurrent test processes from
/// colliding.
pub fn rand_name(prefix: &str) -> String {
    static COUNTER: AtomicU32 = AtomicU32::new(0);

    let ts = Utc::now().timestamp_millis();
    let counter = COUNTER.fetch_add(1, Ordering::Relaxed);
    let suffix: u16 = rand::random();
    format!("{prefix}-{ts}-{counter}-{suffix:04x}")
}
