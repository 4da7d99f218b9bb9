//! Default configuration values shared across the harness
//!
//! These constants ensure consistent defaults across the harness and the
//! test utilities.

/// Share protocols the harness supports out of the box
pub const SUPPORTED_PROTOCOLS: &[&str] = &["nfs", "cifs"];

/// Default size for created shares, in GiB
pub const DEFAULT_SHARE_SIZE_GIB: u64 = 1;

/// Default description for shares created by the harness
pub const DEFAULT_SHARE_DESCRIPTION: &str = "Created by share-harness";

/// Default description for snapshots created by the harness
pub const DEFAULT_SNAPSHOT_DESCRIPTION: &str = "Snapshot created by share-harness";

/// Default total wait time for a resource status change (5 minutes)
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 300;

/// Default initial delay between status polls, in milliseconds
pub const DEFAULT_POLL_INITIAL_MS: u64 = 500;

/// Default cap on the delay between status polls, in seconds
pub const DEFAULT_POLL_MAX_SECS: u64 = 10;

// Serde default functions for struct field defaults

/// Returns the default enabled protocol list
pub fn default_enable_protocols() -> Vec<String> {
    SUPPORTED_PROTOCOLS.iter().map(|p| (*p).to_string()).collect()
}

/// Returns true; used for flags that default to enabled
pub fn default_true() -> bool {
    true
}
