//! Tracing subscriber setup for tests

use std::sync::Once;

static INIT: Once = Once::new();

/// Install a fmt subscriber honoring `RUST_LOG`, once per process.
///
/// Safe to call from every test; repeated calls are no-ops, and an
/// already-installed global subscriber is left alone.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
