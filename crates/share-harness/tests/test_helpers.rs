//! Shared utilities for harness integration tests
//!
//! Provides config fixtures wired for the in-memory fake service.

use share_harness_common::config::{CredentialConfig, HarnessConfig};

/// Credential triplet for one tenant
pub fn credentials(username: &str) -> CredentialConfig {
    CredentialConfig {
        username: Some(username.to_string()),
        password: Some("secret".to_string()),
        project_name: Some(format!("{username}-project")),
    }
}

/// Config with primary credentials and default share settings
pub fn base_config() -> HarnessConfig {
    let mut config = HarnessConfig::default();
    config.identity.primary = credentials("demo");
    config
}

/// Config for a single-tenant deployment
pub fn single_tenant_config() -> HarnessConfig {
    let mut config = base_config();
    config.share.multitenancy_enabled = false;
    config
}
