//! Harness configuration types
//!
//! The harness does not load configuration itself; callers assemble a
//! [`HarnessConfig`] from whatever source their suite uses (the types are
//! serde round-trippable so embedding in a larger config file works).
//! Validation is done via `garde::Validate`.

use serde::{Deserialize, Serialize};

use crate::defaults::{default_enable_protocols, default_true};

/// The tenant a harness instance acts as
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Tenant {
    /// The default tenant most suites run as
    Primary,
    /// A second tenant for cross-tenant isolation tests
    Alt,
    /// The administrative tenant
    Admin,
}

/// A resolved credential triplet for one tenant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub project_name: String,
}

/// Credential settings for one tenant; any missing field means the tenant
/// is not configured and suites for it should be skipped
#[derive(Debug, Clone, Default, Serialize, Deserialize, garde::Validate)]
#[serde(deny_unknown_fields)]
pub struct CredentialConfig {
    /// API username
    #[serde(default)]
    #[garde(inner(length(min = 1)))]
    pub username: Option<String>,

    /// API password
    #[serde(default)]
    #[garde(inner(length(min = 1)))]
    pub password: Option<String>,

    /// Project (tenant) name the credentials belong to
    #[serde(default)]
    #[garde(inner(length(min = 1)))]
    pub project_name: Option<String>,
}

impl CredentialConfig {
    /// Resolve the triplet, returning None when any part is missing or empty
    pub fn resolve(&self) -> Option<Credentials> {
        let nonempty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());
        Some(Credentials {
            username: nonempty(&self.username)?,
            password: nonempty(&self.password)?,
            project_name: nonempty(&self.project_name)?,
        })
    }
}

/// Credentials for every tenant the harness can act as
#[derive(Debug, Clone, Default, Serialize, Deserialize, garde::Validate)]
#[serde(deny_unknown_fields)]
pub struct IdentityConfig {
    /// Primary tenant credentials
    #[serde(default)]
    #[garde(dive)]
    pub primary: CredentialConfig,

    /// Alternate tenant credentials
    #[serde(default)]
    #[garde(dive)]
    pub alt: CredentialConfig,

    /// Admin tenant credentials
    #[serde(default)]
    #[garde(dive)]
    pub admin: CredentialConfig,
}

impl IdentityConfig {
    /// Credential settings for the given tenant
    pub fn for_tenant(&self, tenant: Tenant) -> &CredentialConfig {
        match tenant {
            Tenant::Primary => &self.primary,
            Tenant::Alt => &self.alt,
            Tenant::Admin => &self.admin,
        }
    }
}

/// Share service settings
#[derive(Debug, Clone, Serialize, Deserialize, garde::Validate)]
#[serde(deny_unknown_fields)]
pub struct ShareConfig {
    /// Protocols enabled in the deployment under test
    #[serde(default = "default_enable_protocols")]
    #[garde(skip)]
    pub enable_protocols: Vec<String>,

    /// Whether the deployment runs a multi-tenant driver; single-tenant
    /// deployments never need a share-network
    #[serde(default = "default_true")]
    #[garde(skip)]
    pub multitenancy_enabled: bool,

    /// Pre-provisioned share-network for the primary tenant
    #[serde(default)]
    #[garde(inner(length(min = 1)))]
    pub share_network_id: Option<String>,

    /// Pre-provisioned share-network for the alternate tenant
    #[serde(default)]
    #[garde(inner(length(min = 1)))]
    pub alt_share_network_id: Option<String>,

    /// Pre-provisioned share-network for the admin tenant
    #[serde(default)]
    #[garde(inner(length(min = 1)))]
    pub admin_share_network_id: Option<String>,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            enable_protocols: default_enable_protocols(),
            multitenancy_enabled: true,
            share_network_id: None,
            alt_share_network_id: None,
            admin_share_network_id: None,
        }
    }
}

impl ShareConfig {
    /// Pre-provisioned share-network id for the given tenant, if configured
    pub fn preset_share_network_id(&self, tenant: Tenant) -> Option<&str> {
        match tenant {
            Tenant::Primary => self.share_network_id.as_deref(),
            Tenant::Alt => self.alt_share_network_id.as_deref(),
            Tenant::Admin => self.admin_share_network_id.as_deref(),
        }
    }
}

/// Which optional backing services the deployment provides
#[derive(Debug, Clone, Serialize, Deserialize, garde::Validate)]
#[serde(deny_unknown_fields)]
pub struct ServiceAvailability {
    /// Whether a tenant network service is available; required for
    /// multi-tenant share-network provisioning
    #[serde(default = "default_true")]
    #[garde(skip)]
    pub network: bool,
}

impl Default for ServiceAvailability {
    fn default() -> Self {
        Self { network: true }
    }
}

/// Configuration for a harness instance
///
/// Composed of focused sub-configs for organization, mirroring how a
/// deployment's settings file is usually sectioned.
#[derive(Debug, Clone, Default, Serialize, Deserialize, garde::Validate)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    /// Per-tenant credentials
    #[serde(default)]
    #[garde(dive)]
    pub identity: IdentityConfig,

    /// Share service settings
    #[serde(default)]
    #[garde(dive)]
    pub share: ShareConfig,

    /// Optional backing services
    #[serde(default)]
    #[garde(dive)]
    pub service_available: ServiceAvailability,
}
