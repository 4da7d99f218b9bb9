//! Share service API capability traits
//!
//! The harness consumes clients through these traits rather than any
//! concrete transport. A deployment's real REST client implements them; the
//! in-memory fake in `share-harness-test-utils` implements them for unit
//! tests. Methods return `impl Future` so implementations stay mockable
//! without boxing.

use std::collections::BTreeMap;
use std::future::Future;

use serde::{Deserialize, Serialize};
use share_harness_common::ResourceStatus;
use share_harness_common::defaults::DEFAULT_SHARE_SIZE_GIB;

use crate::error::ApiError;

/// A provisioned network-attached storage export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Share {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub status: ResourceStatus,
    /// Export protocol ("nfs", "cifs", ...)
    #[serde(default)]
    pub protocol: Option<String>,
    pub size_gib: u64,
    #[serde(default)]
    pub snapshot_id: Option<String>,
    #[serde(default)]
    pub share_network_id: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// Point-in-time snapshot of a share
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: String,
    pub share_id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub status: ResourceStatus,
}

/// A binding of the share service to a tenant network/subnet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareNetwork {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Tenant network this share-network is bound to
    #[serde(default)]
    pub network_id: Option<String>,
    /// Subnet within the tenant network
    #[serde(default)]
    pub subnet_id: Option<String>,
}

/// Kind of authentication backend a security service fronts
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SecurityServiceKind {
    Ldap,
    Kerberos,
    ActiveDirectory,
}

/// An authentication backend attached to a share-network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityService {
    pub id: String,
    pub kind: SecurityServiceKind,
    #[serde(default)]
    pub name: Option<String>,
}

/// A tenant network as reported by the network service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Raw status string; the provisioning helper only cares whether it is
    /// "active" (case-insensitive)
    pub status: String,
    /// Whether the network is externally routed; external networks are
    /// never used for share-networks
    #[serde(default)]
    pub router_external: bool,
    /// Subnets attached to the network
    #[serde(default)]
    pub subnet_ids: Vec<String>,
}

/// Parameters for creating a share
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShareParams {
    /// Export protocol; None lets the service pick its default
    #[serde(default)]
    pub protocol: Option<String>,
    pub size_gib: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Create from this snapshot instead of empty
    #[serde(default)]
    pub snapshot_id: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default)]
    pub share_network_id: Option<String>,
}

impl Default for CreateShareParams {
    fn default() -> Self {
        Self {
            protocol: None,
            size_gib: DEFAULT_SHARE_SIZE_GIB,
            name: None,
            description: None,
            snapshot_id: None,
            metadata: BTreeMap::new(),
            share_network_id: None,
        }
    }
}

/// Parameters for creating a snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Snapshot even if the share is busy
    #[serde(default)]
    pub force: bool,
}

/// Parameters for creating a share-network
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareNetworkParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub network_id: Option<String>,
    #[serde(default)]
    pub subnet_id: Option<String>,
}

/// Parameters for creating a security service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityServiceParams {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub dns_ip: Option<String>,
    #[serde(default)]
    pub server: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub sid: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Share service operations the harness depends on.
///
/// This trait abstracts the share API client to enable unit testing of
/// harness logic without a real deployment.
pub trait SharesApi: Send + Sync {
    /// Create a share
    fn create_share(
        &self,
        params: &CreateShareParams,
    ) -> impl Future<Output = Result<Share, ApiError>> + Send;

    /// Fetch a share by id
    fn get_share(&self, id: &str) -> impl Future<Output = Result<Share, ApiError>> + Send;

    /// Delete a share
    fn delete_share(&self, id: &str) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Create a snapshot of a share
    fn create_snapshot(
        &self,
        share_id: &str,
        params: &SnapshotParams,
    ) -> impl Future<Output = Result<Snapshot, ApiError>> + Send;

    /// Fetch a snapshot by id
    fn get_snapshot(&self, id: &str) -> impl Future<Output = Result<Snapshot, ApiError>> + Send;

    /// Delete a snapshot
    fn delete_snapshot(&self, id: &str) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Create a share-network
    fn create_share_network(
        &self,
        params: &ShareNetworkParams,
    ) -> impl Future<Output = Result<ShareNetwork, ApiError>> + Send;

    /// Fetch a share-network by id
    fn get_share_network(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<ShareNetwork, ApiError>> + Send;

    /// Delete a share-network
    fn delete_share_network(&self, id: &str) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// List share-networks with their network/subnet bindings
    fn list_share_networks_detail(
        &self,
    ) -> impl Future<Output = Result<Vec<ShareNetwork>, ApiError>> + Send;

    /// Create a security service
    fn create_security_service(
        &self,
        kind: SecurityServiceKind,
        params: &SecurityServiceParams,
    ) -> impl Future<Output = Result<SecurityService, ApiError>> + Send;

    /// Fetch a security service by id
    fn get_security_service(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<SecurityService, ApiError>> + Send;

    /// Delete a security service
    fn delete_security_service(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Network service operations the harness depends on
pub trait NetworkApi: Send + Sync {
    /// List the tenant's networks
    fn list_networks(&self) -> impl Future<Output = Result<Vec<Network>, ApiError>> + Send;
}

impl Network {
    /// Whether this network can back a share-network: active (the status
    /// comparison is case-insensitive), not externally routed, and with at
    /// least one subnet to bind
    pub fn is_usable(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
            && !self.router_external
            && !self.subnet_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network(status: &str, external: bool, subnets: &[&str]) -> Network {
        Network {
            id: "net-1".to_string(),
            name: None,
            status: status.to_string(),
            router_external: external,
            subnet_ids: subnets.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[test]
    fn usable_network_requirements() {
        assert!(network("ACTIVE", false, &["subnet-1"]).is_usable());
        assert!(network("active", false, &["subnet-1"]).is_usable());
        assert!(!network("DOWN", false, &["subnet-1"]).is_usable());
        assert!(!network("ACTIVE", true, &["subnet-1"]).is_usable());
        assert!(!network("ACTIVE", false, &[]).is_usable());
    }

    #[test]
    fn share_params_default_to_one_gib() {
        let params = CreateShareParams::default();
        assert_eq!(params.size_gib, 1);
        assert!(params.protocol.is_none());
        assert!(params.share_network_id.is_none());
    }

    #[test]
    fn security_service_kind_wire_format() {
        assert_eq!(SecurityServiceKind::ActiveDirectory.to_string(), "active_directory");
        assert_eq!(
            "ldap".parse::<SecurityServiceKind>().unwrap(),
            SecurityServiceKind::Ldap
        );
    }

    #[test]
    fn share_body_roundtrip_keeps_id() {
        let share = Share {
            id: "share-1".to_string(),
            name: Some("s".to_string()),
            status: ResourceStatus::Creating,
            protocol: Some("nfs".to_string()),
            size_gib: 1,
            snapshot_id: None,
            share_network_id: None,
            metadata: BTreeMap::new(),
        };
        let body = serde_json::to_value(&share).unwrap();
        assert_eq!(body["id"], "share-1");
        let back: Share = serde_json::from_value(body).unwrap();
        assert_eq!(back, share);
    }
}
