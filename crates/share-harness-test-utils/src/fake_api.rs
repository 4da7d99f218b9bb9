//! In-memory share service for harness tests
//!
//! Implements the harness's API traits over plain maps, with just enough
//! lifecycle behavior to exercise the interesting paths: resources start
//! `creating` and settle after a configurable number of GET polls, deletes
//! can be made to fail once, and creations can be forced into `error`.
//!
//! Handles are cheap clones sharing one state, so a test can keep one for
//! assertions after handing another to a harness.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use share_harness::api::{
    CreateShareParams, Network, NetworkApi, SecurityService, SecurityServiceKind,
    SecurityServiceParams, Share, ShareNetwork, ShareNetworkParams, SharesApi, Snapshot,
    SnapshotParams,
};
use share_harness::error::ApiError;
use share_harness_common::{ResourceKind, ResourceStatus};

/// Build a network record for seeding
pub fn fake_network(id: &str, status: &str, external: bool, subnet_ids: &[&str]) -> Network {
    Network {
        id: id.to_string(),
        name: Some(format!("net-{id}")),
        status: status.to_string(),
        router_external: external,
        subnet_ids: subnet_ids.iter().map(|s| (*s).to_string()).collect(),
    }
}

/// A resource that settles into its final status after some GET polls
#[derive(Debug, Clone)]
struct Settling<T> {
    resource: T,
    polls_left: u32,
    settle_to: ResourceStatus,
}

#[derive(Debug, Default)]
struct State {
    shares: HashMap<String, Settling<Share>>,
    snapshots: HashMap<String, Settling<Snapshot>>,
    share_networks: HashMap<String, ShareNetwork>,
    security_services: HashMap<String, SecurityService>,
    networks: Vec<Network>,
    next_id: u64,
    polls_until_available: u32,
    create_in_error: bool,
    fail_next_delete: Option<ApiError>,
    deletions: Vec<(ResourceKind, String)>,
}

/// In-memory fake implementing [`SharesApi`] and [`NetworkApi`]
#[derive(Debug, Clone)]
pub struct FakeShareService {
    inner: Arc<Mutex<State>>,
}

impl Default for FakeShareService {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeShareService {
    /// Create an empty fake; seed networks before using multi-tenant paths
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(State {
                polls_until_available: 1,
                ..State::default()
            })),
        }
    }

    /// Create a fake pre-seeded with one active internal network
    pub fn with_usable_network() -> Self {
        let fake = Self::new();
        fake.seed_network(fake_network("net-1", "ACTIVE", false, &["subnet-1"]));
        fake
    }

    /// Add a network to what `list_networks` returns
    pub fn seed_network(&self, network: Network) {
        self.inner.lock().unwrap().networks.push(network);
    }

    /// Add a pre-existing share-network
    pub fn seed_share_network(&self, share_network: ShareNetwork) {
        let mut state = self.inner.lock().unwrap();
        state
            .share_networks
            .insert(share_network.id.clone(), share_network);
    }

    /// How many GET polls a new resource stays `creating` (default 1)
    pub fn set_polls_until_available(&self, polls: u32) {
        self.inner.lock().unwrap().polls_until_available = polls;
    }

    /// Make subsequently created shares/snapshots settle into `error`
    pub fn create_in_error(&self, enabled: bool) {
        self.inner.lock().unwrap().create_in_error = enabled;
    }

    /// Make the next delete call fail with the given error
    pub fn fail_next_delete(&self, error: ApiError) {
        self.inner.lock().unwrap().fail_next_delete = Some(error);
    }

    /// Deletions performed so far, in order
    pub fn deletions(&self) -> Vec<(ResourceKind, String)> {
        self.inner.lock().unwrap().deletions.clone()
    }

    /// Whether a resource of the given kind still exists
    pub fn contains(&self, kind: ResourceKind, id: &str) -> bool {
        let state = self.inner.lock().unwrap();
        match kind {
            ResourceKind::Share => state.shares.contains_key(id),
            ResourceKind::Snapshot => state.snapshots.contains_key(id),
            ResourceKind::ShareNetwork => state.share_networks.contains_key(id),
            ResourceKind::SecurityService => state.security_services.contains_key(id),
        }
    }

    /// Number of share-networks currently stored
    pub fn share_network_count(&self) -> usize {
        self.inner.lock().unwrap().share_networks.len()
    }

    fn next_id(state: &mut State, prefix: &str) -> String {
        state.next_id += 1;
        format!("{prefix}-{}", state.next_id)
    }

    fn take_delete_failure(state: &mut State) -> Option<ApiError> {
        state.fail_next_delete.take()
    }
}

/// Advance a settling resource by one poll, returning its visible status
fn poll<T>(entry: &mut Settling<T>) -> ResourceStatus {
    if entry.polls_left > 0 {
        entry.polls_left -= 1;
        ResourceStatus::Creating
    } else {
        entry.settle_to
    }
}

impl SharesApi for FakeShareService {
    async fn create_share(&self, params: &CreateShareParams) -> Result<Share, ApiError> {
        let mut state = self.inner.lock().unwrap();
        let id = Self::next_id(&mut state, "share");
        let share = Share {
            id: id.clone(),
            name: params.name.clone(),
            status: ResourceStatus::Creating,
            protocol: Some(params.protocol.clone().unwrap_or_else(|| "nfs".to_string())),
            size_gib: params.size_gib,
            snapshot_id: params.snapshot_id.clone(),
            share_network_id: params.share_network_id.clone(),
            metadata: params.metadata.clone(),
        };
        let settle_to = if state.create_in_error {
            ResourceStatus::Error
        } else {
            ResourceStatus::Available
        };
        let entry = Settling {
            resource: share.clone(),
            polls_left: state.polls_until_available,
            settle_to,
        };
        state.shares.insert(id, entry);
        Ok(share)
    }

    async fn get_share(&self, id: &str) -> Result<Share, ApiError> {
        let mut state = self.inner.lock().unwrap();
        let entry = state
            .shares
            .get_mut(id)
            .ok_or_else(|| ApiError::NotFound {
                resource: "share",
                id: id.to_string(),
            })?;
        let status = poll(entry);
        let mut share = entry.resource.clone();
        share.status = status;
        Ok(share)
    }

    async fn delete_share(&self, id: &str) -> Result<(), ApiError> {
        let mut state = self.inner.lock().unwrap();
        if let Some(err) = Self::take_delete_failure(&mut state) {
            return Err(err);
        }
        if state.shares.remove(id).is_none() {
            return Err(ApiError::NotFound {
                resource: "share",
                id: id.to_string(),
            });
        }
        state.deletions.push((ResourceKind::Share, id.to_string()));
        Ok(())
    }

    async fn create_snapshot(
        &self,
        share_id: &str,
        params: &SnapshotParams,
    ) -> Result<Snapshot, ApiError> {
        let mut state = self.inner.lock().unwrap();
        if !state.shares.contains_key(share_id) {
            return Err(ApiError::NotFound {
                resource: "share",
                id: share_id.to_string(),
            });
        }
        let id = Self::next_id(&mut state, "snapshot");
        let snapshot = Snapshot {
            id: id.clone(),
            share_id: share_id.to_string(),
            name: params.name.clone(),
            status: ResourceStatus::Creating,
        };
        let settle_to = if state.create_in_error {
            ResourceStatus::Error
        } else {
            ResourceStatus::Available
        };
        let entry = Settling {
            resource: snapshot.clone(),
            polls_left: state.polls_until_available,
            settle_to,
        };
        state.snapshots.insert(id, entry);
        Ok(snapshot)
    }

    async fn get_snapshot(&self, id: &str) -> Result<Snapshot, ApiError> {
        let mut state = self.inner.lock().unwrap();
        let entry = state
            .snapshots
            .get_mut(id)
            .ok_or_else(|| ApiError::NotFound {
                resource: "snapshot",
                id: id.to_string(),
            })?;
        let status = poll(entry);
        let mut snapshot = entry.resource.clone();
        snapshot.status = status;
        Ok(snapshot)
    }

    async fn delete_snapshot(&self, id: &str) -> Result<(), ApiError> {
        let mut state = self.inner.lock().unwrap();
        if let Some(err) = Self::take_delete_failure(&mut state) {
            return Err(err);
        }
        if state.snapshots.remove(id).is_none() {
            return Err(ApiError::NotFound {
                resource: "snapshot",
                id: id.to_string(),
            });
        }
        state
            .deletions
            .push((ResourceKind::Snapshot, id.to_string()));
        Ok(())
    }

    async fn create_share_network(
        &self,
        params: &ShareNetworkParams,
    ) -> Result<ShareNetwork, ApiError> {
        let mut state = self.inner.lock().unwrap();
        let id = Self::next_id(&mut state, "sn");
        let share_network = ShareNetwork {
            id: id.clone(),
            name: params.name.clone(),
            description: params.description.clone(),
            network_id: params.network_id.clone(),
            subnet_id: params.subnet_id.clone(),
        };
        state.share_networks.insert(id, share_network.clone());
        Ok(share_network)
    }

    async fn get_share_network(&self, id: &str) -> Result<ShareNetwork, ApiError> {
        let state = self.inner.lock().unwrap();
        state
            .share_networks
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                resource: "share_network",
                id: id.to_string(),
            })
    }

    async fn delete_share_network(&self, id: &str) -> Result<(), ApiError> {
        let mut state = self.inner.lock().unwrap();
        if let Some(err) = Self::take_delete_failure(&mut state) {
            return Err(err);
        }
        if state.share_networks.remove(id).is_none() {
            return Err(ApiError::NotFound {
                resource: "share_network",
                id: id.to_string(),
            });
        }
        state
            .deletions
            .push((ResourceKind::ShareNetwork, id.to_string()));
        Ok(())
    }

    async fn list_share_networks_detail(&self) -> Result<Vec<ShareNetwork>, ApiError> {
        let state = self.inner.lock().unwrap();
        let mut share_networks: Vec<_> = state.share_networks.values().cloned().collect();
        share_networks.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(share_networks)
    }

    async fn create_security_service(
        &self,
        kind: SecurityServiceKind,
        params: &SecurityServiceParams,
    ) -> Result<SecurityService, ApiError> {
        let mut state = self.inner.lock().unwrap();
        let id = Self::next_id(&mut state, "ss");
        let service = SecurityService {
            id: id.clone(),
            kind,
            name: params.name.clone(),
        };
        state.security_services.insert(id, service.clone());
        Ok(service)
    }

    async fn get_security_service(&self, id: &str) -> Result<SecurityService, ApiError> {
        let state = self.inner.lock().unwrap();
        state
            .security_services
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                resource: "security_service",
                id: id.to_string(),
            })
    }

    async fn delete_security_service(&self, id: &str) -> Result<(), ApiError> {
        let mut state = self.inner.lock().unwrap();
        if let Some(err) = Self::take_delete_failure(&mut state) {
            return Err(err);
        }
        if state.security_services.remove(id).is_none() {
            return Err(ApiError::NotFound {
                resource: "security_service",
                id: id.to_string(),
            });
        }
        state
            .deletions
            .push((ResourceKind::SecurityService, id.to_string()));
        Ok(())
    }
}

impl NetworkApi for FakeShareService {
    async fn list_networks(&self) -> Result<Vec<Network>, ApiError> {
        Ok(self.inner.lock().unwrap().networks.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shares_settle_after_configured_polls() {
        let fake = FakeShareService::new();
        fake.set_polls_until_available(2);

        let share = fake
            .create_share(&CreateShareParams::default())
            .await
            .unwrap();
        assert_eq!(share.status, ResourceStatus::Creating);

        assert_eq!(
            fake.get_share(&share.id).await.unwrap().status,
            ResourceStatus::Creating
        );
        assert_eq!(
            fake.get_share(&share.id).await.unwrap().status,
            ResourceStatus::Creating
        );
        assert_eq!(
            fake.get_share(&share.id).await.unwrap().status,
            ResourceStatus::Available
        );
    }

    #[tokio::test]
    async fn error_mode_settles_into_error() {
        let fake = FakeShareService::new();
        fake.create_in_error(true);

        let share = fake
            .create_share(&CreateShareParams::default())
            .await
            .unwrap();
        let _ = fake.get_share(&share.id).await.unwrap();
        assert_eq!(
            fake.get_share(&share.id).await.unwrap().status,
            ResourceStatus::Error
        );
    }

    #[tokio::test]
    async fn delete_records_order_and_missing_is_not_found() {
        let fake = FakeShareService::new();
        let share = fake
            .create_share(&CreateShareParams::default())
            .await
            .unwrap();

        fake.delete_share(&share.id).await.unwrap();
        assert_eq!(
            fake.deletions(),
            vec![(ResourceKind::Share, share.id.clone())]
        );

        let err = fake.delete_share(&share.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn fail_next_delete_fires_once() {
        let fake = FakeShareService::new();
        let share = fake
            .create_share(&CreateShareParams::default())
            .await
            .unwrap();

        fake.fail_next_delete(ApiError::Conflict);
        assert!(matches!(
            fake.delete_share(&share.id).await,
            Err(ApiError::Conflict)
        ));
        // The share survived the failed delete and the injection is spent
        fake.delete_share(&share.id).await.unwrap();
    }

    #[tokio::test]
    async fn snapshot_requires_parent_share() {
        let fake = FakeShareService::new();
        let err = fake
            .create_snapshot("share-999", &SnapshotParams::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn seeded_networks_are_listed() {
        let fake = FakeShareService::with_usable_network();
        fake.seed_network(fake_network("net-ext", "ACTIVE", true, &["subnet-x"]));

        let networks = fake.list_networks().await.unwrap();
        assert_eq!(networks.len(), 2);
        assert!(networks[0].is_usable());
        assert!(!networks[1].is_usable());
    }
}
