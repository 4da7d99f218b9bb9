//! Per-tenant test harness: setup gates, resource creation, teardown
//!
//! A [`ShareHarness`] is what a test suite holds for its lifetime. Setup
//! resolves credentials, checks that the share service is usable at all
//! (skipping rather than failing when it is not), and provisions a
//! share-network in multi-tenant mode. Every resource created through the
//! harness is tracked and torn down in reverse creation order.

use serde_json::to_value;
use share_harness_common::defaults::{DEFAULT_SHARE_DESCRIPTION, DEFAULT_SNAPSHOT_DESCRIPTION};
use share_harness_common::{Credentials, HarnessConfig, ResourceKind, ResourceStatus, Tenant};
use tracing::{debug, info};

use crate::api::{
    CreateShareParams, NetworkApi, SecurityService, SecurityServiceKind, SecurityServiceParams,
    Share, ShareNetwork, ShareNetworkParams, SharesApi, Snapshot, SnapshotParams,
};
use crate::error::{HarnessError, SkipReason};
use crate::provision::provide_share_network;
use crate::tracker::{CleanupOutcome, ResourceTracker};
use crate::wait::{self, WaitConfig};

/// Builder for a [`ShareHarness`]
pub struct HarnessBuilder<S, N> {
    config: HarnessConfig,
    tenant: Tenant,
    shares: S,
    network: N,
    protocols: Vec<String>,
    wait: WaitConfig,
}

impl<S, N> HarnessBuilder<S, N>
where
    S: SharesApi,
    N: NetworkApi,
{
    /// Start building a harness for the primary tenant
    pub fn new(config: HarnessConfig, shares: S, network: N) -> Self {
        let protocols = share_harness_common::defaults::SUPPORTED_PROTOCOLS
            .iter()
            .map(|p| (*p).to_string())
            .collect();
        Self {
            config,
            tenant: Tenant::Primary,
            shares,
            network,
            protocols,
            wait: WaitConfig::default(),
        }
    }

    /// Act as the given tenant
    pub fn tenant(mut self, tenant: Tenant) -> Self {
        self.tenant = tenant;
        self
    }

    /// Restrict the suite to specific protocols (defaults to all supported)
    pub fn protocols<I, P>(mut self, protocols: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.protocols = protocols.into_iter().map(Into::into).collect();
        self
    }

    /// Override the status/deletion wait configuration
    pub fn wait_config(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    /// Run the setup gates and produce a ready harness.
    ///
    /// # Errors
    ///
    /// [`HarnessError::Skip`] when the suite should be skipped: none of its
    /// protocols are enabled, the tenant's credentials are incomplete, or
    /// multi-tenant mode lacks a network service. Other errors are real
    /// setup failures.
    pub async fn setup(self) -> Result<ShareHarness<S, N>, HarnessError> {
        let Self {
            config,
            tenant,
            shares,
            network,
            protocols,
            wait,
        } = self;

        let enabled = &config.share.enable_protocols;
        if !protocols
            .iter()
            .any(|p| enabled.iter().any(|e| e.eq_ignore_ascii_case(p)))
        {
            return Err(HarnessError::skip(SkipReason::ProtocolsDisabled));
        }

        let credentials = config
            .identity
            .for_tenant(tenant)
            .resolve()
            .ok_or(HarnessError::skip(SkipReason::MissingCredentials { tenant }))?;
        debug!(tenant = %tenant, username = %credentials.username, "Resolved credentials");

        let share_network_id = if config.share.multitenancy_enabled {
            if !config.service_available.network {
                return Err(HarnessError::skip(SkipReason::NetworkServiceUnavailable));
            }
            let preset = config.share.preset_share_network_id(tenant);
            provide_share_network(&shares, &network, &config, preset).await?
        } else {
            None
        };

        info!(
            tenant = %tenant,
            share_network_id = ?share_network_id,
            "Harness ready"
        );

        Ok(ShareHarness {
            tenant,
            credentials,
            shares,
            network,
            share_network_id,
            tracker: ResourceTracker::new(),
            wait,
            config,
        })
    }
}

/// A ready-to-use harness bound to one tenant
#[derive(Debug)]
pub struct ShareHarness<S, N> {
    tenant: Tenant,
    credentials: Credentials,
    shares: S,
    network: N,
    share_network_id: Option<String>,
    tracker: ResourceTracker,
    wait: WaitConfig,
    config: HarnessConfig,
}

impl<S, N> ShareHarness<S, N>
where
    S: SharesApi,
    N: NetworkApi,
{
    /// Create a share, track it, and wait until it is available.
    ///
    /// The share is recorded for cleanup before the wait, so a share that
    /// never becomes available is still torn down. Unset fields fall back
    /// to the harness defaults: description, and the harness's
    /// share-network in multi-tenant mode.
    pub async fn create_share(&self, params: CreateShareParams) -> Result<Share, HarnessError> {
        let mut params = params;
        if params.description.is_none() {
            params.description = Some(DEFAULT_SHARE_DESCRIPTION.to_string());
        }
        if params.share_network_id.is_none() {
            params.share_network_id = self.share_network_id.clone();
        }

        let share = self.shares.create_share(&params).await?;
        self.tracker.record(ResourceKind::Share, to_value(&share)?);
        wait::wait_for_share_status(
            &self.shares,
            &share.id,
            ResourceStatus::Available,
            &self.wait,
            None,
        )
        .await
    }

    /// Snapshot a share, track it, and wait until it is available.
    pub async fn create_snapshot(
        &self,
        share_id: &str,
        params: SnapshotParams,
    ) -> Result<Snapshot, HarnessError> {
        let mut params = params;
        if params.description.is_none() {
            params.description = Some(DEFAULT_SNAPSHOT_DESCRIPTION.to_string());
        }

        let snapshot = self.shares.create_snapshot(share_id, &params).await?;
        self.tracker
            .record(ResourceKind::Snapshot, to_value(&snapshot)?);
        wait::wait_for_snapshot_status(
            &self.shares,
            &snapshot.id,
            ResourceStatus::Available,
            &self.wait,
            None,
        )
        .await
    }

    /// Create a share-network and track it
    pub async fn create_share_network(
        &self,
        params: ShareNetworkParams,
    ) -> Result<ShareNetwork, HarnessError> {
        let share_network = self.shares.create_share_network(&params).await?;
        self.tracker
            .record(ResourceKind::ShareNetwork, to_value(&share_network)?);
        Ok(share_network)
    }

    /// Create a security service and track it
    pub async fn create_security_service(
        &self,
        kind: SecurityServiceKind,
        params: SecurityServiceParams,
    ) -> Result<SecurityService, HarnessError> {
        let service = self.shares.create_security_service(kind, &params).await?;
        self.tracker
            .record(ResourceKind::SecurityService, to_value(&service)?);
        Ok(service)
    }

    /// Delete every tracked resource in reverse creation order
    pub async fn teardown(&self) -> Result<CleanupOutcome, HarnessError> {
        info!(tenant = %self.tenant, tracked = self.tracker.len(), "Tearing down");
        self.tracker.cleanup(&self.shares, &self.wait).await
    }

    /// The tenant this harness acts as
    pub fn tenant(&self) -> Tenant {
        self.tenant
    }

    /// The resolved credentials for this tenant
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The share-network shares are created against, if any
    pub fn share_network_id(&self) -> Option<&str> {
        self.share_network_id.as_deref()
    }

    /// The resource tracker (for assertions and manual records)
    pub fn tracker(&self) -> &ResourceTracker {
        &self.tracker
    }

    /// The shares client
    pub fn shares(&self) -> &S {
        &self.shares
    }

    /// The network client
    pub fn network(&self) -> &N {
        &self.network
    }

    /// The configuration this harness was built with
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }
}
