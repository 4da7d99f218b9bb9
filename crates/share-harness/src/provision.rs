//! Share-network provisioning for multi-tenant deployments
//!
//! Multi-tenant drivers need a share-network binding the service to a
//! tenant network/subnet before any share can be created. This module finds
//! or creates one.

use share_harness_common::HarnessConfig;
use share_harness_common::naming::{AUTO_SHARE_NETWORK_DESCRIPTION, AUTO_SHARE_NETWORK_NAME};
use tracing::{debug, info};

use crate::api::{NetworkApi, ShareNetworkParams, SharesApi};
use crate::error::HarnessError;

/// Find or create a share-network for the calling tenant.
///
/// Returns `Ok(None)` in single-tenant mode regardless of other state, and
/// the preset id unchanged when the tenant already has one configured.
/// Otherwise picks the first active, non-external network with a subnet,
/// reuses a share-network already bound to that net/subnet pair, or creates
/// one.
///
/// This is lookup-or-create idempotency, not a concurrency-safe
/// reservation: two callers racing through it can create duplicate
/// share-networks for the same pair.
///
/// # Errors
///
/// [`HarnessError::NoAvailableNetwork`] when no usable network exists.
pub async fn provide_share_network<S, N>(
    shares: &S,
    network: &N,
    config: &HarnessConfig,
    preset: Option<&str>,
) -> Result<Option<String>, HarnessError>
where
    S: SharesApi,
    N: NetworkApi,
{
    if !config.share.multitenancy_enabled {
        // Single-tenant driver; shares never need a share-network
        return Ok(None);
    }

    if let Some(id) = preset {
        debug!(share_network_id = %id, "Using preconfigured share-network");
        return Ok(Some(id.to_string()));
    }

    // Pick a suitable tenant network
    let networks = network.list_networks().await?;
    let candidate = networks
        .iter()
        .find(|n| n.is_usable())
        .ok_or(HarnessError::NoAvailableNetwork)?;
    let net_id = candidate.id.clone();
    let subnet_id = candidate.subnet_ids[0].clone();
    debug!(net_id = %net_id, subnet_id = %subnet_id, "Selected tenant network");

    // Reuse a share-network already bound to that pair
    let share_networks = shares.list_share_networks_detail().await?;
    if let Some(existing) = share_networks.iter().find(|sn| {
        sn.network_id.as_deref() == Some(net_id.as_str())
            && sn.subnet_id.as_deref() == Some(subnet_id.as_str())
    }) {
        info!(share_network_id = %existing.id, "Reusing existing share-network");
        return Ok(Some(existing.id.clone()));
    }

    // None bound yet; create one
    let params = ShareNetworkParams {
        name: Some(AUTO_SHARE_NETWORK_NAME.to_string()),
        description: Some(AUTO_SHARE_NETWORK_DESCRIPTION.to_string()),
        network_id: Some(net_id.clone()),
        subnet_id: Some(subnet_id.clone()),
    };
    let created = shares.create_share_network(&params).await?;
    info!(
        share_network_id = %created.id,
        net_id = %net_id,
        subnet_id = %subnet_id,
        "Created share-network"
    );
    Ok(Some(created.id))
}
