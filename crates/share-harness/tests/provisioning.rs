//! Share-network provisioning tests
//!
//! Exercises the lookup-or-create path against the in-memory fake service.

mod test_helpers;

use share_harness::api::{ShareNetworkParams, SharesApi};
use share_harness::error::HarnessError;
use share_harness::provision::provide_share_network;
use share_harness_test_utils::{FakeShareService, fake_network};
use test_helpers::{base_config, single_tenant_config};

#[tokio::test]
async fn multitenancy_disabled_returns_none_regardless_of_state() {
    let fake = FakeShareService::with_usable_network();
    let config = single_tenant_config();

    // Even a preset id is ignored in single-tenant mode
    let result = provide_share_network(&fake, &fake, &config, Some("sn-preset"))
        .await
        .unwrap();
    assert_eq!(result, None);
    assert_eq!(fake.share_network_count(), 0);
}

#[tokio::test]
async fn preset_id_is_returned_unchanged() {
    let fake = FakeShareService::new();
    let config = base_config();

    // No networks seeded: the preset short-circuits before any scan
    let result = provide_share_network(&fake, &fake, &config, Some("sn-preset"))
        .await
        .unwrap();
    assert_eq!(result.as_deref(), Some("sn-preset"));
}

#[tokio::test]
async fn no_networks_at_all_is_no_available_network() {
    let fake = FakeShareService::new();
    let config = base_config();

    let err = provide_share_network(&fake, &fake, &config, None)
        .await
        .unwrap_err();
    assert!(matches!(err, HarnessError::NoAvailableNetwork));
}

#[tokio::test]
async fn unusable_networks_are_no_available_network() {
    let fake = FakeShareService::new();
    fake.seed_network(fake_network("net-down", "DOWN", false, &["subnet-1"]));
    fake.seed_network(fake_network("net-ext", "ACTIVE", true, &["subnet-2"]));
    fake.seed_network(fake_network("net-bare", "ACTIVE", false, &[]));
    let config = base_config();

    let err = provide_share_network(&fake, &fake, &config, None)
        .await
        .unwrap_err();
    assert!(matches!(err, HarnessError::NoAvailableNetwork));
}

#[tokio::test]
async fn picks_first_usable_network_and_creates_share_network() {
    let fake = FakeShareService::new();
    fake.seed_network(fake_network("net-ext", "ACTIVE", true, &["subnet-x"]));
    fake.seed_network(fake_network("net-good", "active", false, &["subnet-a", "subnet-b"]));
    let config = base_config();

    let id = provide_share_network(&fake, &fake, &config, None)
        .await
        .unwrap()
        .expect("multi-tenant mode must yield an id");

    let share_networks = fake.list_share_networks_detail().await.unwrap();
    assert_eq!(share_networks.len(), 1);
    let created = &share_networks[0];
    assert_eq!(created.id, id);
    assert_eq!(created.network_id.as_deref(), Some("net-good"));
    // First subnet of the selected network
    assert_eq!(created.subnet_id.as_deref(), Some("subnet-a"));
}

#[tokio::test]
async fn reuses_share_network_bound_to_the_same_pair() {
    let fake = FakeShareService::with_usable_network();
    let existing = fake
        .create_share_network(&ShareNetworkParams {
            name: Some("preexisting".to_string()),
            description: None,
            network_id: Some("net-1".to_string()),
            subnet_id: Some("subnet-1".to_string()),
        })
        .await
        .unwrap();
    let config = base_config();

    let id = provide_share_network(&fake, &fake, &config, None)
        .await
        .unwrap();
    assert_eq!(id.as_deref(), Some(existing.id.as_str()));
    assert_eq!(fake.share_network_count(), 1);
}

#[tokio::test]
async fn share_network_on_a_different_pair_is_not_reused() {
    let fake = FakeShareService::with_usable_network();
    fake.create_share_network(&ShareNetworkParams {
        name: Some("other".to_string()),
        description: None,
        network_id: Some("net-1".to_string()),
        subnet_id: Some("subnet-other".to_string()),
    })
    .await
    .unwrap();
    let config = base_config();

    let id = provide_share_network(&fake, &fake, &config, None)
        .await
        .unwrap()
        .expect("id");
    assert_eq!(fake.share_network_count(), 2);

    let share_networks = fake.list_share_networks_detail().await.unwrap();
    let created = share_networks.iter().find(|sn| sn.id == id).unwrap();
    assert_eq!(created.subnet_id.as_deref(), Some("subnet-1"));
}

#[tokio::test]
async fn repeated_calls_reuse_the_created_share_network() {
    let fake = FakeShareService::with_usable_network();
    let config = base_config();

    let first = provide_share_network(&fake, &fake, &config, None)
        .await
        .unwrap();
    let second = provide_share_network(&fake, &fake, &config, None)
        .await
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(fake.share_network_count(), 1);
}
