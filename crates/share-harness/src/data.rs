//! Test data generators
//!
//! Fully-populated parameter structs with unique names, for tests that
//! need a valid payload but do not care about the values.

use share_harness_common::naming::rand_name;

use crate::api::{SecurityServiceParams, ShareNetworkParams};

/// Share-network parameters with every field populated
pub fn generate_share_network_data() -> ShareNetworkParams {
    ShareNetworkParams {
        name: Some(rand_name("sn-name")),
        description: Some(rand_name("sn-desc")),
        network_id: Some(rand_name("net-id")),
        subnet_id: Some(rand_name("subnet-id")),
    }
}

/// Security service parameters with every field populated
pub fn generate_security_service_data() -> SecurityServiceParams {
    SecurityServiceParams {
        name: Some(rand_name("ss-name")),
        description: Some(rand_name("ss-desc")),
        dns_ip: Some(rand_name("ss-dns-ip")),
        server: Some(rand_name("ss-server")),
        domain: Some(rand_name("ss-domain")),
        sid: Some(rand_name("ss-sid")),
        password: Some(rand_name("ss-password")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_network_data_is_complete_and_unique() {
        let a = generate_share_network_data();
        let b = generate_share_network_data();
        assert!(a.name.is_some());
        assert!(a.network_id.is_some());
        assert!(a.subnet_id.is_some());
        assert_ne!(a.name, b.name);
    }

    #[test]
    fn security_service_data_is_complete() {
        let data = generate_security_service_data();
        assert!(data.name.unwrap().starts_with("ss-name-"));
        assert!(data.dns_ip.is_some());
        assert!(data.server.is_some());
        assert!(data.domain.is_some());
        assert!(data.sid.is_some());
        assert!(data.password.is_some());
    }
}
