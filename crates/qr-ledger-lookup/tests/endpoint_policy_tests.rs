//! Integration tests for node endpoint policy.

use std::sync::Arc;
use std::time::Duration;

use qr_ledger_lookup::{
    DEFAULT_RPC_ENDPOINT, HttpRpcTransport, LookupClient, LookupError, validate_rpc_endpoint,
};

#[test]
fn endpoint_policy_tests_accept_default_public_node() {
    validate_rpc_endpoint(DEFAULT_RPC_ENDPOINT).expect("default endpoint should pass");
}

#[test]
fn endpoint_policy_tests_client_refuses_invalid_endpoint() {
    let transport =
        Arc::new(HttpRpcTransport::new(Duration::from_secs(1)).expect("transport should build"));
    assert!(matches!(
        LookupClient::new("file:///etc/hosts", transport),
        Err(LookupError::InvalidEndpoint(_))
    ));
}
