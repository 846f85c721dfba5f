/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for ati-adapter tests

use ati_adapter::{AtiClient, Credentials};
use wiremock::MockServer;

pub const TEST_DATASET_ID: &str = "ds-42";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client pointed at the mock server
pub fn client_for(server: &MockServer) -> AtiClient {
    AtiClient::new(&server.uri()).expect("mock server uri should parse")
}

/// Session credential for testing
pub fn test_credentials() -> Credentials {
    Credentials::new("dv-test-token")
}

/// `count` annotation payloads with distinct ids
pub fn annotations_json(count: usize) -> serde_json::Value {
    let annotations: Vec<serde_json::Value> = (0..count)
        .map(|i| serde_json::json!({ "id": format!("ann-{i}"), "text": format!("note {i}") }))
        .collect();
    serde_json::json!({ "annotations": annotations })
}
