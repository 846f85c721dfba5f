/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared fixtures for transfer integration tests
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for ati-transfer tests

#![allow(dead_code)]

use std::sync::Arc;

use ati_adapter::{AtiClient, Credentials};
use ati_transfer::{AnnotationForms, DatasetService};
use wiremock::MockServer;

pub const DATASET_ID: &str = "ds-7";
pub const MANUSCRIPT_NAME: &str = "field-notes.pdf";

pub const DOWNLOAD_PATH: &str = "/api/hypothesis/ds-7/download-annotations";
pub const EXPORT_PATH: &str = "/api/hypothesis/ds-7/export-annotations";
pub const DELETE_PATH: &str = "/api/hypothesis/ds-7/delete-annotations";

pub fn dataset_service(server: &MockServer) -> Arc<DatasetService> {
    let client = AtiClient::new(&server.uri()).expect("mock server uri should parse");
    Arc::new(DatasetService::new(client, DATASET_ID))
}

pub fn forms_for(server: &MockServer) -> AnnotationForms<DatasetService> {
    AnnotationForms::new(
        dataset_service(server),
        Credentials::new("session-token"),
        MANUSCRIPT_NAME,
    )
}

/// Download response body with `count` annotations
pub fn annotations_body(count: usize) -> serde_json::Value {
    let annotations: Vec<serde_json::Value> = (0..count)
        .map(|i| serde_json::json!({ "id": format!("ann-{i}"), "group": "g1" }))
        .collect();
    serde_json::json!({ "annotations": annotations })
}
