//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use ip_tracker::classifier::ExpectedIps;
use ip_tracker::config::TrackerConfig;
use ip_tracker::http::{build_router, AppState};
use ip_tracker::store::LogStore;

/// Peer address every test request appears to come from.
pub const TEST_PEER: ([u8; 4], u16) = ([10, 0, 0, 5], 44312);

pub const EXPECTED_IPS: [&str; 3] = ["52.58.37.0", "52.29.28.67", "18.197.50.73"];

/// Unique log file path per test so tests never share state.
pub fn temp_log_path() -> PathBuf {
    std::env::temp_dir().join(format!("ip-tracker-it-{}.json", uuid::Uuid::new_v4()))
}

/// Build the router under test, backed by the given log file, with a mocked
/// transport peer address.
pub fn app(log_file: &Path) -> Router {
    let mut config = TrackerConfig::default();
    config.store.log_file = log_file.display().to_string();

    let state = AppState {
        store: Arc::new(LogStore::new(log_file, config.store.max_entries)),
        expected: Arc::new(ExpectedIps::new(
            EXPECTED_IPS.iter().map(|s| s.to_string()).collect(),
        )),
    };

    build_router(&config, state).layer(MockConnectInfo(SocketAddr::from(TEST_PEER)))
}

/// Send a request through the router and decode the JSON response body.
pub async fn request_json(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap();
    (status, value)
}

/// GET a path and decode the JSON response body.
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    request_json(app, request).await
}

/// Remove the test log file, tolerating its absence.
pub async fn cleanup(log_file: &Path) {
    let _ = tokio::fs::remove_file(log_file).await;
}
