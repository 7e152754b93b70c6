//! Metrics collection and exposition.
//!
//! # Metrics
//! - `tracker_requests_total` (counter): logged requests by method
//! - `tracker_expected_total` (counter): requests from expected addresses
//! - `tracker_unexpected_total` (counter): requests from other addresses
//! - `tracker_store_recoveries_total` (counter): log-file reads recovered
//!   as empty history (missing file excluded)
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Prometheus exposition on a separate listener, enabled via config

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
///
/// Failure to install is logged and otherwise ignored; the tracker keeps
/// serving without metrics exposition.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(error) => tracing::error!(%error, "Failed to install metrics exporter"),
    }
}

/// Record one logged webhook request and its classification verdict.
pub fn record_logged_request(method: &str, is_expected: bool) {
    counter!("tracker_requests_total", "method" => method.to_string()).increment(1);
    if is_expected {
        counter!("tracker_expected_total").increment(1);
    } else {
        counter!("tracker_unexpected_total").increment(1);
    }
}

/// Record a log-file read that was recovered as empty history.
pub fn record_store_recovery() {
    counter!("tracker_store_recoveries_total").increment(1);
}
