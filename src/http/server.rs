//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, request timeout)
//! - Capture the transport peer address for the classifier fallback
//! - Bind server to listener and serve until shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::classifier::ExpectedIps;
use crate::config::TrackerConfig;
use crate::http::handlers;
use crate::store::LogStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<LogStore>,
    pub expected: Arc<ExpectedIps>,
}

/// HTTP server for the tracker.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: TrackerConfig) -> Self {
        let state = AppState {
            store: Arc::new(LogStore::new(
                &config.store.log_file,
                config.store.max_entries,
            )),
            expected: Arc::new(ExpectedIps::new(config.classifier.expected_ips.clone())),
        };

        let router = build_router(&config, state);
        Self { router }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all routes and middleware layers.
///
/// Standalone so tests can drive the router without binding a socket.
pub fn build_router(config: &TrackerConfig, state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/webhook",
            get(handlers::webhook)
                .post(handlers::webhook)
                .put(handlers::webhook)
                .delete(handlers::webhook)
                .patch(handlers::webhook),
        )
        .route("/logs", get(handlers::logs))
        .route("/stats", get(handlers::stats))
        .route("/debug/headers", get(handlers::debug_headers))
        .with_state(state)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.timeouts.request_secs,
        )))
        .layer(TraceLayer::new_for_http())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
