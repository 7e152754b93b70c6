//! IP Source Tracker binary.
//!
//! Bootstraps the service: parses the CLI, loads and validates
//! configuration, initializes tracing and the optional metrics exporter,
//! binds the listener, and runs the HTTP server.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ip_tracker::config::loader::load_config;
use ip_tracker::HttpServer;

#[derive(Parser)]
#[command(name = "ip-tracker")]
#[command(about = "HTTP service that logs requests and verifies their source NAT IP", long_about = None)]
struct Cli {
    /// Path to a TOML config file; built-in defaults when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listener port override (takes precedence over the PORT env var).
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref(), cli.port)?;

    // Initialize tracing subscriber; env filter wins over the config level.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "ip_tracker={},tower_http=debug",
                    config.observability.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("ip-tracker v0.1.0 starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        log_file = %config.store.log_file,
        max_entries = config.store.max_entries,
        expected_nat_ips = ?config.classifier.expected_ips,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            ip_tracker::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    let server = HttpServer::new(config);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
