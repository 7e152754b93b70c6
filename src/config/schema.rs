//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the tracker.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Default log store capacity: the most recent 1000 requests are retained.
pub const DEFAULT_MAX_ENTRIES: usize = 1000;

/// Root configuration for the tracker service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TrackerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Address classification settings.
    pub classifier: ClassifierConfig,

    /// Request log persistence settings.
    pub store: StoreConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000"). The PORT environment variable
    /// or the --port flag override the port part.
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Address classification configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Expected NAT egress addresses, matched by exact string equality.
    /// Order is preserved in the stats comparison report.
    pub expected_ips: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            // Infor MT AWS (EU-Central-1 Frankfurt) NAT egress addresses.
            expected_ips: vec![
                "52.58.37.0".to_string(),
                "52.29.28.67".to_string(),
                "18.197.50.73".to_string(),
            ],
        }
    }
}

/// Request log persistence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the JSON log file.
    pub log_file: String,

    /// Maximum retained entries; the oldest are evicted first.
    pub max_entries: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            log_file: "request_logs.json".to_string(),
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
