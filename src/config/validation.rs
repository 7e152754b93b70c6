//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (capacity > 0, addresses parseable)
//! - Reject empty or blank expected-address lists
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: TrackerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::TrackerConfig;

/// A single semantic configuration problem.
#[derive(Debug, PartialEq)]
pub enum ValidationError {
    InvalidBindAddress(String),
    NoExpectedIps,
    BlankExpectedIp(usize),
    ZeroMaxEntries,
    EmptyLogFile,
    ZeroRequestTimeout,
    InvalidMetricsAddress(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidBindAddress(addr) => {
                write!(f, "listener.bind_address '{}' is not a valid socket address", addr)
            }
            ValidationError::NoExpectedIps => {
                write!(f, "classifier.expected_ips must contain at least one address")
            }
            ValidationError::BlankExpectedIp(index) => {
                write!(f, "classifier.expected_ips[{}] is blank", index)
            }
            ValidationError::ZeroMaxEntries => {
                write!(f, "store.max_entries must be greater than zero")
            }
            ValidationError::EmptyLogFile => write!(f, "store.log_file must not be empty"),
            ValidationError::ZeroRequestTimeout => {
                write!(f, "timeouts.request_secs must be greater than zero")
            }
            ValidationError::InvalidMetricsAddress(addr) => {
                write!(f, "observability.metrics_address '{}' is not a valid socket address", addr)
            }
        }
    }
}

/// Validate the configuration, collecting every error.
pub fn validate_config(config: &TrackerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.classifier.expected_ips.is_empty() {
        errors.push(ValidationError::NoExpectedIps);
    }
    for (index, ip) in config.classifier.expected_ips.iter().enumerate() {
        if ip.trim().is_empty() {
            errors.push(ValidationError::BlankExpectedIp(index));
        }
    }

    if config.store.max_entries == 0 {
        errors.push(ValidationError::ZeroMaxEntries);
    }
    if config.store.log_file.trim().is_empty() {
        errors.push(ValidationError::EmptyLogFile);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
