//! Configuration loading from disk and the environment.

use std::net::SocketAddr;
use std::path::Path;
use std::fs;

use crate::config::schema::TrackerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate the configuration.
///
/// When `path` is `None` the built-in defaults are used. A port override
/// (from the `--port` flag or the `PORT` environment variable, in that
/// order) replaces the port part of the listener bind address.
pub fn load_config(path: Option<&Path>, port_override: Option<u16>) -> Result<TrackerConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => TrackerConfig::default(),
    };

    if let Some(port) = port_override.or_else(port_from_env) {
        apply_port(&mut config, port);
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Read the PORT environment variable, ignoring unparseable values.
pub fn port_from_env() -> Option<u16> {
    let raw = std::env::var("PORT").ok()?;
    match raw.parse() {
        Ok(port) => Some(port),
        Err(_) => {
            tracing::warn!(value = %raw, "Ignoring unparseable PORT environment variable");
            None
        }
    }
}

fn apply_port(config: &mut TrackerConfig, port: u16) {
    // An unparseable bind address is left untouched here; validation
    // reports it with the rest of the semantic errors.
    if let Ok(mut addr) = config.listener.bind_address.parse::<SocketAddr>() {
        addr.set_port(port);
        config.listener.bind_address = addr.to_string();
    }
}
