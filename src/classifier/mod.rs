//! Client address resolution and expected-list membership.
//!
//! # Responsibilities
//! - Resolve the real client address from proxy forwarding headers
//! - Fall back to the transport-layer peer address
//! - Test membership against the configured expected NAT addresses
//! - Snapshot the raw candidate headers for misdetection diagnostics
//!
//! # Design Decisions
//! - X-Forwarded-For wins; its first non-empty segment is the client-closest hop
//! - Exact string equality for membership (known egress set, no CIDR matching)
//! - Pure functions of header/peer input: no I/O, no shared state

use std::net::SocketAddr;

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};

/// Proxy headers consulted when resolving the client address, precedence order.
pub const CANDIDATE_HEADERS: [&str; 4] = [
    "x-forwarded-for",
    "x-real-ip",
    "cf-connecting-ip",
    "true-client-ip",
];

/// Resolve the client address the request is believed to originate from.
///
/// The first candidate header carrying a non-empty value wins; when none is
/// present the transport-layer peer address is used, which may itself be a
/// proxy's address.
pub fn resolve_client_ip(headers: &HeaderMap, peer_addr: SocketAddr) -> String {
    if let Some(forwarded) = header_value(headers, CANDIDATE_HEADERS[0]) {
        // Forwarding chain: client-closest hop is the first segment.
        if let Some(first) = forwarded.split(',').map(str::trim).find(|s| !s.is_empty()) {
            return first.to_string();
        }
    }

    for &name in &CANDIDATE_HEADERS[1..] {
        if let Some(value) = header_value(headers, name) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return trimmed.to_string();
            }
        }
    }

    peer_addr.ip().to_string()
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
}

/// Raw values of every candidate header plus the transport peer address,
/// captured verbatim for each record so misdetections can be diagnosed later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugHeaders {
    #[serde(rename = "X-Forwarded-For")]
    pub x_forwarded_for: Option<String>,
    #[serde(rename = "X-Real-IP")]
    pub x_real_ip: Option<String>,
    #[serde(rename = "CF-Connecting-IP")]
    pub cf_connecting_ip: Option<String>,
    #[serde(rename = "True-Client-IP")]
    pub true_client_ip: Option<String>,
    pub remote_addr: String,
}

/// Capture the raw candidate header values for a request.
pub fn debug_header_snapshot(headers: &HeaderMap, peer_addr: SocketAddr) -> DebugHeaders {
    DebugHeaders {
        x_forwarded_for: header_value(headers, "x-forwarded-for"),
        x_real_ip: header_value(headers, "x-real-ip"),
        cf_connecting_ip: header_value(headers, "cf-connecting-ip"),
        true_client_ip: header_value(headers, "true-client-ip"),
        remote_addr: peer_addr.to_string(),
    }
}

/// The configured allow list of expected NAT egress addresses.
///
/// Order-preserving: the stats comparison report iterates in configured order.
#[derive(Debug, Clone)]
pub struct ExpectedIps {
    ips: Vec<String>,
}

impl ExpectedIps {
    pub fn new(ips: Vec<String>) -> Self {
        Self { ips }
    }

    /// Exact string match against the configured list.
    pub fn contains(&self, ip: &str) -> bool {
        self.ips.iter().any(|expected| expected == ip)
    }

    /// Expected addresses in configured order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ips.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.ips
    }
}
