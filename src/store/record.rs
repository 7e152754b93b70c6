//! Persisted request record types.
//!
//! Field names match the on-disk JSON the service has always written, so an
//! existing log file keeps loading across restarts.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::classifier::DebugHeaders;

/// Captured request body.
///
/// Untagged: absent serializes as `null`, raw text as a JSON string, and a
/// parsed body as the JSON value itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BodyPayload {
    Absent,
    Text(String),
    Json(serde_json::Value),
}

impl BodyPayload {
    pub fn is_absent(&self) -> bool {
        matches!(self, BodyPayload::Absent)
    }
}

/// One logged request. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestRecord {
    /// ISO-8601, naive local clock, set at record creation.
    pub timestamp: NaiveDateTime,
    pub ip_address: String,
    pub endpoint: String,
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub ip_debug_headers: DebugHeaders,
    pub data: BodyPayload,
    pub is_expected_ip: bool,
    pub matched_nat_ip: Option<String>,
}

impl RequestRecord {
    /// Build a record, stamping the current time and deriving
    /// `matched_nat_ip` from the verdict.
    ///
    /// Invariant: `matched_nat_ip` is `Some` iff `is_expected_ip`, and then
    /// equals `ip_address`.
    pub fn new(
        ip_address: String,
        endpoint: String,
        method: String,
        headers: BTreeMap<String, String>,
        ip_debug_headers: DebugHeaders,
        data: BodyPayload,
        is_expected_ip: bool,
    ) -> Self {
        let matched_nat_ip = is_expected_ip.then(|| ip_address.clone());
        Self {
            timestamp: Local::now().naive_local(),
            ip_address,
            endpoint,
            method,
            headers,
            ip_debug_headers,
            data,
            is_expected_ip,
            matched_nat_ip,
        }
    }
}
