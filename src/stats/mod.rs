//! Aggregate statistics over a request-log snapshot.
//!
//! # Responsibilities
//! - Count total / expected / unexpected requests
//! - Group request counts per resolved address
//! - Render the fixed-order comparison against the expected list
//!
//! # Design Decisions
//! - Pure function of the snapshot; no I/O
//! - Comparison iterates the configured list, not the distribution,
//!   so the report order is stable regardless of traffic
//! - Empty snapshot renders the degenerate zero payload with a sentinel

use std::collections::BTreeMap;

use serde::Serialize;

use crate::classifier::ExpectedIps;
use crate::store::RequestRecord;

/// Per-address comparison lines, or a sentinel when nothing was logged yet.
#[derive(Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Comparison {
    PerIp(Vec<String>),
    Sentinel(&'static str),
}

/// Distribution of addresses outside the expected list. Renders as the
/// string `"None"` when empty, for readability of the raw JSON.
#[derive(Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UnexpectedIps {
    Counts(BTreeMap<String, usize>),
    Sentinel(&'static str),
}

impl UnexpectedIps {
    fn from_counts(counts: BTreeMap<String, usize>) -> Self {
        if counts.is_empty() {
            UnexpectedIps::Sentinel("None")
        } else {
            UnexpectedIps::Counts(counts)
        }
    }
}

/// Aggregate report served by `/stats`.
#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub total_requests: usize,
    pub expected_ip_requests: usize,
    pub unexpected_ip_requests: usize,
    pub expected_nat_ips: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_distribution: Option<BTreeMap<String, usize>>,
    pub comparison: Comparison,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unexpected_ips: Option<UnexpectedIps>,
}

/// Compute the aggregate report for a snapshot in insertion order.
pub fn aggregate(records: &[RequestRecord], expected: &ExpectedIps) -> StatsReport {
    if records.is_empty() {
        return StatsReport {
            total_requests: 0,
            expected_ip_requests: 0,
            unexpected_ip_requests: 0,
            expected_nat_ips: expected.as_slice().to_vec(),
            ip_distribution: None,
            comparison: Comparison::Sentinel("No requests logged yet"),
            unexpected_ips: None,
        };
    }

    let total = records.len();
    let expected_count = records.iter().filter(|r| r.is_expected_ip).count();

    let mut distribution: BTreeMap<String, usize> = BTreeMap::new();
    for record in records {
        *distribution.entry(record.ip_address.clone()).or_default() += 1;
    }

    // Fixed order: one line per configured address.
    let comparison = expected
        .iter()
        .map(|ip| match distribution.get(ip) {
            Some(count) => format!("✓ {ip}: {count} requests (MATCHED)"),
            None => format!("✗ {ip}: 0 requests (NOT SEEN YET)"),
        })
        .collect();

    let unexpected: BTreeMap<String, usize> = distribution
        .iter()
        .filter(|(ip, _)| !expected.contains(ip))
        .map(|(ip, count)| (ip.clone(), *count))
        .collect();

    StatsReport {
        total_requests: total,
        expected_ip_requests: expected_count,
        unexpected_ip_requests: total - expected_count,
        expected_nat_ips: expected.as_slice().to_vec(),
        ip_distribution: Some(distribution),
        comparison: Comparison::PerIp(comparison),
        unexpected_ips: Some(UnexpectedIps::from_counts(unexpected)),
    }
}
