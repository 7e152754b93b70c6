//! Route handlers.
//!
//! # Responsibilities
//! - `/` service descriptor
//! - `/webhook` classify, persist, acknowledge (the only fallible path)
//! - `/logs` and `/stats` read-only views that never fail to the caller
//! - `/debug/headers` classification diagnostics without persistence

use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::json;

use crate::classifier;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::stats::{aggregate, StatsReport};
use crate::store::{BodyPayload, RequestRecord, StoreError};

/// Maximum buffered webhook body.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Store write failure surfaced by `/webhook`. Read paths never construct it.
pub struct AppError(StoreError);

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> Self {
        Self(error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "Failed to persist request log");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "error": "Failed to persist request log"
            })),
        )
            .into_response()
    }
}

/// Acknowledgment returned by `/webhook`.
#[derive(Serialize)]
pub struct WebhookAck {
    pub success: bool,
    pub message: String,
    pub your_ip: String,
    pub is_expected_nat_ip: bool,
    pub timestamp: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_ip: Option<String>,
}

/// `GET /` — service descriptor. No side effects.
pub async fn index(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "active",
        "service": "IP Source Tracker",
        "expected_nat_ips": state.expected.as_slice(),
        "endpoints": {
            "webhook": "/webhook (GET/POST/PUT/DELETE/PATCH)",
            "logs": "/logs",
            "stats": "/stats",
            "debug": "/debug/headers"
        }
    }))
}

/// `/webhook` — classify the caller, persist a record, acknowledge.
pub async fn webhook(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Result<Json<WebhookAck>, AppError> {
    let (parts, body) = request.into_parts();
    let method = parts.method.to_string();
    let path = parts.uri.path().to_string();

    let client_ip = classifier::resolve_client_ip(&parts.headers, peer);
    let is_expected = state.expected.contains(&client_ip);
    let debug_headers = classifier::debug_header_snapshot(&parts.headers, peer);
    let data = read_body_payload(&parts.headers, body).await;

    tracing::debug!(
        ip = %client_ip,
        method = %method,
        expected = is_expected,
        "Webhook request received"
    );

    let record = RequestRecord::new(
        client_ip.clone(),
        path,
        method.clone(),
        header_map(&parts.headers),
        debug_headers,
        data,
        is_expected,
    );
    let stored = state.store.append(record).await?;

    metrics::record_logged_request(&method, is_expected);

    let (message, matched_ip) = if is_expected {
        (
            "VERIFIED: Request from expected NAT IP!".to_string(),
            Some(client_ip.clone()),
        )
    } else {
        (
            "Request logged but NOT from expected NAT IP".to_string(),
            None,
        )
    };

    Ok(Json(WebhookAck {
        success: true,
        message,
        your_ip: client_ip,
        is_expected_nat_ip: is_expected,
        timestamp: stored.timestamp,
        matched_ip,
    }))
}

/// Response body for `GET /logs`.
#[derive(Serialize)]
pub struct LogsResponse {
    pub logs: Vec<RequestRecord>,
    pub count: usize,
}

/// `GET /logs` — all records newest-first. Degrades to empty, never fails.
pub async fn logs(State(state): State<AppState>) -> Json<LogsResponse> {
    let (logs, count) = state.store.list_all().await;
    Json(LogsResponse { logs, count })
}

/// `GET /stats` — aggregate report. Degrades to the zero payload, never fails.
pub async fn stats(State(state): State<AppState>) -> Json<StatsReport> {
    let snapshot = state.store.snapshot().await;
    Json(aggregate(&snapshot, &state.expected))
}

/// `GET /debug/headers` — classification diagnostics. No persistence.
pub async fn debug_headers(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Json<serde_json::Value> {
    let headers = request.headers();
    let resolved_ip = classifier::resolve_client_ip(headers, peer);

    Json(json!({
        "resolved_ip": resolved_ip,
        "is_expected_nat_ip": state.expected.contains(&resolved_ip),
        "headers": header_map(headers),
        "ip_debug_headers": classifier::debug_header_snapshot(headers, peer),
        "method": request.method().as_str(),
        "path": request.uri().path(),
        "remote_addr": peer.to_string(),
    }))
}

/// Buffer and interpret the request body.
///
/// JSON content types are parsed; a declared-JSON body that fails to parse
/// is recorded as absent rather than rejected. Anything else is kept as
/// text; an empty body is absent.
async fn read_body_payload(headers: &HeaderMap, body: Body) -> BodyPayload {
    let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => return BodyPayload::Absent,
    };
    if bytes.is_empty() {
        return BodyPayload::Absent;
    }

    let declares_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase().contains("json"))
        .unwrap_or(false);

    if declares_json {
        match serde_json::from_slice(&bytes) {
            Ok(value) => BodyPayload::Json(value),
            Err(_) => BodyPayload::Absent,
        }
    } else {
        BodyPayload::Text(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Flatten the header map for the record. Repeated headers are joined with
/// commas; names are the normalized lowercase forms.
fn header_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes());
        map.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    map
}
