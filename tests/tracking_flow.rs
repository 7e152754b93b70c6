//! End-to-end webhook logging and classification flows.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};

use common::{app, cleanup, get_json, request_json, temp_log_path};

#[tokio::test]
async fn test_webhook_from_expected_ip_is_verified() {
    let log_file = temp_log_path();
    let app = app(&log_file);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/webhook")
        .header("X-Forwarded-For", "52.58.37.0")
        .header("Content-Type", "application/json")
        .body(Body::from(r#"{"a":1}"#))
        .unwrap();
    let (status, ack) = request_json(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["success"], true);
    assert_eq!(ack["your_ip"], "52.58.37.0");
    assert_eq!(ack["is_expected_nat_ip"], true);
    assert_eq!(ack["matched_ip"], "52.58.37.0");
    assert!(ack["message"].as_str().unwrap().contains("VERIFIED"));
    assert!(ack["timestamp"].is_string());

    // The verdict and the body both land in the persisted record.
    let (_, stats) = get_json(&app, "/stats").await;
    assert_eq!(stats["expected_ip_requests"], 1);
    assert_eq!(stats["ip_distribution"]["52.58.37.0"], 1);

    let (_, logs) = get_json(&app, "/logs").await;
    assert_eq!(logs["count"], 1);
    assert_eq!(logs["logs"][0]["data"]["a"], 1);
    assert_eq!(logs["logs"][0]["matched_nat_ip"], "52.58.37.0");

    cleanup(&log_file).await;
}

#[tokio::test]
async fn test_webhook_from_unexpected_ip_still_logged() {
    let log_file = temp_log_path();
    let app = app(&log_file);

    // No proxy headers: the mocked peer address is the resolved IP.
    let request = Request::builder()
        .method(Method::POST)
        .uri("/webhook")
        .body(Body::empty())
        .unwrap();
    let (status, ack) = request_json(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["success"], true);
    assert_eq!(ack["your_ip"], "10.0.0.5");
    assert_eq!(ack["is_expected_nat_ip"], false);
    assert!(ack.get("matched_ip").is_none());
    assert!(ack["message"].as_str().unwrap().contains("NOT"));

    let (_, logs) = get_json(&app, "/logs").await;
    assert_eq!(logs["count"], 1);
    assert_eq!(logs["logs"][0]["is_expected_ip"], false);
    assert!(logs["logs"][0]["matched_nat_ip"].is_null());

    cleanup(&log_file).await;
}

#[tokio::test]
async fn test_forwarded_for_wins_end_to_end() {
    let log_file = temp_log_path();
    let app = app(&log_file);

    let request = Request::builder()
        .method(Method::GET)
        .uri("/webhook")
        .header("X-Forwarded-For", "1.2.3.4, 5.6.7.8")
        .header("X-Real-IP", "9.9.9.9")
        .body(Body::empty())
        .unwrap();
    let (_, ack) = request_json(&app, request).await;

    assert_eq!(ack["your_ip"], "1.2.3.4");

    cleanup(&log_file).await;
}

#[tokio::test]
async fn test_malformed_json_body_recorded_as_absent() {
    let log_file = temp_log_path();
    let app = app(&log_file);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/webhook")
        .header("Content-Type", "application/json")
        .body(Body::from("{definitely not json"))
        .unwrap();
    let (status, ack) = request_json(&app, request).await;

    // Parse failure is not an error: the request is still logged.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["success"], true);

    let (_, logs) = get_json(&app, "/logs").await;
    assert_eq!(logs["count"], 1);
    assert!(logs["logs"][0]["data"].is_null());

    cleanup(&log_file).await;
}

#[tokio::test]
async fn test_plain_text_body_recorded_as_text() {
    let log_file = temp_log_path();
    let app = app(&log_file);

    let request = Request::builder()
        .method(Method::PUT)
        .uri("/webhook")
        .body(Body::from("raw payload"))
        .unwrap();
    let (_, ack) = request_json(&app, request).await;
    assert_eq!(ack["success"], true);

    let (_, logs) = get_json(&app, "/logs").await;
    assert_eq!(logs["logs"][0]["data"], "raw payload");
    assert_eq!(logs["logs"][0]["method"], "PUT");

    cleanup(&log_file).await;
}

#[tokio::test]
async fn test_logs_render_newest_first() {
    let log_file = temp_log_path();
    let app = app(&log_file);

    for ip in ["1.1.1.1", "2.2.2.2", "3.3.3.3"] {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/webhook")
            .header("X-Forwarded-For", ip)
            .body(Body::empty())
            .unwrap();
        let (status, _) = request_json(&app, request).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, logs) = get_json(&app, "/logs").await;
    assert_eq!(logs["count"], 3);
    assert_eq!(logs["logs"][0]["ip_address"], "3.3.3.3");
    assert_eq!(logs["logs"][1]["ip_address"], "2.2.2.2");
    assert_eq!(logs["logs"][2]["ip_address"], "1.1.1.1");

    cleanup(&log_file).await;
}

#[tokio::test]
async fn test_webhook_write_failure_returns_500() {
    // A directory as the log file makes the rewrite fail while reads still
    // recover as empty history.
    let log_dir = temp_log_path();
    tokio::fs::create_dir(&log_dir).await.unwrap();
    let app = app(&log_dir);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/webhook")
        .header("X-Forwarded-For", "52.58.37.0")
        .body(Body::empty())
        .unwrap();
    let (status, body) = request_json(&app, request).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());

    // The read endpoints still degrade instead of failing.
    let (status, logs) = get_json(&app, "/logs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logs["count"], 0);

    let _ = tokio::fs::remove_dir(&log_dir).await;
}

#[tokio::test]
async fn test_webhook_records_debug_header_snapshot() {
    let log_file = temp_log_path();
    let app = app(&log_file);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/webhook")
        .header("CF-Connecting-IP", "198.51.100.7")
        .body(Body::empty())
        .unwrap();
    let (_, ack) = request_json(&app, request).await;
    assert_eq!(ack["your_ip"], "198.51.100.7");

    let (_, logs) = get_json(&app, "/logs").await;
    let debug = &logs["logs"][0]["ip_debug_headers"];
    assert_eq!(debug["CF-Connecting-IP"], "198.51.100.7");
    assert!(debug["X-Forwarded-For"].is_null());
    assert_eq!(debug["remote_addr"], "10.0.0.5:44312");

    cleanup(&log_file).await;
}
