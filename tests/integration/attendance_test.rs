//! Attendance token issuance and gate-scan behavior against the real
//! store: single-use nonces, device binding, and the presence toggle.

use chrono::{DateTime, Utc};
use http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::helpers::TestApp;

const DEVICE: &str = "device-alpha";

async fn issue_token(app: &TestApp, token: &str, device: &str) -> serde_json::Value {
    let response = app
        .request_with_device("GET", "/api/attendance/qr-code", None, Some(token), Some(device))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    response.body["data"].clone()
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL (config/test.toml)"]
async fn test_nonce_verifies_exactly_once() {
    let app = TestApp::new().await;
    let student = app.create_test_user("student", "student").await;
    let guard = app.create_test_user("guard", "security").await;
    let ts = app.access_token(&student);
    let tg = app.access_token(&guard);

    let grant = issue_token(&app, &ts, DEVICE).await;
    let qr = grant["token"].as_str().expect("No token in grant");

    let response = app
        .request("POST", "/api/attendance/scan", Some(json!({ "token": qr })), Some(&tg))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["student_id"], json!(student.id));

    // Replaying the same still-valid token loses to the consumed nonce.
    let response = app
        .request("POST", "/api/attendance/scan", Some(json!({ "token": qr })), Some(&tg))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "CONFLICT");
}

/// Consumed nonce rows must be kept past the token's own validity
/// window, per the configured retention.
#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL (config/test.toml)"]
async fn test_consumed_nonce_outlives_token_validity() {
    let app = TestApp::new().await;
    let student = app.create_test_user("student", "student").await;
    let guard = app.create_test_user("guard", "security").await;
    let ts = app.access_token(&student);
    let tg = app.access_token(&guard);

    let grant = issue_token(&app, &ts, DEVICE).await;
    let qr = grant["token"].as_str().expect("No token in grant");
    let nonce: Uuid = serde_json::from_value(grant["nonce"].clone()).expect("No nonce in grant");
    let valid_until: DateTime<Utc> =
        serde_json::from_value(grant["valid_until"].clone()).expect("No valid_until in grant");

    let response = app
        .request("POST", "/api/attendance/scan", Some(json!({ "token": qr })), Some(&tg))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let stored_expiry: DateTime<Utc> =
        sqlx::query_scalar("SELECT expires_at FROM used_tokens WHERE nonce = $1")
            .bind(nonce)
            .fetch_one(&app.db_pool)
            .await
            .expect("Consumed nonce row missing");
    assert!(
        stored_expiry > valid_until,
        "nonce row expires at {stored_expiry}, before the token's own {valid_until}"
    );
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL (config/test.toml)"]
async fn test_two_scans_restore_presence() {
    let app = TestApp::new().await;
    let student = app.create_test_user("student", "student").await;
    let guard = app.create_test_user("guard", "security").await;
    let ts = app.access_token(&student);
    let tg = app.access_token(&guard);

    let grant = issue_token(&app, &ts, DEVICE).await;
    let qr = grant["token"].as_str().expect("No token in grant");
    let response = app
        .request("POST", "/api/attendance/scan", Some(json!({ "token": qr })), Some(&tg))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["direction"], "entry");
    assert_eq!(response.body["data"]["is_inside"], json!(true));

    let grant = issue_token(&app, &ts, DEVICE).await;
    let qr = grant["token"].as_str().expect("No token in grant");
    let response = app
        .request("POST", "/api/attendance/scan", Some(json!({ "token": qr })), Some(&tg))
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["direction"], "exit");
    assert_eq!(response.body["data"]["is_inside"], json!(false));

    let is_inside: bool = sqlx::query_scalar("SELECT is_inside FROM users WHERE id = $1")
        .bind(student.id)
        .fetch_one(&app.db_pool)
        .await
        .expect("Failed to read user");
    assert!(!is_inside);
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL (config/test.toml)"]
async fn test_device_binding_refuses_second_device() {
    let app = TestApp::new().await;
    let student = app.create_test_user("student", "student").await;
    let ts = app.access_token(&student);

    // First request binds the device.
    issue_token(&app, &ts, DEVICE).await;

    let response = app
        .request_with_device(
            "GET",
            "/api/attendance/qr-code",
            None,
            Some(&ts),
            Some("device-beta"),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["error"], "FORBIDDEN");
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL (config/test.toml)"]
async fn test_scan_requires_scanner_role() {
    let app = TestApp::new().await;
    let student = app.create_test_user("student", "student").await;
    let ts = app.access_token(&student);

    let grant = issue_token(&app, &ts, DEVICE).await;
    let qr = grant["token"].as_str().expect("No token in grant");

    let response = app
        .request("POST", "/api/attendance/scan", Some(json!({ "token": qr })), Some(&ts))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
