//! Room reservation lock behavior through the HTTP surface.

use http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::helpers::TestApp;

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL (config/test.toml)"]
async fn test_lock_grant_conflict_and_reacquire() {
    let app = TestApp::new().await;
    let s1 = app.create_test_user("s1", "student").await;
    let s2 = app.create_test_user("s2", "student").await;
    let room_id = app.create_test_room("A-101", 2).await;
    let t1 = app.access_token(&s1);
    let t2 = app.access_token(&s2);

    let path = format!("/api/rooms/{}/lock", room_id);

    let response = app.request("POST", &path, None, Some(&t1)).await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["status"], "locked");
    assert_eq!(response.body["data"]["locked_by"], json!(s1.id));

    // Another student hitting a live lock loses.
    let response = app.request("POST", &path, None, Some(&t2)).await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "CONFLICT");

    // The holder re-acquiring is idempotent.
    let response = app.request("POST", &path, None, Some(&t1)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["locked_by"], json!(s1.id));
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL (config/test.toml)"]
async fn test_lock_full_room_is_refused() {
    let app = TestApp::new().await;
    let occupant = app.create_test_user("occupant", "student").await;
    let s2 = app.create_test_user("s2", "student").await;
    let room_id = app.create_test_room("A-102", 1).await;

    sqlx::query("UPDATE rooms SET occupants = ARRAY[$1]::UUID[], status = 'full' WHERE id = $2")
        .bind(occupant.id)
        .bind(room_id)
        .execute(&app.db_pool)
        .await
        .expect("Failed to fill room");

    let t2 = app.access_token(&s2);
    let response = app
        .request("POST", &format!("/api/rooms/{}/lock", room_id), None, Some(&t2))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["error"], "FULL");
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL (config/test.toml)"]
async fn test_lock_unknown_room_not_found() {
    let app = TestApp::new().await;
    let s1 = app.create_test_user("s1", "student").await;
    let t1 = app.access_token(&s1);

    let response = app
        .request(
            "POST",
            &format!("/api/rooms/{}/lock", Uuid::new_v4()),
            None,
            Some(&t1),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

/// A rejection must not clear a lock that lapsed and was since validly
/// re-acquired by another student.
#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL (config/test.toml)"]
async fn test_rejection_preserves_successor_lock() {
    let app = TestApp::new().await;
    let s1 = app.create_test_user("s1", "student").await;
    let s2 = app.create_test_user("s2", "student").await;
    let admin = app.create_test_user("admin", "admin").await;
    let room_id = app.create_test_room("A-103", 2).await;
    let t1 = app.access_token(&s1);
    let t2 = app.access_token(&s2);
    let ta = app.access_token(&admin);

    let lock_path = format!("/api/rooms/{}/lock", room_id);

    let response = app.request("POST", &lock_path, None, Some(&t1)).await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let response = app
        .request(
            "POST",
            "/api/allocations",
            Some(json!({
                "request_type": "initial",
                "locked_room_id": room_id,
            })),
            Some(&t1),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    let allocation_id = response.body["data"]["id"]
        .as_str()
        .expect("No allocation id")
        .to_string();

    // The first student's lock lapses without the request being decided.
    sqlx::query("UPDATE rooms SET lock_expires_at = NOW() - INTERVAL '1 minute' WHERE id = $1")
        .bind(room_id)
        .execute(&app.db_pool)
        .await
        .expect("Failed to expire lock");

    // A second student validly re-acquires the room.
    let response = app.request("POST", &lock_path, None, Some(&t2)).await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["locked_by"], json!(s2.id));

    // Rejecting the stale request must leave the successor's hold alone.
    let response = app
        .request(
            "PUT",
            &format!("/api/allocations/{}/status", allocation_id),
            Some(json!({ "status": "rejected", "admin_comment": "lock lapsed" })),
            Some(&ta),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let (locked_by, status): (Option<Uuid>, String) =
        sqlx::query_as("SELECT locked_by, status::TEXT FROM rooms WHERE id = $1")
            .bind(room_id)
            .fetch_one(&app.db_pool)
            .await
            .expect("Failed to read room");
    assert_eq!(locked_by, Some(s2.id));
    assert_eq!(status, "locked");
}
