//! Allocation workflow behavior against the real store.

use http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use dormhub_core::error::ErrorKind;
use dormhub_database::repositories::allocation::AllocationRepository;
use dormhub_entity::allocation::{CreateAllocation, RequestType};

use crate::helpers::TestApp;

fn initial_request(student_id: Uuid) -> CreateAllocation {
    CreateAllocation {
        student_id,
        request_type: RequestType::Initial,
        requested_block: Some("A".to_string()),
        requested_room_type: None,
        reason: None,
        locked_room_id: None,
    }
}

/// The partial unique index refuses a second pending row even when the
/// repository is driven directly, bypassing the service pre-check.
#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL (config/test.toml)"]
async fn test_one_pending_per_student_enforced_by_index() {
    let app = TestApp::new().await;
    let s1 = app.create_test_user("s1", "student").await;
    let repo = AllocationRepository::new(app.db_pool.clone());

    repo.create(&initial_request(s1.id))
        .await
        .expect("First request should be accepted");

    let err = repo
        .create(&initial_request(s1.id))
        .await
        .expect_err("Second pending request must be refused");
    assert_eq!(err.kind, ErrorKind::Conflict);

    // A decided request frees the slot.
    sqlx::query("UPDATE allocations SET status = 'rejected' WHERE student_id = $1")
        .bind(s1.id)
        .execute(&app.db_pool)
        .await
        .expect("Failed to decide request");
    repo.create(&initial_request(s1.id))
        .await
        .expect("A new request after a decision should be accepted");
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL (config/test.toml)"]
async fn test_approval_assigns_room_and_clears_lock() {
    let app = TestApp::new().await;
    let s1 = app.create_test_user("s1", "student").await;
    let admin = app.create_test_user("admin", "admin").await;
    let room_id = app.create_test_room("B-201", 2).await;
    let t1 = app.access_token(&s1);
    let ta = app.access_token(&admin);

    let response = app
        .request(
            "POST",
            &format!("/api/rooms/{}/lock", room_id),
            None,
            Some(&t1),
        )
        .await;
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

    let response = app
        .request(
            "PUT",
            &format!("/api/allocations/{}/status", allocation_id),
            Some(json!({ "status": "approved" })),
            Some(&ta),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["data"]["status"], "approved");
    assert_eq!(response.body["data"]["assigned_room_id"], json!(room_id));

    let (occupants, locked_by, status): (Vec<Uuid>, Option<Uuid>, String) =
        sqlx::query_as("SELECT occupants, locked_by, status::TEXT FROM rooms WHERE id = $1")
            .bind(room_id)
            .fetch_one(&app.db_pool)
            .await
            .expect("Failed to read room");
    assert_eq!(occupants, vec![s1.id]);
    assert_eq!(locked_by, None);
    assert_eq!(status, "available");

    let user_room: Option<Uuid> =
        sqlx::query_scalar("SELECT room_id FROM users WHERE id = $1")
            .bind(s1.id)
            .fetch_one(&app.db_pool)
            .await
            .expect("Failed to read user");
    assert_eq!(user_room, Some(room_id));
}

/// Approving into a room already at capacity is refused by the in-store
/// guard and leaves the occupants untouched.
#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL (config/test.toml)"]
async fn test_approval_at_capacity_is_refused() {
    let app = TestApp::new().await;
    let occupant = app.create_test_user("occupant", "student").await;
    let s1 = app.create_test_user("s1", "student").await;
    let admin = app.create_test_user("admin", "admin").await;
    let room_id = app.create_test_room("B-202", 1).await;
    let t1 = app.access_token(&s1);
    let ta = app.access_token(&admin);

    sqlx::query("UPDATE rooms SET occupants = ARRAY[$1]::UUID[], status = 'full' WHERE id = $2")
        .bind(occupant.id)
        .bind(room_id)
        .execute(&app.db_pool)
        .await
        .expect("Failed to fill room");

    let response = app
        .request(
            "POST",
            "/api/allocations",
            Some(json!({ "request_type": "initial" })),
            Some(&t1),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    let allocation_id = response.body["data"]["id"]
        .as_str()
        .expect("No allocation id")
        .to_string();

    let response = app
        .request(
            "PUT",
            &format!("/api/allocations/{}/status", allocation_id),
            Some(json!({ "status": "approved", "room_id": room_id })),
            Some(&ta),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT, "{:?}", response.body);

    let occupants: Vec<Uuid> = sqlx::query_scalar("SELECT occupants FROM rooms WHERE id = $1")
        .bind(room_id)
        .fetch_one(&app.db_pool)
        .await
        .expect("Failed to read room");
    assert_eq!(occupants, vec![occupant.id]);
}

#[tokio::test]
#[ignore = "requires a provisioned PostgreSQL (config/test.toml)"]
async fn test_decision_requires_admin() {
    let app = TestApp::new().await;
    let s1 = app.create_test_user("s1", "student").await;
    let t1 = app.access_token(&s1);

    let response = app
        .request(
            "PUT",
            &format!("/api/allocations/{}/status", Uuid::new_v4()),
            Some(json!({ "status": "rejected" })),
            Some(&t1),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
