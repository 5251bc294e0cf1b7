//! Shared test helpers for integration tests.

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use dormhub_auth::jwt::JwtEncoder;
use dormhub_core::config::AppConfig;
use dormhub_database::connection::DatabasePool;
use dormhub_entity::user::User;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db_pool: PgPool,
    /// Application config
    pub config: AppConfig,
}

impl TestApp {
    /// Create a new test application against a clean database
    pub async fn new() -> Self {
        let config = AppConfig::load("test").expect("Failed to load test config");

        let db_pool = DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database")
            .into_pool();

        dormhub_database::migration::run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        Self::clean_database(&db_pool).await;

        let router = dormhub_api::app::build_app(config.clone(), db_pool.clone());

        Self {
            router,
            db_pool,
            config,
        }
    }

    /// Clean all test data from the database
    async fn clean_database(pool: &PgPool) {
        // Break the users <-> rooms reference cycle first.
        let _ = sqlx::query("UPDATE users SET room_id = NULL")
            .execute(pool)
            .await;

        let tables = [
            "audit_log",
            "notifications",
            "attendance_logs",
            "used_tokens",
            "allocations",
            "rooms",
            "users",
        ];

        for table in &tables {
            let query = format!("DELETE FROM {}", table);
            let _ = sqlx::query(&query).execute(pool).await;
        }
    }

    /// Create a test user with the given role and return the row
    pub async fn create_test_user(&self, username: &str, role: &str) -> User {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, display_name, role) \
             VALUES ($1, $2, $3::user_role) RETURNING *",
        )
        .bind(username)
        .bind(username)
        .bind(role)
        .fetch_one(&self.db_pool)
        .await
        .expect("Failed to create test user")
    }

    /// Create a test room and return its ID
    pub async fn create_test_room(&self, room_number: &str, capacity: i32) -> Uuid {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO rooms (room_number, block, room_type, capacity) \
             VALUES ($1, 'A', 'double', $2) RETURNING id",
        )
        .bind(room_number)
        .bind(capacity)
        .fetch_one(&self.db_pool)
        .await
        .expect("Failed to create test room")
    }

    /// Sign a JWT access token for the given user
    pub fn access_token(&self, user: &User) -> String {
        let encoder = JwtEncoder::new(&self.config.auth, &self.config.attendance);
        let (token, _) = encoder
            .generate_access_token(user)
            .expect("Failed to sign access token");
        token
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        self.request_with_device(method, path, body, token, None)
            .await
    }

    /// Make an HTTP request carrying an `X-Device-Id` header
    pub async fn request_with_device(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
        device_id: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(device_id) = device_id {
            req = req.header("X-Device-Id", device_id);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}
