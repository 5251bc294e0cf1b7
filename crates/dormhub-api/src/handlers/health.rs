//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::json;

use crate::state::AppState;

/// GET /health
///
/// Reports liveness plus database connectivity. Returns 503 when the
/// database round-trip fails so load balancers can drain the instance.
pub async fn health_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<serde_json::Value>) {
    let db_ok = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&state.db_pool)
        .await
        .is_ok();

    let status = if db_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if db_ok { "healthy" } else { "degraded" },
            "database": if db_ok { "up" } else { "down" },
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
