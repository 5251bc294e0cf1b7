//! Attendance handlers: token issuance, gate scans, and history.

use axum::Json;
use axum::extract::{Query, State};

use dormhub_auth::jwt::AttendanceTokenGrant;
use dormhub_service::attendance::ScanResult;

use crate::dto::request::ScanRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/attendance/qr-code
pub async fn issue_token(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<AttendanceTokenGrant>>, ApiError> {
    let grant = state.attendance_service.issue_token(&auth).await?;
    Ok(Json(ApiResponse::ok(grant)))
}

/// POST /api/attendance/scan (security/admin)
pub async fn scan(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<ScanRequest>,
) -> Result<Json<ApiResponse<ScanResult>>, ApiError> {
    let result = state.attendance_service.scan(&auth, &req.token).await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/attendance/history
pub async fn my_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = state
        .attendance_service
        .my_history(&auth, params.into_page_request())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": result })))
}

/// GET /api/attendance (admin)
pub async fn list_all(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = state
        .attendance_service
        .list_all(&auth, params.into_page_request())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": result })))
}
