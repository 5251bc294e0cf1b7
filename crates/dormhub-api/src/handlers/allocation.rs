//! Allocation handlers: student requests and admin decisions.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use dormhub_entity::allocation::Allocation;
use dormhub_service::allocation::AllocationRequest;

use crate::dto::request::{CreateAllocationRequest, DecideAllocationRequest};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/allocations
pub async fn create_allocation(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateAllocationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Allocation>>), ApiError> {
    let allocation = state
        .allocation_service
        .request_allocation(
            &auth,
            AllocationRequest {
                request_type: req.request_type,
                requested_block: req.requested_block,
                requested_room_type: req.requested_room_type,
                reason: req.reason,
                locked_room_id: req.locked_room_id,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(allocation))))
}

/// GET /api/allocations
pub async fn list_my_allocations(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = state
        .allocation_service
        .list_my_allocations(&auth, params.into_page_request())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": result })))
}

/// GET /api/allocations/pending (admin)
pub async fn list_pending(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = state
        .allocation_service
        .list_pending(&auth, params.into_page_request())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": result })))
}

/// GET /api/allocations/:id
pub async fn get_allocation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Allocation>>, ApiError> {
    let allocation = state.allocation_service.get_allocation(&auth, id).await?;
    Ok(Json(ApiResponse::ok(allocation)))
}

/// PUT /api/allocations/:id/status (admin)
pub async fn decide_allocation(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<DecideAllocationRequest>,
) -> Result<Json<ApiResponse<Allocation>>, ApiError> {
    let allocation = state
        .allocation_service
        .update_allocation_status(&auth, id, req.status, req.room_id, req.admin_comment)
        .await?;
    Ok(Json(ApiResponse::ok(allocation)))
}
