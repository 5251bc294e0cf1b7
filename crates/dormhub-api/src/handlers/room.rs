//! Room handlers: inventory CRUD and the reservation lock.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use uuid::Uuid;

use dormhub_entity::room::{CreateRoom, Room};

use crate::dto::request::CreateRoomRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// POST /api/rooms (admin)
pub async fn create_room(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateRoomRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Room>>), ApiError> {
    let room = state
        .room_service
        .create_room(
            &auth,
            CreateRoom {
                room_number: req.room_number,
                block: req.block,
                room_type: req.room_type,
                capacity: req.capacity,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(room))))
}

/// GET /api/rooms
pub async fn list_rooms(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let result = state
        .room_service
        .list_rooms(params.into_page_request())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": result })))
}

/// GET /api/rooms/:id
pub async fn get_room(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Room>>, ApiError> {
    let room = state.room_service.get_room(id).await?;
    Ok(Json(ApiResponse::ok(room)))
}

/// POST /api/rooms/:id/lock
pub async fn lock_room(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Room>>, ApiError> {
    let room = state.lock_service.acquire_lock(&auth, id).await?;
    Ok(Json(ApiResponse::ok(room)))
}
