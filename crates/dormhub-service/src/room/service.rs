//! Room administration: creation and lookups.
//!
//! Occupancy, status, and lock fields are never written here; those
//! belong to the lock manager and the allocation workflow.

use std::sync::Arc;

use uuid::Uuid;

use dormhub_core::error::AppError;
use dormhub_core::types::pagination::{PageRequest, PageResponse};
use dormhub_database::repositories::room::RoomRepository;
use dormhub_entity::room::{CreateRoom, Room};

use crate::context::RequestContext;

/// Manages the room inventory.
#[derive(Debug, Clone)]
pub struct RoomService {
    /// Room repository.
    room_repo: Arc<RoomRepository>,
}

impl RoomService {
    /// Creates a new room service.
    pub fn new(room_repo: Arc<RoomRepository>) -> Self {
        Self { room_repo }
    }

    /// Create a room (admin only).
    pub async fn create_room(
        &self,
        ctx: &RequestContext,
        room: CreateRoom,
    ) -> Result<Room, AppError> {
        if !ctx.is_admin() {
            return Err(AppError::forbidden("Admin role required"));
        }
        if room.capacity <= 0 {
            return Err(AppError::validation("Room capacity must be positive"));
        }
        if room.room_number.trim().is_empty() {
            return Err(AppError::validation("Room number must not be empty"));
        }
        self.room_repo.create(&room).await
    }

    /// Get one room.
    pub async fn get_room(&self, room_id: Uuid) -> Result<Room, AppError> {
        self.room_repo
            .find_by_id(room_id)
            .await?
            .ok_or_else(|| AppError::not_found("Room not found"))
    }

    /// List rooms.
    pub async fn list_rooms(&self, page: PageRequest) -> Result<PageResponse<Room>, AppError> {
        self.room_repo.list(&page).await
    }
}
