//! Request body DTOs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dormhub_entity::allocation::{AllocationStatus, RequestType};

/// POST /api/rooms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    /// Human-facing room number.
    pub room_number: String,
    /// Hostel block.
    pub block: String,
    /// Room type label.
    pub room_type: String,
    /// Maximum number of occupants.
    pub capacity: i32,
}

/// POST /api/allocations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAllocationRequest {
    /// Nature of the request.
    pub request_type: RequestType,
    /// Preferred hostel block.
    pub requested_block: Option<String>,
    /// Preferred room type.
    pub requested_room_type: Option<String>,
    /// Free-text justification.
    pub reason: Option<String>,
    /// A room the student locked beforehand.
    pub locked_room_id: Option<Uuid>,
}

/// PUT /api/allocations/:id/status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecideAllocationRequest {
    /// The decision: `approved` or `rejected`.
    pub status: AllocationStatus,
    /// Explicit room to assign (approval only); defaults to the locked
    /// room.
    pub room_id: Option<Uuid>,
    /// Admin's note recorded with the decision.
    pub admin_comment: Option<String>,
}

/// POST /api/attendance/scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRequest {
    /// The presented attendance token.
    pub token: String,
}
