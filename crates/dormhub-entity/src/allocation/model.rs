//! Allocation request entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::{AllocationStatus, RequestType};

/// A student's request to occupy (or change) a room, progressing through
/// admin review.
///
/// At most one `pending` allocation may exist per student at a time,
/// enforced by a partial unique index in the store.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Allocation {
    /// Unique allocation identifier.
    pub id: Uuid,
    /// The requesting student.
    pub student_id: Uuid,
    /// Nature of the request.
    pub request_type: RequestType,
    /// Requested hostel block, if the student expressed a preference.
    pub requested_block: Option<String>,
    /// Requested room type, if the student expressed a preference.
    pub requested_room_type: Option<String>,
    /// Free-text justification from the student.
    pub reason: Option<String>,
    /// The room the student locked before submitting, if any.
    pub locked_room_id: Option<Uuid>,
    /// The room assigned on approval.
    pub assigned_room_id: Option<Uuid>,
    /// Current state.
    pub status: AllocationStatus,
    /// Admin's note recorded with the decision.
    pub admin_comment: Option<String>,
    /// The admin who decided this request.
    pub decided_by: Option<Uuid>,
    /// When the decision was made.
    pub decided_at: Option<DateTime<Utc>>,
    /// When the request was created.
    pub created_at: DateTime<Utc>,
    /// When the request was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Allocation {
    /// Whether this request still awaits a decision.
    pub fn is_pending(&self) -> bool {
        self.status == AllocationStatus::Pending
    }
}

/// Data required to create a new allocation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAllocation {
    /// The requesting student.
    pub student_id: Uuid,
    /// Nature of the request.
    pub request_type: RequestType,
    /// Requested hostel block.
    pub requested_block: Option<String>,
    /// Requested room type.
    pub requested_room_type: Option<String>,
    /// Free-text justification.
    pub reason: Option<String>,
    /// The room the student locked before submitting.
    pub locked_room_id: Option<Uuid>,
}
