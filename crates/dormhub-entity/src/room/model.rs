//! Room entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::{RoomStatus, derive_room_status};

/// A hostel room with bounded capacity.
///
/// Occupants are mutated only by the allocation workflow; the lock fields
/// are set by the lock manager and cleared when an allocation referencing
/// the lock is decided.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Room {
    /// Unique room identifier.
    pub id: Uuid,
    /// Human-facing room number, unique across the hostel.
    pub room_number: String,
    /// Hostel block the room belongs to.
    pub block: String,
    /// Room type label (e.g. `"single"`, `"double"`).
    pub room_type: String,
    /// Maximum number of occupants.
    pub capacity: i32,
    /// Student IDs currently assigned to this room.
    pub occupants: Vec<Uuid>,
    /// Current status. Kept consistent with occupancy and lock fields via
    /// [`derive_room_status`].
    pub status: RoomStatus,
    /// The student holding the reservation lock, if any.
    pub locked_by: Option<Uuid>,
    /// When the reservation lock lapses.
    pub lock_expires_at: Option<DateTime<Utc>>,
    /// When the room was created.
    pub created_at: DateTime<Utc>,
    /// When the room was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Room {
    /// Number of students currently assigned.
    pub fn occupant_count(&self) -> usize {
        self.occupants.len()
    }

    /// Whether the room has no free beds left.
    pub fn is_at_capacity(&self) -> bool {
        self.occupant_count() as i64 >= i64::from(self.capacity)
    }

    /// The lock pair `(locked_by, lock_expires_at)` if both fields are set.
    pub fn lock(&self) -> Option<(Uuid, DateTime<Utc>)> {
        match (self.locked_by, self.lock_expires_at) {
            (Some(holder), Some(expires_at)) => Some((holder, expires_at)),
            _ => None,
        }
    }

    /// Whether a lock exists and has not lapsed. Expired locks are
    /// advisory only and treated as absent by every reader.
    pub fn has_live_lock(&self, now: DateTime<Utc>) -> bool {
        matches!(self.lock(), Some((_, expires_at)) if expires_at > now)
    }

    /// Whether the given student holds a live lock on this room.
    pub fn is_locked_by(&self, student_id: Uuid, now: DateTime<Utc>) -> bool {
        matches!(self.lock(), Some((holder, expires_at)) if holder == student_id && expires_at > now)
    }

    /// Recompute the status this room should carry right now.
    pub fn derived_status(&self, now: DateTime<Utc>) -> RoomStatus {
        derive_room_status(
            self.occupant_count(),
            self.capacity,
            self.lock(),
            self.status == RoomStatus::Maintenance,
            now,
        )
    }
}

/// Data required to create a new room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoom {
    /// Human-facing room number.
    pub room_number: String,
    /// Hostel block.
    pub block: String,
    /// Room type label.
    pub room_type: String,
    /// Maximum number of occupants; must be positive.
    pub capacity: i32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn room(capacity: i32, occupants: Vec<Uuid>) -> Room {
        let now = Utc::now();
        Room {
            id: Uuid::new_v4(),
            room_number: "A-101".to_string(),
            block: "A".to_string(),
            room_type: "double".to_string(),
            capacity,
            occupants,
            status: RoomStatus::Available,
            locked_by: None,
            lock_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_capacity_check() {
        assert!(!room(2, vec![Uuid::new_v4()]).is_at_capacity());
        assert!(room(1, vec![Uuid::new_v4()]).is_at_capacity());
    }

    #[test]
    fn test_lock_liveness() {
        let now = Utc::now();
        let student = Uuid::new_v4();
        let mut r = room(2, vec![]);
        assert!(!r.has_live_lock(now));

        r.locked_by = Some(student);
        r.lock_expires_at = Some(now + Duration::minutes(10));
        assert!(r.has_live_lock(now));
        assert!(r.is_locked_by(student, now));
        assert!(!r.is_locked_by(Uuid::new_v4(), now));

        r.lock_expires_at = Some(now - Duration::seconds(1));
        assert!(!r.has_live_lock(now));
        assert!(!r.is_locked_by(student, now));
    }

    #[test]
    fn test_derived_status_reflects_occupancy() {
        let now = Utc::now();
        let mut r = room(1, vec![Uuid::new_v4()]);
        assert_eq!(r.derived_status(now), RoomStatus::Full);
        r.occupants.clear();
        assert_eq!(r.derived_status(now), RoomStatus::Available);
    }
}
