//! Room status enumeration and derivation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle status of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "room_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    /// Open for locking and allocation.
    Available,
    /// Occupants have reached capacity.
    Full,
    /// Taken out of service by an admin; no allocations permitted.
    Maintenance,
    /// Held exclusively by one student pending their allocation request.
    Locked,
}

impl RoomStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Full => "full",
            Self::Maintenance => "maintenance",
            Self::Locked => "locked",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derive the authoritative status of a room from its occupancy and lock
/// fields.
///
/// This is the single source of truth for the `Room.status` /
/// `Room.occupants` coupling: every mutation recomputes status through
/// this function (or its SQL CASE mirror) rather than patching the field
/// ad hoc. An expired lock is treated as absent.
pub fn derive_room_status(
    occupant_count: usize,
    capacity: i32,
    lock: Option<(Uuid, DateTime<Utc>)>,
    under_maintenance: bool,
    now: DateTime<Utc>,
) -> RoomStatus {
    if under_maintenance {
        return RoomStatus::Maintenance;
    }
    if occupant_count as i64 >= i64::from(capacity) {
        return RoomStatus::Full;
    }
    match lock {
        Some((_, expires_at)) if expires_at > now => RoomStatus::Locked,
        _ => RoomStatus::Available,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn student() -> Uuid {
        Uuid::new_v4()
    }

    #[test]
    fn test_empty_room_is_available() {
        let now = Utc::now();
        assert_eq!(
            derive_room_status(0, 2, None, false, now),
            RoomStatus::Available
        );
    }

    #[test]
    fn test_at_capacity_is_full() {
        let now = Utc::now();
        assert_eq!(
            derive_room_status(2, 2, None, false, now),
            RoomStatus::Full
        );
    }

    #[test]
    fn test_live_lock_is_locked() {
        let now = Utc::now();
        let lock = Some((student(), now + Duration::minutes(5)));
        assert_eq!(
            derive_room_status(1, 2, lock, false, now),
            RoomStatus::Locked
        );
    }

    #[test]
    fn test_expired_lock_is_treated_as_absent() {
        let now = Utc::now();
        let lock = Some((student(), now - Duration::seconds(1)));
        assert_eq!(
            derive_room_status(0, 2, lock, false, now),
            RoomStatus::Available
        );
    }

    #[test]
    fn test_maintenance_wins_over_everything() {
        let now = Utc::now();
        let lock = Some((student(), now + Duration::minutes(5)));
        assert_eq!(
            derive_room_status(2, 2, lock, true, now),
            RoomStatus::Maintenance
        );
    }

    #[test]
    fn test_full_wins_over_stale_lock() {
        let now = Utc::now();
        let lock = Some((student(), now - Duration::minutes(1)));
        assert_eq!(
            derive_room_status(3, 3, lock, false, now),
            RoomStatus::Full
        );
    }
}
