//! Attendance log entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Direction of a gate scan, derived from the presence toggle rather than
/// reported by the scanner hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "attendance_direction", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The student entered the hostel.
    Entry,
    /// The student left the hostel.
    Exit,
}

impl Direction {
    /// Derive the direction from the presence flag *after* the toggle.
    pub fn from_new_presence(is_inside: bool) -> Self {
        if is_inside { Self::Entry } else { Self::Exit }
    }
}

/// An immutable record of one successful gate scan.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttendanceLog {
    /// Unique log entry identifier.
    pub id: Uuid,
    /// The scanned student.
    pub student_id: Uuid,
    /// Derived scan direction.
    pub direction: Direction,
    /// The scanning actor (security or admin).
    pub scanned_by: Uuid,
    /// When the scan happened.
    pub scanned_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_presence() {
        assert_eq!(Direction::from_new_presence(true), Direction::Entry);
        assert_eq!(Direction::from_new_presence(false), Direction::Exit);
    }
}
