//! User entity model (the subset DormHub cares about).
//!
//! Account provisioning, profiles, and credentials live in the identity
//! service; DormHub only tracks the fields the reservation and attendance
//! subsystems read and write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::role::UserRole;

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Human-readable display name.
    pub display_name: String,
    /// User role.
    pub role: UserRole,
    /// Device identifier bound on the first attendance token request.
    /// Once set, every subsequently presented token must carry it.
    pub device_id: Option<String>,
    /// Presence flag toggled by attendance scans.
    pub is_inside: bool,
    /// The room the student currently occupies, if assigned.
    pub room_id: Option<Uuid>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if this user has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Whether the presented device matches the bound one. An unbound
    /// device never matches; binding is a separate, explicit step.
    pub fn device_matches(&self, presented: &str) -> bool {
        self.device_id.as_deref() == Some(presented)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(device_id: Option<&str>) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "s123".to_string(),
            display_name: "Test Student".to_string(),
            role: UserRole::Student,
            device_id: device_id.map(str::to_string),
            is_inside: false,
            room_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_device_match() {
        assert!(user(Some("dev-a")).device_matches("dev-a"));
        assert!(!user(Some("dev-a")).device_matches("dev-b"));
        assert!(!user(None).device_matches("dev-a"));
    }
}
