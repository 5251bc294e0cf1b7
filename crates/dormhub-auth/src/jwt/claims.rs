//! JWT claims structures for access and attendance tokens.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dormhub_entity::user::UserRole;

/// The only purpose attendance tokens are minted for.
pub const ATTENDANCE_PURPOSE: &str = "entry-exit";

/// Claims payload embedded in API access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject — the user ID.
    pub sub: Uuid,
    /// User role at the time of token issuance.
    pub role: UserRole,
    /// Username for convenience.
    pub username: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// JWT ID.
    pub jti: Uuid,
}

impl AccessClaims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}

/// Claims payload embedded in short-lived attendance (QR) tokens.
///
/// The `jti` doubles as the single-use nonce consumed at scan time; the
/// `device_id` binds the token to the student's recognized device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceClaims {
    /// Subject — the student ID.
    pub sub: Uuid,
    /// The device the token was issued to.
    pub device_id: String,
    /// Token purpose; always [`ATTENDANCE_PURPOSE`].
    pub purpose: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Single-use nonce.
    pub jti: Uuid,
}

impl AttendanceClaims {
    /// Returns the student ID from the subject claim.
    pub fn student_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the single-use nonce.
    pub fn nonce(&self) -> Uuid {
        self.jti
    }
}
