//! JWT token creation with configurable signing and TTL.

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use dormhub_core::config::attendance::AttendanceConfig;
use dormhub_core::config::auth::AuthConfig;
use dormhub_core::error::AppError;
use dormhub_entity::user::User;

use super::claims::{ATTENDANCE_PURPOSE, AccessClaims, AttendanceClaims};

/// Creates signed JWT access and attendance tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Access token TTL in minutes.
    access_ttl_minutes: i64,
    /// Attendance token TTL in seconds.
    attendance_ttl_seconds: i64,
    /// Suggested client re-issue interval in seconds.
    rotation_hint_seconds: u64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("attendance_ttl_seconds", &self.attendance_ttl_seconds)
            .finish()
    }
}

/// Result of a successful attendance token issuance.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AttendanceTokenGrant {
    /// The signed token string.
    pub token: String,
    /// The embedded single-use nonce.
    pub nonce: Uuid,
    /// When the token stops being accepted.
    pub valid_until: DateTime<Utc>,
    /// How often the client should re-issue, in seconds. Kept below the
    /// TTL so the displayed code never goes stale on screen.
    pub rotate_after_seconds: u64,
}

impl JwtEncoder {
    /// Creates a new encoder from auth and attendance configuration.
    pub fn new(auth: &AuthConfig, attendance: &AttendanceConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(auth.jwt_secret.as_bytes()),
            access_ttl_minutes: auth.access_ttl_minutes as i64,
            attendance_ttl_seconds: attendance.token_ttl_seconds as i64,
            rotation_hint_seconds: attendance.rotation_hint_seconds,
        }
    }

    /// Generates an access token for the given user.
    pub fn generate_access_token(
        &self,
        user: &User,
    ) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::minutes(self.access_ttl_minutes);

        let claims = AccessClaims {
            sub: user.id,
            role: user.role,
            username: user.username.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign access token: {e}")))?;

        Ok((token, expires_at))
    }

    /// Generates a short-lived attendance token bound to the given
    /// student and device, with a fresh single-use nonce.
    pub fn generate_attendance_token(
        &self,
        student_id: Uuid,
        device_id: &str,
    ) -> Result<AttendanceTokenGrant, AppError> {
        let now = Utc::now();
        let valid_until = now + chrono::Duration::seconds(self.attendance_ttl_seconds);
        let nonce = Uuid::new_v4();

        let claims = AttendanceClaims {
            sub: student_id,
            device_id: device_id.to_string(),
            purpose: ATTENDANCE_PURPOSE.to_string(),
            iat: now.timestamp(),
            exp: valid_until.timestamp(),
            jti: nonce,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign attendance token: {e}")))?;

        Ok(AttendanceTokenGrant {
            token,
            nonce,
            valid_until,
            rotate_after_seconds: self.rotation_hint_seconds,
        })
    }
}
