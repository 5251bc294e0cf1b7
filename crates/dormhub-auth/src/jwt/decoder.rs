//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use dormhub_core::config::auth::AuthConfig;
use dormhub_core::error::AppError;

use super::claims::{ATTENDANCE_PURPOSE, AccessClaims, AttendanceClaims};

/// Validates access and attendance JWT tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation for access tokens (small leeway for clock skew).
    access_validation: Validation,
    /// Validation for attendance tokens. No leeway: the 30–40 s window
    /// is the whole point, so expiry is enforced exactly.
    attendance_validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("access_validation", &self.access_validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut access_validation = Validation::new(Algorithm::HS256);
        access_validation.validate_exp = true;
        access_validation.leeway = 5; // 5 seconds leeway for clock skew

        let mut attendance_validation = Validation::new(Algorithm::HS256);
        attendance_validation.validate_exp = true;
        attendance_validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            access_validation,
            attendance_validation,
        }
    }

    /// Decodes and validates an access token string.
    pub fn decode_access_token(&self, token: &str) -> Result<AccessClaims, AppError> {
        decode::<AccessClaims>(token, &self.decoding_key, &self.access_validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::unauthorized("Invalid or expired access token"))
    }

    /// Decodes and validates an attendance token string.
    ///
    /// Checks signature, expiry, and purpose. Nonce and device binding
    /// are the verifier service's job; this only proves the token is
    /// authentic and fresh.
    pub fn decode_attendance_token(&self, token: &str) -> Result<AttendanceClaims, AppError> {
        let claims = decode::<AttendanceClaims>(
            token,
            &self.decoding_key,
            &self.attendance_validation,
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::unauthorized("Invalid or expired token"))?;

        if claims.purpose != ATTENDANCE_PURPOSE {
            return Err(AppError::unauthorized("Invalid token purpose"));
        }

        Ok(claims)
    }
}
