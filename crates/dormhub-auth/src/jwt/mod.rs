//! JWT claims, encoding, and verification.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::{AccessClaims, AttendanceClaims, ATTENDANCE_PURPOSE};
pub use decoder::JwtDecoder;
pub use encoder::{AttendanceTokenGrant, JwtEncoder};
