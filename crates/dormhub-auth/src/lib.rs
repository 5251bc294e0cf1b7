//! # dormhub-auth
//!
//! JWT token creation and verification for DormHub.
//!
//! Two token families share one HMAC secret: ordinary access tokens for
//! the API session layer, and short-lived attendance tokens that carry a
//! single-use nonce and the student's bound device identifier.

pub mod jwt;
