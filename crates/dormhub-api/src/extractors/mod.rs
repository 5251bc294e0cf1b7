//! Request extractors: authenticated user context and pagination.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::Deserialize;

use dormhub_core::error::AppError;
use dormhub_core::types::pagination::PageRequest;
use dormhub_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the client's device identifier.
const DEVICE_ID_HEADER: &str = "x-device-id";

/// The authenticated user, extracted from the `Authorization` header.
///
/// Derefs to [`RequestContext`] so handlers can pass it straight into
/// service methods.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::unauthorized("Missing bearer token"))?;
        let claims = state.jwt_decoder.decode_access_token(token)?;

        let ip_address = client_ip(parts);
        let device_id = header_value(parts, DEVICE_ID_HEADER);

        Ok(Self(RequestContext::new(
            claims.sub,
            claims.role,
            claims.username,
            ip_address,
            device_id,
        )))
    }
}

/// Pagination query parameters (`?page=&page_size=`).
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationParams {
    /// Page number (1-based).
    pub page: Option<u64>,
    /// Items per page.
    pub page_size: Option<u64>,
}

impl PaginationParams {
    /// Convert into a clamped [`PageRequest`].
    pub fn into_page_request(self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest::new(
            self.page.unwrap_or(defaults.page),
            self.page_size.unwrap_or(defaults.page_size),
        )
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn client_ip(parts: &Parts) -> String {
    header_value(parts, "x-forwarded-for")
        .and_then(|v| v.split(',').next().map(|ip| ip.trim().to_string()))
        .or_else(|| header_value(parts, "x-real-ip"))
        .unwrap_or_else(|| "unknown".to_string())
}
