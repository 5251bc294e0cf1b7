//! Route definitions for the DormHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(room_routes())
        .merge(allocation_routes())
        .merge(attendance_routes())
        .merge(notification_routes())
        .merge(audit_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Room inventory and the reservation lock
fn room_routes() -> Router<AppState> {
    Router::new()
        .route("/rooms", get(handlers::room::list_rooms))
        .route("/rooms", post(handlers::room::create_room))
        .route("/rooms/{id}", get(handlers::room::get_room))
        .route("/rooms/{id}/lock", post(handlers::room::lock_room))
}

/// Allocation requests and admin decisions
fn allocation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/allocations",
            post(handlers::allocation::create_allocation),
        )
        .route(
            "/allocations",
            get(handlers::allocation::list_my_allocations),
        )
        .route(
            "/allocations/pending",
            get(handlers::allocation::list_pending),
        )
        .route("/allocations/{id}", get(handlers::allocation::get_allocation))
        .route(
            "/allocations/{id}/status",
            put(handlers::allocation::decide_allocation),
        )
}

/// Attendance token issuance and gate scanning
fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/attendance/qr-code", get(handlers::attendance::issue_token))
        .route("/attendance/scan", post(handlers::attendance::scan))
        .route("/attendance/history", get(handlers::attendance::my_history))
        .route("/attendance", get(handlers::attendance::list_all))
}

/// Notification inbox endpoints
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/{id}/read",
            put(handlers::notification::mark_read),
        )
}

/// Audit trail (admin only)
fn audit_routes() -> Router<AppState> {
    Router::new().route("/audit", get(handlers::audit::list_audit_log))
}

/// Health check endpoint (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}

/// Build the CORS layer from configuration.
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use axum::http::{HeaderValue, Method};
    use tower_http::cors::Any;

    let origins = &state.config.server.cors_allowed_origins;

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    if origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors = cors.allow_origin(parsed);
    }

    cors
}
