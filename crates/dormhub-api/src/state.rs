//! Application state shared across all handlers.

use std::sync::Arc;

use sqlx::PgPool;

use dormhub_auth::jwt::{JwtDecoder, JwtEncoder};
use dormhub_core::config::AppConfig;
use dormhub_service::allocation::AllocationService;
use dormhub_service::attendance::AttendanceService;
use dormhub_service::audit::AuditService;
use dormhub_service::lock::LockService;
use dormhub_service::notification::NotificationService;
use dormhub_service::room::RoomService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. All fields are
/// `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db_pool: PgPool,
    /// JWT token encoder.
    pub jwt_encoder: Arc<JwtEncoder>,
    /// JWT token decoder and validator.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Room inventory service.
    pub room_service: Arc<RoomService>,
    /// Room lock manager.
    pub lock_service: Arc<LockService>,
    /// Allocation workflow service.
    pub allocation_service: Arc<AllocationService>,
    /// Attendance token issuer/verifier.
    pub attendance_service: Arc<AttendanceService>,
    /// Notification inbox service.
    pub notification_service: Arc<NotificationService>,
    /// Audit trail service.
    pub audit_service: Arc<AuditService>,
}
