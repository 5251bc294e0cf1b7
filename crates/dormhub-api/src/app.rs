//! Server bootstrap: wires repositories, services, and the router.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;

use dormhub_auth::jwt::{JwtDecoder, JwtEncoder};
use dormhub_core::config::AppConfig;
use dormhub_core::error::AppError;
use dormhub_database::repositories::allocation::AllocationRepository;
use dormhub_database::repositories::attendance::AttendanceRepository;
use dormhub_database::repositories::audit::AuditLogRepository;
use dormhub_database::repositories::notification::NotificationRepository;
use dormhub_database::repositories::room::RoomRepository;
use dormhub_database::repositories::used_token::UsedTokenRepository;
use dormhub_database::repositories::user::UserRepository;
use dormhub_service::allocation::AllocationService;
use dormhub_service::attendance::AttendanceService;
use dormhub_service::audit::AuditService;
use dormhub_service::lock::LockService;
use dormhub_service::notification::NotificationService;
use dormhub_service::room::RoomService;

use crate::router::build_router;
use crate::state::AppState;

/// Build the application state and the complete Axum app.
pub fn build_app(config: AppConfig, db_pool: PgPool) -> Router {
    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let room_repo = Arc::new(RoomRepository::new(db_pool.clone()));
    let allocation_repo = Arc::new(AllocationRepository::new(db_pool.clone()));
    let attendance_repo = Arc::new(AttendanceRepository::new(db_pool.clone()));
    let used_token_repo = Arc::new(UsedTokenRepository::new(
        db_pool.clone(),
        &config.attendance,
    ));
    let notification_repo = Arc::new(NotificationRepository::new(db_pool.clone()));
    let audit_repo = Arc::new(AuditLogRepository::new(db_pool.clone()));

    let jwt_encoder = Arc::new(JwtEncoder::new(&config.auth, &config.attendance));
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

    let notification_service = Arc::new(NotificationService::new(Arc::clone(&notification_repo)));
    let audit_service = Arc::new(AuditService::new(Arc::clone(&audit_repo)));
    let room_service = Arc::new(RoomService::new(Arc::clone(&room_repo)));
    let lock_service = Arc::new(LockService::new(Arc::clone(&room_repo), &config.lock));
    let allocation_service = Arc::new(AllocationService::new(
        Arc::clone(&allocation_repo),
        Arc::clone(&room_repo),
        Arc::clone(&user_repo),
        Arc::clone(&notification_service),
        Arc::clone(&audit_service),
    ));
    let attendance_service = Arc::new(AttendanceService::new(
        Arc::clone(&user_repo),
        Arc::clone(&attendance_repo),
        Arc::clone(&used_token_repo),
        Arc::clone(&jwt_encoder),
        Arc::clone(&jwt_decoder),
        Arc::clone(&notification_service),
    ));

    let state = AppState {
        config: Arc::new(config),
        db_pool,
        jwt_encoder,
        jwt_decoder,
        room_service,
        lock_service,
        allocation_service,
        attendance_service,
        notification_service,
        audit_service,
    };

    build_router(state)
}

/// Run the DormHub server with the given configuration and pool.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> Result<(), AppError> {
    let addr = config.server.bind_address();
    let app = build_app(config, db_pool);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("DormHub server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
    }
}
