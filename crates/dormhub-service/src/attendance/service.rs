//! Attendance token issuer and verifier.
//!
//! Issuance binds the student to one device on first use and mints a
//! 30–40 second signed token with a fresh nonce. Verification consumes
//! the nonce exactly once, re-checks the device binding against the
//! current user record, and flips the presence flag. Two consecutive
//! scans simply alternate state: there is no hardware direction signal,
//! so last-scan-wins.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use dormhub_auth::jwt::{AttendanceTokenGrant, JwtDecoder, JwtEncoder};
use dormhub_core::error::AppError;
use dormhub_core::types::pagination::{PageRequest, PageResponse};
use dormhub_database::repositories::attendance::AttendanceRepository;
use dormhub_database::repositories::used_token::UsedTokenRepository;
use dormhub_database::repositories::user::UserRepository;
use dormhub_entity::attendance::{AttendanceLog, Direction};

use crate::context::RequestContext;
use crate::notification::NotificationService;

/// Outcome of a successful gate scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    /// The scanned student.
    pub student_id: Uuid,
    /// The student's display name, for the scanner UI.
    pub display_name: String,
    /// Derived scan direction.
    pub direction: Direction,
    /// Presence after the toggle.
    pub is_inside: bool,
    /// When the scan was recorded.
    pub scanned_at: DateTime<Utc>,
}

/// Issues attendance tokens and verifies them at the gate.
#[derive(Debug, Clone)]
pub struct AttendanceService {
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Attendance log repository.
    attendance_repo: Arc<AttendanceRepository>,
    /// Consumed-nonce repository.
    used_token_repo: Arc<UsedTokenRepository>,
    /// Token encoder.
    encoder: Arc<JwtEncoder>,
    /// Token decoder.
    decoder: Arc<JwtDecoder>,
    /// Notification dispatch (fire-and-forget).
    notifications: Arc<NotificationService>,
}

impl AttendanceService {
    /// Creates a new attendance service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        attendance_repo: Arc<AttendanceRepository>,
        used_token_repo: Arc<UsedTokenRepository>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            user_repo,
            attendance_repo,
            used_token_repo,
            encoder,
            decoder,
            notifications,
        }
    }

    /// Issue a fresh attendance token for the current student.
    ///
    /// The first call binds the presenting device (trust-on-first-use);
    /// every later call must present the same device identifier. The
    /// binding write is conditional on `device_id IS NULL`, so two
    /// racing first calls cannot bind different devices.
    pub async fn issue_token(
        &self,
        ctx: &RequestContext,
    ) -> Result<AttendanceTokenGrant, AppError> {
        let device_id = ctx
            .device_id
            .as_deref()
            .ok_or_else(|| AppError::validation("Missing device identifier"))?;

        let user = self
            .user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let bound = match user.device_id.as_deref() {
            Some(bound) => bound.to_string(),
            None => {
                if self.user_repo.bind_device(user.id, device_id).await? {
                    info!(student = %user.id, "Device bound on first token request");
                    device_id.to_string()
                } else {
                    // Lost the binding race; use whatever won.
                    self.user_repo
                        .find_by_id(user.id)
                        .await?
                        .and_then(|u| u.device_id)
                        .ok_or_else(|| AppError::internal("Device binding disappeared"))?
                }
            }
        };

        if bound != device_id {
            return Err(AppError::forbidden(
                "Token requests are limited to your registered device",
            ));
        }

        self.encoder.generate_attendance_token(user.id, device_id)
    }

    /// Verify a presented token and toggle the student's presence.
    ///
    /// Check order is fixed: authenticity and freshness first, then the
    /// single-use nonce (the insert into the used set has exactly one
    /// winner under races), then the device binding. Consumed nonce rows
    /// live for the configured retention, longer than the token TTL, so
    /// the set self-prunes without ever forgetting a still-valid token.
    pub async fn scan(&self, ctx: &RequestContext, token: &str) -> Result<ScanResult, AppError> {
        if !ctx.can_scan() {
            return Err(AppError::forbidden("Scanner role required"));
        }

        let claims = self.decoder.decode_attendance_token(token)?;

        let fresh = self.used_token_repo.consume(claims.nonce()).await?;
        if !fresh {
            return Err(AppError::conflict("Token already used"));
        }

        let student = self
            .user_repo
            .find_by_id(claims.student_id())
            .await?
            .ok_or_else(|| AppError::not_found("Student not found"))?;

        if !student.device_matches(&claims.device_id) {
            // Token minted for a device that is no longer bound: a
            // shared or replayed credential.
            return Err(AppError::forbidden("Token does not match registered device"));
        }

        let is_inside = self
            .user_repo
            .toggle_presence(student.id)
            .await?
            .ok_or_else(|| AppError::not_found("Student not found"))?;
        let direction = Direction::from_new_presence(is_inside);

        let log = self
            .attendance_repo
            .create(student.id, direction, ctx.user_id)
            .await?;

        info!(
            student = %student.id,
            direction = ?direction,
            scanner = %ctx.user_id,
            "Attendance scan recorded"
        );

        self.notifications
            .notify(
                student.id,
                "Gate scan recorded",
                &format!(
                    "You were scanned {} the hostel",
                    match direction {
                        Direction::Entry => "into",
                        Direction::Exit => "out of",
                    }
                ),
                "attendance",
            )
            .await;

        Ok(ScanResult {
            student_id: student.id,
            display_name: student.display_name,
            direction,
            is_inside,
            scanned_at: log.scanned_at,
        })
    }

    /// List the current student's scan history.
    pub async fn my_history(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<AttendanceLog>, AppError> {
        self.attendance_repo
            .list_by_student(ctx.user_id, &page)
            .await
    }

    /// List all scans (admin only).
    pub async fn list_all(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<AttendanceLog>, AppError> {
        if !ctx.is_admin() {
            return Err(AppError::forbidden("Admin role required"));
        }
        self.attendance_repo.list(&page).await
    }
}
