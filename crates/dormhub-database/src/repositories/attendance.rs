//! Attendance log repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use dormhub_core::error::{AppError, ErrorKind};
use dormhub_core::result::AppResult;
use dormhub_core::types::pagination::{PageRequest, PageResponse};
use dormhub_entity::attendance::{AttendanceLog, Direction};

/// Repository for attendance scan records.
#[derive(Debug, Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    /// Create a new attendance repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a successful scan.
    pub async fn create(
        &self,
        student_id: Uuid,
        direction: Direction,
        scanned_by: Uuid,
    ) -> AppResult<AttendanceLog> {
        sqlx::query_as::<_, AttendanceLog>(
            "INSERT INTO attendance_logs (student_id, direction, scanned_by) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(student_id)
        .bind(direction)
        .bind(scanned_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record scan", e))
    }

    /// List a student's scans, newest first.
    pub async fn list_by_student(
        &self,
        student_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AttendanceLog>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM attendance_logs WHERE student_id = $1")
                .bind(student_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count scans", e)
                })?;

        let logs = sqlx::query_as::<_, AttendanceLog>(
            "SELECT * FROM attendance_logs WHERE student_id = $1 \
             ORDER BY scanned_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(student_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list scans", e))?;

        Ok(PageResponse::new(
            logs,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List all scans, newest first (admin view).
    pub async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<AttendanceLog>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM attendance_logs")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count scans", e))?;

        let logs = sqlx::query_as::<_, AttendanceLog>(
            "SELECT * FROM attendance_logs ORDER BY scanned_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list scans", e))?;

        Ok(PageResponse::new(
            logs,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
