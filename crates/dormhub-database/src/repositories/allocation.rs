//! Allocation repository implementation.
//!
//! The one-pending-per-student rule is enforced by the partial unique
//! index `allocations_one_pending_per_student`; creation maps that
//! violation to `Conflict` rather than checking first. Approval commits
//! every room/user/allocation write in one transaction so a failure at
//! any step leaves nothing half-applied.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use dormhub_core::error::{AppError, ErrorKind};
use dormhub_core::result::AppResult;
use dormhub_core::types::pagination::{PageRequest, PageResponse};
use dormhub_entity::allocation::{Allocation, AllocationStatus, CreateAllocation};
use dormhub_entity::room::Room;

use super::room::RoomRepository;

/// Repository for allocation request persistence and decisions.
#[derive(Debug, Clone)]
pub struct AllocationRepository {
    pool: PgPool,
}

impl AllocationRepository {
    /// Create a new allocation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an allocation by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Allocation>> {
        sqlx::query_as::<_, Allocation>("SELECT * FROM allocations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find allocation", e))
    }

    /// Find a student's pending allocation, if any.
    pub async fn find_pending_by_student(&self, student_id: Uuid) -> AppResult<Option<Allocation>> {
        sqlx::query_as::<_, Allocation>(
            "SELECT * FROM allocations WHERE student_id = $1 AND status = 'pending'",
        )
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find pending allocation", e)
        })
    }

    /// Create a new pending allocation request.
    pub async fn create(&self, allocation: &CreateAllocation) -> AppResult<Allocation> {
        sqlx::query_as::<_, Allocation>(
            "INSERT INTO allocations \
                 (student_id, request_type, requested_block, requested_room_type, reason, locked_room_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(allocation.student_id)
        .bind(allocation.request_type)
        .bind(&allocation.requested_block)
        .bind(&allocation.requested_room_type)
        .bind(&allocation.reason)
        .bind(allocation.locked_room_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db)
                if db.constraint() == Some("allocations_one_pending_per_student") =>
            {
                AppError::conflict("A pending allocation request already exists")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create allocation", e),
        })
    }

    /// List a student's allocation requests, newest first.
    pub async fn list_by_student(
        &self,
        student_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Allocation>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM allocations WHERE student_id = $1")
                .bind(student_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count allocations", e)
                })?;

        let allocations = sqlx::query_as::<_, Allocation>(
            "SELECT * FROM allocations WHERE student_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(student_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list allocations", e))?;

        Ok(PageResponse::new(
            allocations,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List pending requests for the admin queue, oldest first.
    pub async fn list_pending(&self, page: &PageRequest) -> AppResult<PageResponse<Allocation>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM allocations WHERE status = 'pending'")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count pending", e)
                })?;

        let allocations = sqlx::query_as::<_, Allocation>(
            "SELECT * FROM allocations WHERE status = 'pending' \
             ORDER BY created_at ASC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list pending allocations", e)
        })?;

        Ok(PageResponse::new(
            allocations,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Reject a pending allocation. The `status = 'pending'` guard makes
    /// concurrent decisions on the same request single-winner.
    pub async fn reject(
        &self,
        allocation_id: Uuid,
        decided_by: Uuid,
        admin_comment: Option<&str>,
    ) -> AppResult<Option<Allocation>> {
        sqlx::query_as::<_, Allocation>(
            "UPDATE allocations SET \
                 status = 'rejected', \
                 admin_comment = $2, \
                 decided_by = $3, \
                 decided_at = $4, \
                 updated_at = NOW() \
             WHERE id = $1 AND status = 'pending' \
             RETURNING *",
        )
        .bind(allocation_id)
        .bind(admin_comment)
        .bind(decided_by)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to reject allocation", e))
    }

    /// Approve a pending allocation and commit the room assignment.
    ///
    /// Runs the whole decision as one transaction: vacate the previous
    /// room (change/swap), add the student to the target room under the
    /// capacity guard, update the student's room reference, and flip the
    /// allocation to `approved`. Any step failing rolls the whole
    /// decision back.
    pub async fn approve_with_assignment(
        &self,
        allocation_id: Uuid,
        student_id: Uuid,
        target_room_id: Uuid,
        previous_room_id: Option<Uuid>,
        decided_by: Uuid,
        admin_comment: Option<&str>,
    ) -> AppResult<(Allocation, Room)> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        if let Some(previous) = previous_room_id {
            RoomRepository::remove_occupant(&mut *tx, previous, student_id)
                .await?
                .ok_or_else(|| {
                    AppError::conflict("Student is no longer an occupant of their previous room")
                })?;
        }

        let room = RoomRepository::add_occupant(&mut *tx, target_room_id, student_id)
            .await?
            .ok_or_else(|| AppError::conflict("Target room filled up concurrently"))?;

        sqlx::query("UPDATE users SET room_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(student_id)
            .bind(target_room_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update user room", e)
            })?;

        let allocation = sqlx::query_as::<_, Allocation>(
            "UPDATE allocations SET \
                 status = 'approved', \
                 assigned_room_id = $2, \
                 admin_comment = $3, \
                 decided_by = $4, \
                 decided_at = $5, \
                 updated_at = NOW() \
             WHERE id = $1 AND status = 'pending' \
             RETURNING *",
        )
        .bind(allocation_id)
        .bind(target_room_id)
        .bind(admin_comment)
        .bind(decided_by)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to approve allocation", e))?
        .ok_or_else(|| AppError::invalid_state("Allocation was decided concurrently"))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit decision", e)
        })?;

        debug_assert_eq!(allocation.status, AllocationStatus::Approved);
        Ok((allocation, room))
    }
}
