//! Room repository implementation.
//!
//! All lock and occupancy mutations are conditional single-statement
//! updates: the WHERE clause re-states the expected prior state, so two
//! racing writers cannot both observe success. Status is recomputed in
//! the same statement as the occupancy change (the SQL mirror of
//! `derive_room_status`).

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use dormhub_core::error::{AppError, ErrorKind};
use dormhub_core::result::AppResult;
use dormhub_core::types::pagination::{PageRequest, PageResponse};
use dormhub_entity::room::{CreateRoom, Room};

/// Repository for room CRUD, lock, and occupancy operations.
#[derive(Debug, Clone)]
pub struct RoomRepository {
    pool: PgPool,
}

impl RoomRepository {
    /// Create a new room repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a room by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Room>> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find room", e))
    }

    /// Find a room by its human-facing number.
    pub async fn find_by_number(&self, room_number: &str) -> AppResult<Option<Room>> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE room_number = $1")
            .bind(room_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find room by number", e)
            })
    }

    /// Find the room a student currently occupies.
    pub async fn find_by_occupant(&self, student_id: Uuid) -> AppResult<Option<Room>> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE occupants @> ARRAY[$1]::UUID[]")
            .bind(student_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find room by occupant", e)
            })
    }

    /// Create a room.
    pub async fn create(&self, room: &CreateRoom) -> AppResult<Room> {
        sqlx::query_as::<_, Room>(
            "INSERT INTO rooms (room_number, block, room_type, capacity) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&room.room_number)
        .bind(&room.block)
        .bind(&room.room_type)
        .bind(room.capacity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.constraint() == Some("rooms_room_number_key") => {
                AppError::conflict(format!("Room {} already exists", room.room_number))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create room", e),
        })
    }

    /// List rooms with pagination, ordered by room number.
    pub async fn list(&self, page: &PageRequest) -> AppResult<PageResponse<Room>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rooms")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count rooms", e))?;

        let rooms = sqlx::query_as::<_, Room>(
            "SELECT * FROM rooms ORDER BY room_number LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list rooms", e))?;

        Ok(PageResponse::new(
            rooms,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// Attempt to acquire the reservation lock for a student.
    ///
    /// Succeeds only if the room is not in maintenance, has a free bed,
    /// and is not validly locked by someone else. An expired lock is
    /// overwritten. Returns `None` when another writer holds the room;
    /// the caller re-reads to diagnose the exact refusal.
    pub async fn try_acquire_lock(
        &self,
        room_id: Uuid,
        student_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> AppResult<Option<Room>> {
        sqlx::query_as::<_, Room>(
            "UPDATE rooms SET \
                 status = 'locked', \
                 locked_by = $2, \
                 lock_expires_at = $3, \
                 updated_at = NOW() \
             WHERE id = $1 \
               AND status <> 'maintenance' \
               AND cardinality(occupants) < capacity \
               AND (status <> 'locked' OR lock_expires_at <= NOW() OR locked_by = $2) \
             RETURNING *",
        )
        .bind(room_id)
        .bind(student_id)
        .bind(expires_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to acquire room lock", e))
    }

    /// Clear the lock fields for `holder` and recompute status.
    ///
    /// Called unconditionally when an allocation referencing the lock is
    /// decided, whatever the outcome, so locks never outlive their
    /// request. The guard only clears the holder's own lock (or a lapsed
    /// or absent one): if the lock lapsed and another student validly
    /// re-acquired the room in the meantime, their hold survives. Returns
    /// `None` when the guard leaves a successor's live lock untouched.
    pub async fn release_lock(&self, room_id: Uuid, holder: Uuid) -> AppResult<Option<Room>> {
        sqlx::query_as::<_, Room>(
            "UPDATE rooms SET \
                 locked_by = NULL, \
                 lock_expires_at = NULL, \
                 status = CASE \
                     WHEN status = 'maintenance' THEN 'maintenance'::room_status \
                     WHEN cardinality(occupants) >= capacity THEN 'full'::room_status \
                     ELSE 'available'::room_status \
                 END, \
                 updated_at = NOW() \
             WHERE id = $1 \
               AND (locked_by = $2 OR locked_by IS NULL OR lock_expires_at <= NOW()) \
             RETURNING *",
        )
        .bind(room_id)
        .bind(holder)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to release room lock", e))
    }

    /// Add a student to a room's occupants, guarding on capacity and
    /// duplicate membership, and recompute status. Clears any lock fields
    /// in the same statement. Returns `None` if the guard failed.
    ///
    /// Takes an executor so the allocation workflow can run it inside its
    /// decision transaction.
    pub async fn add_occupant<'e>(
        executor: impl sqlx::PgExecutor<'e>,
        room_id: Uuid,
        student_id: Uuid,
    ) -> AppResult<Option<Room>> {
        sqlx::query_as::<_, Room>(
            "UPDATE rooms SET \
                 occupants = array_append(occupants, $2), \
                 status = CASE \
                     WHEN cardinality(occupants) + 1 >= capacity THEN 'full'::room_status \
                     ELSE 'available'::room_status \
                 END, \
                 locked_by = NULL, \
                 lock_expires_at = NULL, \
                 updated_at = NOW() \
             WHERE id = $1 \
               AND status <> 'maintenance' \
               AND cardinality(occupants) < capacity \
               AND NOT (occupants @> ARRAY[$2]::UUID[]) \
             RETURNING *",
        )
        .bind(room_id)
        .bind(student_id)
        .fetch_optional(executor)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to add occupant", e))
    }

    /// Remove a student from a room's occupants and recompute status
    /// (demoting `full` back to `available` when a bed frees up).
    pub async fn remove_occupant<'e>(
        executor: impl sqlx::PgExecutor<'e>,
        room_id: Uuid,
        student_id: Uuid,
    ) -> AppResult<Option<Room>> {
        sqlx::query_as::<_, Room>(
            "UPDATE rooms SET \
                 occupants = array_remove(occupants, $2), \
                 status = CASE \
                     WHEN status = 'maintenance' THEN 'maintenance'::room_status \
                     WHEN cardinality(array_remove(occupants, $2)) >= capacity THEN 'full'::room_status \
                     WHEN locked_by IS NOT NULL AND lock_expires_at > NOW() THEN 'locked'::room_status \
                     ELSE 'available'::room_status \
                 END, \
                 updated_at = NOW() \
             WHERE id = $1 \
               AND occupants @> ARRAY[$2]::UUID[] \
             RETURNING *",
        )
        .bind(room_id)
        .bind(student_id)
        .fetch_optional(executor)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to remove occupant", e))
    }
}
