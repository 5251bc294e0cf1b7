//! User repository implementation.
//!
//! DormHub does not provision accounts; it only reads users and performs
//! the two conditional writes the attendance subsystem needs (device
//! binding and the presence toggle).

use sqlx::PgPool;
use uuid::Uuid;

use dormhub_core::error::{AppError, ErrorKind};
use dormhub_core::result::AppResult;
use dormhub_entity::user::{User, UserRole};

/// Repository for user lookups and attendance-related writes.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }

    /// Find a user by username.
    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by username", e)
            })
    }

    /// List users holding the given role.
    pub async fn find_by_role(&self, role: UserRole) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE role = $1 ORDER BY username")
            .bind(role)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find users by role", e)
            })
    }

    /// Bind a device identifier on first use. The `device_id IS NULL`
    /// guard makes concurrent first issues single-winner; returns whether
    /// this call did the binding.
    pub async fn bind_device(&self, user_id: Uuid, device_id: &str) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET device_id = $2, updated_at = NOW() \
             WHERE id = $1 AND device_id IS NULL",
        )
        .bind(user_id)
        .bind(device_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to bind device", e))?;
        Ok(result.rows_affected() == 1)
    }

    /// Atomically flip the presence flag and return its new value.
    pub async fn toggle_presence(&self, user_id: Uuid) -> AppResult<Option<bool>> {
        sqlx::query_scalar::<_, bool>(
            "UPDATE users SET is_inside = NOT is_inside, updated_at = NOW() \
             WHERE id = $1 RETURNING is_inside",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to toggle presence", e))
    }
}
