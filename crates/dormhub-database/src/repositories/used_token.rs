//! Used-token (consumed nonce) repository implementation.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use dormhub_core::config::attendance::AttendanceConfig;
use dormhub_core::error::{AppError, ErrorKind};
use dormhub_core::result::AppResult;

/// Repository for the single-use attendance nonce set.
///
/// A nonce row existing means the token was consumed. The primary key on
/// `nonce` carries the uniqueness guarantee: when two verifications race,
/// exactly one insert reports an affected row.
#[derive(Debug, Clone)]
pub struct UsedTokenRepository {
    pool: PgPool,
    /// How long consumed rows are kept. Exceeds the token TTL, so a nonce
    /// row always outlives the window in which its token still verifies.
    retention: Duration,
}

impl UsedTokenRepository {
    /// Create a new used-token repository.
    pub fn new(pool: PgPool, config: &AttendanceConfig) -> Self {
        Self {
            pool,
            retention: Duration::seconds(config.used_token_retention_seconds as i64),
        }
    }

    /// Try to consume a nonce. Returns `true` if this call won the insert
    /// (first use), `false` if the nonce was already consumed.
    ///
    /// Rows past their retention are purged opportunistically here, so
    /// the set self-prunes without an application timer.
    pub async fn consume(&self, nonce: Uuid) -> AppResult<bool> {
        sqlx::query("DELETE FROM used_tokens WHERE expires_at < NOW()")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge expired nonces", e)
            })?;

        let result = sqlx::query(
            "INSERT INTO used_tokens (nonce, expires_at) VALUES ($1, $2) \
             ON CONFLICT (nonce) DO NOTHING",
        )
        .bind(nonce)
        .bind(Utc::now() + self.retention)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to consume nonce", e))?;

        Ok(result.rows_affected() == 1)
    }
}
