//! Time-boxed exclusive room reservation.
//!
//! A lock gives one student a 10-minute window to submit an allocation
//! request for a room before anyone else can claim it. Expiry is lazy:
//! nothing sweeps stale locks, readers treat them as absent and the next
//! acquirer overwrites them.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::info;
use uuid::Uuid;

use dormhub_core::config::lock::LockConfig;
use dormhub_core::error::AppError;
use dormhub_database::repositories::room::RoomRepository;
use dormhub_entity::room::{Room, RoomStatus};

use crate::context::RequestContext;

/// What acquiring a lock on a given room snapshot would do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// The lock can be granted (or an expired one overwritten).
    Grant,
    /// The caller already holds a live lock; succeed without rewriting
    /// it, so repeated taps do not extend the window.
    AlreadyHeld,
}

/// Decide whether `student_id` may lock this room right now.
///
/// Refusal order follows the operation contract: another student's live
/// lock refuses before capacity does.
pub fn evaluate_acquire(
    room: &Room,
    student_id: Uuid,
    now: DateTime<Utc>,
) -> Result<AcquireOutcome, AppError> {
    if room.status == RoomStatus::Maintenance {
        return Err(AppError::invalid_state(format!(
            "Room {} is under maintenance",
            room.room_number
        )));
    }
    if room.has_live_lock(now) {
        return if room.is_locked_by(student_id, now) {
            Ok(AcquireOutcome::AlreadyHeld)
        } else {
            Err(AppError::conflict(format!(
                "Room {} is locked by another student",
                room.room_number
            )))
        };
    }
    if room.is_at_capacity() {
        return Err(AppError::full(format!(
            "Room {} is at capacity",
            room.room_number
        )));
    }
    Ok(AcquireOutcome::Grant)
}

/// Grants and releases time-boxed room locks.
#[derive(Debug, Clone)]
pub struct LockService {
    /// Room repository.
    room_repo: Arc<RoomRepository>,
    /// How long a granted lock lasts.
    ttl: Duration,
}

impl LockService {
    /// Creates a new lock service.
    pub fn new(room_repo: Arc<RoomRepository>, config: &LockConfig) -> Self {
        Self {
            room_repo,
            ttl: Duration::minutes(config.ttl_minutes as i64),
        }
    }

    /// Acquire a reservation lock on a room for the requesting student.
    ///
    /// The snapshot evaluation gives precise refusals; the conditional
    /// update in the repository is the authority when two students race,
    /// in which case the loser's refusal is re-diagnosed from a fresh
    /// read. No notification is sent: reservations are silent.
    pub async fn acquire_lock(
        &self,
        ctx: &RequestContext,
        room_id: Uuid,
    ) -> Result<Room, AppError> {
        let now = Utc::now();
        let room = self
            .room_repo
            .find_by_id(room_id)
            .await?
            .ok_or_else(|| AppError::not_found("Room not found"))?;

        match evaluate_acquire(&room, ctx.user_id, now)? {
            AcquireOutcome::AlreadyHeld => Ok(room),
            AcquireOutcome::Grant => {
                let expires_at = now + self.ttl;
                match self
                    .room_repo
                    .try_acquire_lock(room_id, ctx.user_id, expires_at)
                    .await?
                {
                    Some(locked) => {
                        info!(
                            room = %locked.room_number,
                            student = %ctx.user_id,
                            expires_at = %expires_at,
                            "Room lock acquired"
                        );
                        Ok(locked)
                    }
                    // Lost the race; re-read for the exact refusal.
                    None => {
                        let current = self
                            .room_repo
                            .find_by_id(room_id)
                            .await?
                            .ok_or_else(|| AppError::not_found("Room not found"))?;
                        match evaluate_acquire(&current, ctx.user_id, Utc::now())? {
                            AcquireOutcome::AlreadyHeld => Ok(current),
                            AcquireOutcome::Grant => {
                                Err(AppError::conflict("Room was claimed concurrently"))
                            }
                        }
                    }
                }
            }
        }
    }
}
