//! Allocation workflow: pending requests and admin decisions.
//!
//! A request moves `pending → approved | rejected` and never back. The
//! decision path releases the referenced room lock whatever the outcome,
//! then (on approval) commits all occupancy writes in one repository
//! transaction.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use dormhub_core::error::AppError;
use dormhub_core::types::pagination::{PageRequest, PageResponse};
use dormhub_database::repositories::allocation::AllocationRepository;
use dormhub_database::repositories::room::RoomRepository;
use dormhub_database::repositories::user::UserRepository;
use dormhub_entity::allocation::{Allocation, AllocationStatus, CreateAllocation, RequestType};
use dormhub_entity::room::{Room, RoomStatus};
use dormhub_entity::user::UserRole;

use crate::audit::AuditService;
use crate::context::RequestContext;
use crate::notification::NotificationService;

/// A student's allocation request as submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRequest {
    /// Nature of the request.
    pub request_type: RequestType,
    /// Preferred hostel block.
    pub requested_block: Option<String>,
    /// Preferred room type.
    pub requested_room_type: Option<String>,
    /// Free-text justification.
    pub reason: Option<String>,
    /// A room the student locked beforehand, if any.
    pub locked_room_id: Option<Uuid>,
}

/// Check that a referenced lock is live and owned by the requester at
/// submission time. A lock that was held earlier but has lapsed does not
/// count.
pub fn validate_lock_reference(
    room: &Room,
    student_id: Uuid,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    if room.status == RoomStatus::Locked && room.is_locked_by(student_id, now) {
        Ok(())
    } else {
        Err(AppError::invalid_state(format!(
            "Room {} is not currently locked by you",
            room.room_number
        )))
    }
}

/// Resolve the room an approval assigns: the admin's explicit choice
/// wins, otherwise the room the student locked.
pub fn resolve_target_room(explicit: Option<Uuid>, allocation: &Allocation) -> Option<Uuid> {
    explicit.or(allocation.locked_room_id)
}

/// Check that a room can take the student right now.
pub fn validate_assignment_target(room: &Room, student_id: Uuid) -> Result<(), AppError> {
    if room.status == RoomStatus::Maintenance {
        return Err(AppError::invalid_state(format!(
            "Room {} is under maintenance",
            room.room_number
        )));
    }
    if room.occupants.contains(&student_id) {
        return Err(AppError::conflict(format!(
            "Student already occupies room {}",
            room.room_number
        )));
    }
    if room.is_at_capacity() {
        return Err(AppError::conflict(format!(
            "Room {} is at capacity",
            room.room_number
        )));
    }
    Ok(())
}

/// Manages allocation requests and admin decisions.
#[derive(Debug, Clone)]
pub struct AllocationService {
    /// Allocation repository.
    allocation_repo: Arc<AllocationRepository>,
    /// Room repository.
    room_repo: Arc<RoomRepository>,
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Notification dispatch (fire-and-forget).
    notifications: Arc<NotificationService>,
    /// Audit trail (best-effort).
    audit: Arc<AuditService>,
}

impl AllocationService {
    /// Creates a new allocation service.
    pub fn new(
        allocation_repo: Arc<AllocationRepository>,
        room_repo: Arc<RoomRepository>,
        user_repo: Arc<UserRepository>,
        notifications: Arc<NotificationService>,
        audit: Arc<AuditService>,
    ) -> Self {
        Self {
            allocation_repo,
            room_repo,
            user_repo,
            notifications,
            audit,
        }
    }

    /// Submit a new allocation request for the current student.
    pub async fn request_allocation(
        &self,
        ctx: &RequestContext,
        request: AllocationRequest,
    ) -> Result<Allocation, AppError> {
        // Friendly pre-check; the partial unique index is the authority.
        if self
            .allocation_repo
            .find_pending_by_student(ctx.user_id)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "A pending allocation request already exists",
            ));
        }

        if let Some(locked_room_id) = request.locked_room_id {
            let room = self
                .room_repo
                .find_by_id(locked_room_id)
                .await?
                .ok_or_else(|| AppError::not_found("Locked room not found"))?;
            validate_lock_reference(&room, ctx.user_id, Utc::now())?;
        }

        let allocation = self
            .allocation_repo
            .create(&CreateAllocation {
                student_id: ctx.user_id,
                request_type: request.request_type,
                requested_block: request.requested_block,
                requested_room_type: request.requested_room_type,
                reason: request.reason,
                locked_room_id: request.locked_room_id,
            })
            .await?;

        info!(allocation = %allocation.id, student = %ctx.user_id, "Allocation request created");

        for admin in self.user_repo.find_by_role(UserRole::Admin).await? {
            self.notifications
                .notify(
                    admin.id,
                    "New allocation request",
                    &format!("{} submitted a room allocation request", ctx.username),
                    "allocation",
                )
                .await;
        }

        Ok(allocation)
    }

    /// Get one allocation. Students may only see their own.
    pub async fn get_allocation(
        &self,
        ctx: &RequestContext,
        allocation_id: Uuid,
    ) -> Result<Allocation, AppError> {
        let allocation = self
            .allocation_repo
            .find_by_id(allocation_id)
            .await?
            .ok_or_else(|| AppError::not_found("Allocation not found"))?;
        if !ctx.is_admin() && allocation.student_id != ctx.user_id {
            return Err(AppError::forbidden("Not your allocation request"));
        }
        Ok(allocation)
    }

    /// List the current student's requests.
    pub async fn list_my_allocations(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<Allocation>, AppError> {
        self.allocation_repo
            .list_by_student(ctx.user_id, &page)
            .await
    }

    /// List the pending queue (admin only), oldest first.
    pub async fn list_pending(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<Allocation>, AppError> {
        if !ctx.is_admin() {
            return Err(AppError::forbidden("Admin role required"));
        }
        self.allocation_repo.list_pending(&page).await
    }

    /// Decide a pending allocation (admin only).
    ///
    /// Step one, whatever the outcome: release the referenced room lock
    /// so no lock outlives its request. Approval then resolves and
    /// validates the target room and commits the assignment
    /// transactionally. Notification and audit are best-effort.
    pub async fn update_allocation_status(
        &self,
        ctx: &RequestContext,
        allocation_id: Uuid,
        status: AllocationStatus,
        room_id: Option<Uuid>,
        admin_comment: Option<String>,
    ) -> Result<Allocation, AppError> {
        if !ctx.is_admin() {
            return Err(AppError::forbidden("Admin role required"));
        }
        if status == AllocationStatus::Pending {
            return Err(AppError::validation(
                "Decision must be approved or rejected",
            ));
        }

        let allocation = self
            .allocation_repo
            .find_by_id(allocation_id)
            .await?
            .ok_or_else(|| AppError::not_found("Allocation not found"))?;
        if !allocation.status.can_transition_to(status) {
            return Err(AppError::invalid_state(format!(
                "Allocation is already {}",
                allocation.status
            )));
        }

        // Lock release on every decision, approve or reject, so a rejected
        // request never leaves an orphaned lock behind. Keyed to the
        // requester: a successor who validly re-acquired the room after
        // this lock lapsed keeps their hold.
        if let Some(locked_room_id) = allocation.locked_room_id {
            self.room_repo
                .release_lock(locked_room_id, allocation.student_id)
                .await?;
        }

        let decided = match status {
            AllocationStatus::Approved => {
                self.approve(ctx, &allocation, room_id, admin_comment.as_deref())
                    .await?
            }
            AllocationStatus::Rejected => self
                .allocation_repo
                .reject(allocation.id, ctx.user_id, admin_comment.as_deref())
                .await?
                .ok_or_else(|| AppError::invalid_state("Allocation was decided concurrently"))?,
            AllocationStatus::Pending => unreachable!("validated above"),
        };

        info!(
            allocation = %decided.id,
            status = %decided.status,
            admin = %ctx.user_id,
            "Allocation decided"
        );

        self.notifications
            .notify(
                decided.student_id,
                "Allocation request decided",
                &format!("Your room allocation request was {}", decided.status),
                "allocation",
            )
            .await;
        self.audit
            .record(
                ctx,
                &format!("allocation.{}", decided.status),
                "allocation",
                Some(decided.id),
                serde_json::json!({
                    "assigned_room_id": decided.assigned_room_id,
                    "admin_comment": decided.admin_comment,
                }),
            )
            .await;

        Ok(decided)
    }

    async fn approve(
        &self,
        ctx: &RequestContext,
        allocation: &Allocation,
        explicit_room_id: Option<Uuid>,
        admin_comment: Option<&str>,
    ) -> Result<Allocation, AppError> {
        let target_room_id = resolve_target_room(explicit_room_id, allocation)
            .ok_or_else(|| AppError::not_found("No target room to assign"))?;
        let target = self
            .room_repo
            .find_by_id(target_room_id)
            .await?
            .ok_or_else(|| AppError::not_found("Target room not found"))?;
        validate_assignment_target(&target, allocation.student_id)?;

        let previous_room_id = if allocation.request_type.vacates_previous_room() {
            self.room_repo
                .find_by_occupant(allocation.student_id)
                .await?
                .map(|room| room.id)
        } else {
            None
        };

        let (decided, _room) = self
            .allocation_repo
            .approve_with_assignment(
                allocation.id,
                allocation.student_id,
                target_room_id,
                previous_room_id,
                ctx.user_id,
                admin_comment,
            )
            .await?;
        Ok(decided)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use dormhub_core::error::ErrorKind;

    fn room(capacity: i32, occupants: Vec<Uuid>) -> Room {
        let now = Utc::now();
        Room {
            id: Uuid::new_v4(),
            room_number: "C-310".to_string(),
            block: "C".to_string(),
            room_type: "triple".to_string(),
            capacity,
            occupants,
            status: RoomStatus::Available,
            locked_by: None,
            lock_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn allocation(locked_room_id: Option<Uuid>) -> Allocation {
        let now = Utc::now();
        Allocation {
            id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            request_type: RequestType::Initial,
            requested_block: None,
            requested_room_type: None,
            reason: None,
            locked_room_id,
            assigned_room_id: None,
            status: AllocationStatus::Pending,
            admin_comment: None,
            decided_by: None,
            decided_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_lock_reference_requires_live_own_lock() {
        let now = Utc::now();
        let student = Uuid::new_v4();
        let mut r = room(2, vec![]);

        // No lock at all.
        assert_eq!(
            validate_lock_reference(&r, student, now).unwrap_err().kind,
            ErrorKind::InvalidState
        );

        // Live lock held by the student.
        r.status = RoomStatus::Locked;
        r.locked_by = Some(student);
        r.lock_expires_at = Some(now + Duration::minutes(5));
        assert!(validate_lock_reference(&r, student, now).is_ok());

        // Lapsed lock: previously acquired is not enough.
        r.lock_expires_at = Some(now - Duration::seconds(1));
        assert_eq!(
            validate_lock_reference(&r, student, now).unwrap_err().kind,
            ErrorKind::InvalidState
        );

        // Someone else's lock.
        r.locked_by = Some(Uuid::new_v4());
        r.lock_expires_at = Some(now + Duration::minutes(5));
        assert_eq!(
            validate_lock_reference(&r, student, now).unwrap_err().kind,
            ErrorKind::InvalidState
        );
    }

    #[test]
    fn test_explicit_room_wins_over_locked_room() {
        let locked = Uuid::new_v4();
        let explicit = Uuid::new_v4();
        let alloc = allocation(Some(locked));
        assert_eq!(resolve_target_room(Some(explicit), &alloc), Some(explicit));
        assert_eq!(resolve_target_room(None, &alloc), Some(locked));
        assert_eq!(resolve_target_room(None, &allocation(None)), None);
    }

    #[test]
    fn test_assignment_target_capacity_conflict() {
        let occupant = Uuid::new_v4();
        let r = room(1, vec![occupant]);
        let err = validate_assignment_target(&r, Uuid::new_v4()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[test]
    fn test_assignment_target_maintenance() {
        let mut r = room(2, vec![]);
        r.status = RoomStatus::Maintenance;
        let err = validate_assignment_target(&r, Uuid::new_v4()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidState);
    }

    #[test]
    fn test_assignment_target_already_occupant() {
        let student = Uuid::new_v4();
        let r = room(2, vec![student]);
        let err = validate_assignment_target(&r, student).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[test]
    fn test_assignment_target_ok_below_capacity() {
        let r = room(2, vec![Uuid::new_v4()]);
        assert!(validate_assignment_target(&r, Uuid::new_v4()).is_ok());
    }
}
