//! Audit trail recording.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use dormhub_core::error::AppError;
use dormhub_core::types::pagination::{PageRequest, PageResponse};
use dormhub_database::repositories::audit::AuditLogRepository;
use dormhub_entity::audit::{AuditLogEntry, CreateAuditLogEntry};

use crate::context::RequestContext;

/// Records admin decisions in the audit log.
#[derive(Debug, Clone)]
pub struct AuditService {
    /// Audit log repository.
    audit_repo: Arc<AuditLogRepository>,
}

impl AuditService {
    /// Creates a new audit service.
    pub fn new(audit_repo: Arc<AuditLogRepository>) -> Self {
        Self { audit_repo }
    }

    /// Append an audit entry, best-effort.
    ///
    /// Audit failures are logged but never abort the decision that is
    /// being recorded.
    pub async fn record(
        &self,
        ctx: &RequestContext,
        action: &str,
        target_type: &str,
        target_id: Option<Uuid>,
        details: serde_json::Value,
    ) {
        let entry = CreateAuditLogEntry {
            actor_id: ctx.user_id,
            action: action.to_string(),
            target_type: target_type.to_string(),
            target_id,
            details: Some(details),
            ip_address: Some(ctx.ip_address.clone()),
        };
        if let Err(e) = self.audit_repo.create(&entry).await {
            warn!(action = %action, error = %e, "Failed to write audit entry");
        }
    }

    /// List audit entries (admin only).
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<AuditLogEntry>, AppError> {
        if !ctx.is_admin() {
            return Err(AppError::forbidden("Admin role required"));
        }
        self.audit_repo.list(&page).await
    }
}
