//! Notification dispatch and inbox management.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use dormhub_core::error::AppError;
use dormhub_core::types::pagination::{PageRequest, PageResponse};
use dormhub_database::repositories::notification::NotificationRepository;
use dormhub_entity::notification::Notification;

use crate::context::RequestContext;

/// Manages user notifications.
#[derive(Debug, Clone)]
pub struct NotificationService {
    /// Notification repository.
    notif_repo: Arc<NotificationRepository>,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(notif_repo: Arc<NotificationRepository>) -> Self {
        Self { notif_repo }
    }

    /// Deliver a notification, fire-and-forget.
    ///
    /// Delivery failure must never abort the calling operation; it is
    /// logged and discarded.
    pub async fn notify(&self, recipient_id: Uuid, title: &str, message: &str, kind: &str) {
        if let Err(e) = self
            .notif_repo
            .create(recipient_id, title, message, kind)
            .await
        {
            warn!(recipient = %recipient_id, error = %e, "Failed to deliver notification");
        }
    }

    /// Lists notifications for the current user.
    pub async fn list_notifications(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<Notification>, AppError> {
        self.notif_repo.find_by_user(ctx.user_id, &page).await
    }

    /// Gets the unread notification count.
    pub async fn unread_count(&self, ctx: &RequestContext) -> Result<i64, AppError> {
        self.notif_repo.count_unread(ctx.user_id).await
    }

    /// Marks a notification as read.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        notification_id: Uuid,
    ) -> Result<(), AppError> {
        let marked = self
            .notif_repo
            .mark_read(notification_id, ctx.user_id, Utc::now())
            .await?;
        if !marked {
            return Err(AppError::not_found("Notification not found"));
        }
        Ok(())
    }
}
