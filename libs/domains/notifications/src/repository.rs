use async_trait::async_trait;
use domain_activity_log::{DeletedBy, EntityStatus};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::NotificationResult;
use crate::models::{CreateNotification, Notification, NotificationFilter};

/// Repository trait for Notification persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, input: CreateNotification) -> NotificationResult<Notification>;

    async fn get_by_id(&self, id: Uuid) -> NotificationResult<Option<Notification>>;

    async fn list(
        &self,
        filter: &NotificationFilter,
        rows_per_page: u64,
    ) -> NotificationResult<(Vec<Notification>, u64)>;

    /// Flip status between Active/Inactive. Never touches deleted rows.
    async fn set_status(&self, id: Uuid, status: EntityStatus) -> NotificationResult<bool>;

    /// Mark directly deleted. Returns false if already deleted.
    async fn soft_delete(&self, id: Uuid) -> NotificationResult<bool>;

    /// Reverse a direct deletion. Returns false unless the row is
    /// exactly (Deleted, Direct).
    async fn restore(&self, id: Uuid) -> NotificationResult<bool>;
}

/// In-memory implementation (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryNotificationRepository {
    notifications: Arc<RwLock<HashMap<Uuid, Notification>>>,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn create(&self, input: CreateNotification) -> NotificationResult<Notification> {
        let now = chrono::Utc::now();
        let notification = Notification {
            id: Uuid::now_v7(),
            title: input.title,
            body: input.body,
            status: EntityStatus::Active,
            deleted_by: DeletedBy::None,
            created_at: now,
            updated_at: now,
        };

        self.notifications
            .write()
            .await
            .insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn get_by_id(&self, id: Uuid) -> NotificationResult<Option<Notification>> {
        Ok(self.notifications.read().await.get(&id).cloned())
    }

    async fn list(
        &self,
        filter: &NotificationFilter,
        rows_per_page: u64,
    ) -> NotificationResult<(Vec<Notification>, u64)> {
        let notifications = self.notifications.read().await;

        let mut result: Vec<Notification> = notifications
            .values()
            .filter(|n| filter.status.is_none_or(|s| n.status == s))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.id.cmp(&a.id));

        let total = result.len() as u64;
        let offset = (filter.page.max(1) - 1) * rows_per_page;
        let page = result
            .into_iter()
            .skip(offset as usize)
            .take(rows_per_page as usize)
            .collect();

        Ok((page, total))
    }

    async fn set_status(&self, id: Uuid, status: EntityStatus) -> NotificationResult<bool> {
        let mut notifications = self.notifications.write().await;
        match notifications.get_mut(&id).filter(|n| n.status.is_live()) {
            Some(notification) => {
                notification.status = status;
                notification.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn soft_delete(&self, id: Uuid) -> NotificationResult<bool> {
        let mut notifications = self.notifications.write().await;
        match notifications.get_mut(&id).filter(|n| n.status.is_live()) {
            Some(notification) => {
                notification.status = EntityStatus::Deleted;
                notification.deleted_by = DeletedBy::Direct;
                notification.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn restore(&self, id: Uuid) -> NotificationResult<bool> {
        let mut notifications = self.notifications.write().await;
        match notifications
            .get_mut(&id)
            .filter(|n| n.status == EntityStatus::Deleted && n.deleted_by == DeletedBy::Direct)
        {
            Some(notification) => {
                notification.status = EntityStatus::Active;
                notification.deleted_by = DeletedBy::None;
                notification.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
