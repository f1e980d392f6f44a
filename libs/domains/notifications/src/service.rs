use domain_activity_log::{EntityStatus, LogData, LogEvent, LogKind, LogWriter};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{NotificationError, NotificationResult};
use crate::models::{CreateNotification, Notification, NotificationFilter};
use crate::repository::NotificationRepository;

/// Service layer for in-app notifications.
#[derive(Clone)]
pub struct NotificationService {
    repository: Arc<dyn NotificationRepository>,
    logs: LogWriter,
}

impl NotificationService {
    pub fn new(repository: Arc<dyn NotificationRepository>, logs: LogWriter) -> Self {
        Self { repository, logs }
    }

    async fn record_activity(
        &self,
        event: LogEvent,
        kind: LogKind,
        actor: Option<Uuid>,
        data: LogData,
    ) {
        if let Err(e) = self.logs.record(event, kind, actor, data).await {
            tracing::warn!(error = %e, "Failed to record activity entry");
        }
    }

    fn log_data(notification: &Notification) -> LogData {
        LogData::Notification {
            notification_id: notification.id,
            title: notification.title.clone(),
        }
    }

    pub async fn create_notification(
        &self,
        input: CreateNotification,
        actor: Option<Uuid>,
    ) -> NotificationResult<Notification> {
        input
            .validate()
            .map_err(|e| NotificationError::Validation(e.to_string()))?;

        let notification = self.repository.create(input).await?;

        self.record_activity(
            LogEvent::NotificationCreation,
            LogKind::Create,
            actor,
            Self::log_data(&notification),
        )
        .await;

        Ok(notification)
    }

    pub async fn get_notification(&self, id: Uuid) -> NotificationResult<Notification> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(NotificationError::NotFound(id))
    }

    pub async fn list_notifications(
        &self,
        filter: NotificationFilter,
        rows_per_page: u64,
    ) -> NotificationResult<(Vec<Notification>, u64)> {
        self.repository.list(&filter, rows_per_page).await
    }

    pub async fn delete_notification(
        &self,
        id: Uuid,
        actor: Option<Uuid>,
    ) -> NotificationResult<()> {
        let notification = self.get_notification(id).await?;

        if !self.repository.soft_delete(id).await? {
            return Err(NotificationError::NotFound(id));
        }

        self.record_activity(
            LogEvent::NotificationDeletion,
            LogKind::Delete,
            actor,
            Self::log_data(&notification),
        )
        .await;

        Ok(())
    }

    pub async fn activate_notification(&self, id: Uuid) -> NotificationResult<Notification> {
        if !self.repository.set_status(id, EntityStatus::Active).await? {
            return Err(NotificationError::NotFound(id));
        }
        self.get_notification(id).await
    }

    pub async fn deactivate_notification(&self, id: Uuid) -> NotificationResult<Notification> {
        if !self
            .repository
            .set_status(id, EntityStatus::Inactive)
            .await?
        {
            return Err(NotificationError::NotFound(id));
        }
        self.get_notification(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryNotificationRepository;
    use domain_activity_log::{InMemoryLogRepository, LogFilter, LogRepository};

    fn service_with_logs() -> (NotificationService, Arc<InMemoryLogRepository>) {
        let logs = Arc::new(InMemoryLogRepository::new());
        let service = NotificationService::new(
            Arc::new(InMemoryNotificationRepository::new()),
            LogWriter::new(logs.clone()),
        );
        (service, logs)
    }

    #[tokio::test]
    async fn test_lifecycle_and_deletion_logging() {
        let (service, logs) = service_with_logs();

        let notification = service
            .create_notification(
                CreateNotification {
                    title: "Maintenance window".to_string(),
                    body: "Saturday 02:00-04:00 UTC".to_string(),
                },
                None,
            )
            .await
            .unwrap();

        let paused = service
            .deactivate_notification(notification.id)
            .await
            .unwrap();
        assert_eq!(paused.status, EntityStatus::Inactive);

        service
            .delete_notification(notification.id, None)
            .await
            .unwrap();

        let filter = LogFilter {
            event: Some(LogEvent::NotificationDeletion),
            ..Default::default()
        };
        let (entries, total) = logs.list(&filter, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(
            entries[0].data,
            LogData::Notification {
                notification_id: notification.id,
                title: "Maintenance window".to_string()
            }
        );

        // Deleted notifications cannot be reactivated outside the undo engine
        let result = service.activate_notification(notification.id).await;
        assert!(matches!(result, Err(NotificationError::NotFound(_))));
    }
}
