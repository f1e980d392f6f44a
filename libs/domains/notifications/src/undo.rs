use async_trait::async_trait;
use domain_activity_log::{
    LogData, LogEntry, LogEvent, RestoreOutcome, UndoError, UndoHandler, UndoResult,
};
use std::sync::Arc;

use crate::repository::NotificationRepository;

/// Reverses a NOTIFICATION_DELETION entry.
pub struct NotificationUndoHandler {
    repository: Arc<dyn NotificationRepository>,
}

impl NotificationUndoHandler {
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl UndoHandler for NotificationUndoHandler {
    async fn restore(&self, entry: &LogEntry) -> UndoResult<RestoreOutcome> {
        let LogData::Notification {
            notification_id, ..
        } = &entry.data
        else {
            return Err(UndoError::MissingReference(entry.id));
        };

        let restored = self
            .repository
            .restore(*notification_id)
            .await
            .map_err(|e| UndoError::Store(e.to_string()))?;

        if restored {
            Ok(RestoreOutcome::Restored {
                undelete_event: LogEvent::UndeleteNotification,
                data: entry.data.clone(),
            })
        } else {
            Ok(RestoreOutcome::Stale)
        }
    }
}
