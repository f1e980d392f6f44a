use async_trait::async_trait;
use domain_activity_log::{
    LogData, LogEntry, LogEvent, RestoreOutcome, UndoError, UndoHandler, UndoResult,
};
use std::sync::Arc;

use crate::repository::UserEventRepository;

/// Reverses an EVENT_DELETION entry. Single-entity restore from
/// (Deleted, Direct); cascade-deleted events come back with their
/// parent's undo instead.
pub struct EventUndoHandler {
    events: Arc<dyn UserEventRepository>,
}

impl EventUndoHandler {
    pub fn new(events: Arc<dyn UserEventRepository>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl UndoHandler for EventUndoHandler {
    async fn restore(&self, entry: &LogEntry) -> UndoResult<RestoreOutcome> {
        let LogData::Event { event_id, .. } = &entry.data else {
            return Err(UndoError::MissingReference(entry.id));
        };

        let restored = self
            .events
            .restore_direct(*event_id)
            .await
            .map_err(|e| UndoError::Store(e.to_string()))?;

        if restored {
            Ok(RestoreOutcome::Restored {
                undelete_event: LogEvent::UndeleteEvent,
                data: entry.data.clone(),
            })
        } else {
            Ok(RestoreOutcome::Stale)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateEvent;
    use crate::repository::InMemoryUserEventRepository;
    use chrono::Utc;
    use domain_activity_log::{EntityStatus, LogKind, ParentKind};
    use uuid::Uuid;

    fn entry_for(event_id: Uuid) -> LogEntry {
        LogEntry {
            id: Uuid::now_v7(),
            event: LogEvent::EventDeletion,
            kind: LogKind::Delete,
            actor: None,
            data: LogData::Event {
                event_id,
                user_id: Uuid::now_v7(),
                title: "Midterm review".to_string(),
            },
            un_delete: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_restores_directly_deleted_event() {
        let repo = Arc::new(InMemoryUserEventRepository::new());
        let event = repo
            .create(CreateEvent {
                user_id: Uuid::now_v7(),
                unit_id: Uuid::now_v7(),
                title: "Midterm review".to_string(),
                starts_at: Utc::now(),
            })
            .await
            .unwrap();
        repo.soft_delete(event.id).await.unwrap();

        let handler = EventUndoHandler::new(repo.clone());
        let outcome = handler.restore(&entry_for(event.id)).await.unwrap();

        assert!(matches!(outcome, RestoreOutcome::Restored { .. }));
        assert_eq!(
            repo.get_by_id(event.id).await.unwrap().unwrap().status,
            EntityStatus::Active
        );
    }

    #[tokio::test]
    async fn test_cascade_deleted_event_is_stale_for_direct_undo() {
        let repo = Arc::new(InMemoryUserEventRepository::new());
        let unit_id = Uuid::now_v7();
        let event = repo
            .create(CreateEvent {
                user_id: Uuid::now_v7(),
                unit_id,
                title: "Midterm review".to_string(),
                starts_at: Utc::now(),
            })
            .await
            .unwrap();
        repo.cascade_delete_for_units(&[unit_id], ParentKind::Unit, unit_id)
            .await
            .unwrap();

        // This event was deleted by its unit's cascade, not directly;
        // the direct-undo guard must refuse it.
        let handler = EventUndoHandler::new(repo);
        let outcome = handler.restore(&entry_for(event.id)).await.unwrap();
        assert_eq!(outcome, RestoreOutcome::Stale);
    }
}
