//! The undo engine.
//!
//! Dispatches a delete-kind log entry to the handler registered for its
//! event. The handler owns the state guard and the compensating writes;
//! the engine owns idempotency (the `un_delete` flag), the undelete log
//! entry, and the flag flip.

use async_trait::async_trait;
use observability::ActivityMetrics;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{UndoError, UndoResult};
use crate::models::{LogData, LogEntry, LogEvent, LogKind};
use crate::repository::LogRepository;
use crate::writer::LogWriter;

/// What a handler reports back to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum RestoreOutcome {
    /// The target (and its cascade-deleted dependents) were restored.
    /// The engine records `undelete_event` with this payload and flips
    /// the original entry's flag.
    Restored {
        undelete_event: LogEvent,
        data: LogData,
    },
    /// The target was not in the exact deleted state this event
    /// produced; nothing was changed.
    Stale,
}

/// Outcome of an undo request. Everything except `Undone` is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UndoOutcome {
    Undone,
    AlreadyUndone,
    Stale,
    Unsupported,
}

/// A reversal strategy for one deletion event.
///
/// Implementations verify the target is still in the exact state the
/// deletion produced, restore it, and cascade the restoration to
/// dependents that were cascade-deleted alongside it.
#[async_trait]
pub trait UndoHandler: Send + Sync {
    async fn restore(&self, entry: &LogEntry) -> UndoResult<RestoreOutcome>;
}

/// Event-to-handler dispatch table, built once at wiring time.
#[derive(Default)]
pub struct UndoRegistry {
    handlers: HashMap<LogEvent, Arc<dyn UndoHandler>>,
}

impl UndoRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, event: LogEvent, handler: Arc<dyn UndoHandler>) -> Self {
        self.handlers.insert(event, handler);
        self
    }

    pub fn get(&self, event: &LogEvent) -> Option<&Arc<dyn UndoHandler>> {
        self.handlers.get(event)
    }

    pub fn supports(&self, event: &LogEvent) -> bool {
        self.handlers.contains_key(event)
    }
}

/// Reverses soft-deletions recorded in the activity log.
pub struct UndoEngine {
    repository: Arc<dyn LogRepository>,
    writer: LogWriter,
    registry: UndoRegistry,
}

impl UndoEngine {
    pub fn new(
        repository: Arc<dyn LogRepository>,
        writer: LogWriter,
        registry: UndoRegistry,
    ) -> Self {
        Self {
            repository,
            writer,
            registry,
        }
    }

    /// Undo the deletion recorded by `log_id`.
    ///
    /// Fails with [`UndoError::LogNotFound`] when the id does not
    /// resolve. Every other non-restorable situation (already undone,
    /// no handler for the event, target no longer in the deleted state)
    /// is a counted no-op, not an error: under concurrent use the
    /// caller cannot act on the distinction.
    pub async fn undo(&self, log_id: Uuid, actor: Option<Uuid>) -> UndoResult<UndoOutcome> {
        let entry = self
            .repository
            .find_by_id(log_id)
            .await?
            .ok_or(UndoError::LogNotFound(log_id))?;

        if entry.un_delete {
            return Ok(UndoOutcome::AlreadyUndone);
        }

        let event_name = entry.event.to_string();
        let Some(handler) = self.registry.get(&entry.event) else {
            ActivityMetrics::record_undo_unsupported(&event_name);
            return Ok(UndoOutcome::Unsupported);
        };

        match handler.restore(&entry).await? {
            RestoreOutcome::Stale => {
                ActivityMetrics::record_undo_stale(&event_name);
                Ok(UndoOutcome::Stale)
            }
            RestoreOutcome::Restored {
                undelete_event,
                data,
            } => {
                // The entity writes already happened in the handler.
                // Record the undo, then flip the original entry; each
                // write is independent (no store transaction), matching
                // the delete path.
                self.writer
                    .record(undelete_event, LogKind::Undelete, actor, data)
                    .await?;
                self.repository.mark_undeleted(entry.id).await?;

                ActivityMetrics::record_undo(&event_name);
                tracing::info!(log_id = %log_id, event = %event_name, "Reversed deletion");
                Ok(UndoOutcome::Undone)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LogFilter;
    use crate::repository::InMemoryLogRepository;

    struct StaticHandler(RestoreOutcome);

    #[async_trait]
    impl UndoHandler for StaticHandler {
        async fn restore(&self, _entry: &LogEntry) -> UndoResult<RestoreOutcome> {
            Ok(self.0.clone())
        }
    }

    fn course_data() -> LogData {
        LogData::Course {
            course_id: Uuid::now_v7(),
            name: "Algebra I".to_string(),
            code: "ALG1".to_string(),
            intake: false,
        }
    }

    async fn deletion_entry(repo: &Arc<InMemoryLogRepository>) -> LogEntry {
        LogWriter::new(repo.clone())
            .record(
                LogEvent::CourseDeletion,
                LogKind::Delete,
                Some(Uuid::now_v7()),
                course_data(),
            )
            .await
            .unwrap()
    }

    fn engine_with(
        repo: Arc<InMemoryLogRepository>,
        outcome: RestoreOutcome,
    ) -> UndoEngine {
        let registry = UndoRegistry::new().register(
            LogEvent::CourseDeletion,
            Arc::new(StaticHandler(outcome)),
        );
        UndoEngine::new(repo.clone(), LogWriter::new(repo), registry)
    }

    #[tokio::test]
    async fn test_unknown_log_id_is_not_found() {
        let repo = Arc::new(InMemoryLogRepository::new());
        let engine = engine_with(repo, RestoreOutcome::Stale);

        let result = engine.undo(Uuid::now_v7(), None).await;
        assert!(matches!(result, Err(UndoError::LogNotFound(_))));
    }

    #[tokio::test]
    async fn test_successful_undo_records_and_flips() {
        let repo = Arc::new(InMemoryLogRepository::new());
        let entry = deletion_entry(&repo).await;
        let engine = engine_with(
            repo.clone(),
            RestoreOutcome::Restored {
                undelete_event: LogEvent::UndeleteCourse,
                data: course_data(),
            },
        );

        let outcome = engine.undo(entry.id, Some(Uuid::now_v7())).await.unwrap();
        assert_eq!(outcome, UndoOutcome::Undone);

        // Original entry is flagged
        let original = repo.find_by_id(entry.id).await.unwrap().unwrap();
        assert!(original.un_delete);

        // A new UNDELETE_COURSE entry exists
        let (entries, total) = repo.list(&LogFilter::default(), 10).await.unwrap();
        assert_eq!(total, 2);
        assert!(entries
            .iter()
            .any(|e| e.event == LogEvent::UndeleteCourse && e.kind == LogKind::Undelete));
    }

    #[tokio::test]
    async fn test_second_undo_is_a_noop() {
        let repo = Arc::new(InMemoryLogRepository::new());
        let entry = deletion_entry(&repo).await;
        let engine = engine_with(
            repo.clone(),
            RestoreOutcome::Restored {
                undelete_event: LogEvent::UndeleteCourse,
                data: course_data(),
            },
        );

        assert_eq!(
            engine.undo(entry.id, None).await.unwrap(),
            UndoOutcome::Undone
        );
        assert_eq!(
            engine.undo(entry.id, None).await.unwrap(),
            UndoOutcome::AlreadyUndone
        );

        // No second undelete entry was written
        let (_, total) = repo.list(&LogFilter::default(), 10).await.unwrap();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_stale_guard_writes_nothing() {
        let repo = Arc::new(InMemoryLogRepository::new());
        let entry = deletion_entry(&repo).await;
        let engine = engine_with(repo.clone(), RestoreOutcome::Stale);

        let outcome = engine.undo(entry.id, None).await.unwrap();
        assert_eq!(outcome, UndoOutcome::Stale);

        // Neither a new entry nor a flag flip
        let (_, total) = repo.list(&LogFilter::default(), 10).await.unwrap();
        assert_eq!(total, 1);
        let original = repo.find_by_id(entry.id).await.unwrap().unwrap();
        assert!(!original.un_delete);
    }

    #[tokio::test]
    async fn test_event_without_handler_is_unsupported() {
        let repo = Arc::new(InMemoryLogRepository::new());
        let entry = LogWriter::new(repo.clone())
            .record(
                LogEvent::GradeSubmitted,
                LogKind::Update,
                None,
                LogData::Empty,
            )
            .await
            .unwrap();
        let engine = engine_with(repo, RestoreOutcome::Stale);

        let outcome = engine.undo(entry.id, None).await.unwrap();
        assert_eq!(outcome, UndoOutcome::Unsupported);
    }

    #[test]
    fn test_registry_dispatch() {
        let registry = UndoRegistry::new()
            .register(LogEvent::CourseDeletion, Arc::new(StaticHandler(RestoreOutcome::Stale)));

        assert!(registry.supports(&LogEvent::CourseDeletion));
        assert!(!registry.supports(&LogEvent::UserDeletion));
        assert!(!registry.supports(&LogEvent::Unknown("X".to_string())));
    }
}
