use observability::ActivityMetrics;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::LogResult;
use crate::models::{LogData, LogEntry, LogEvent, LogKind, NewLogEntry};
use crate::repository::LogRepository;

/// Appends one immutable log entry per domain mutation.
///
/// Failures are returned to the caller, never retried here. Entity
/// services treat the write as best-effort: they log a warning and let
/// the domain mutation stand.
#[derive(Clone)]
pub struct LogWriter {
    repository: Arc<dyn LogRepository>,
}

impl LogWriter {
    pub fn new(repository: Arc<dyn LogRepository>) -> Self {
        Self { repository }
    }

    /// Append one entry.
    pub async fn record(
        &self,
        event: LogEvent,
        kind: LogKind,
        actor: Option<Uuid>,
        data: LogData,
    ) -> LogResult<LogEntry> {
        let event_name = event.to_string();
        let kind_name = kind.to_string();

        let entry = self
            .repository
            .insert(NewLogEntry {
                event,
                kind,
                actor,
                data,
            })
            .await?;

        ActivityMetrics::record_entry(&event_name, &kind_name);
        tracing::debug!(log_id = %entry.id, event = %event_name, "Recorded activity");

        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryLogRepository;

    #[tokio::test]
    async fn test_record_appends_unflipped_entry() {
        let repo = Arc::new(InMemoryLogRepository::new());
        let writer = LogWriter::new(repo.clone());
        let actor = Uuid::now_v7();

        let entry = writer
            .record(
                LogEvent::CourseCreation,
                LogKind::Create,
                Some(actor),
                LogData::Course {
                    course_id: Uuid::now_v7(),
                    name: "Algebra I".to_string(),
                    code: "ALG1".to_string(),
                    intake: false,
                },
            )
            .await
            .unwrap();

        assert_eq!(entry.event, LogEvent::CourseCreation);
        assert_eq!(entry.actor, Some(actor));
        assert!(!entry.un_delete);

        let stored = repo.find_by_id(entry.id).await.unwrap();
        assert!(stored.is_some());
    }

    #[tokio::test]
    async fn test_record_surfaces_store_errors() {
        use crate::error::LogError;
        use crate::repository::MockLogRepository;

        let mut repo = MockLogRepository::new();
        repo.expect_insert()
            .returning(|_| Err(LogError::Store("connection reset".to_string())));

        let writer = LogWriter::new(Arc::new(repo));
        let result = writer
            .record(LogEvent::UserLogin, LogKind::Update, None, LogData::Empty)
            .await;

        assert!(matches!(result, Err(LogError::Store(_))));
    }
}
