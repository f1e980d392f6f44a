use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::LogResult;
use crate::models::{LogEntry, LogFilter, NewLogEntry, SortOrder};

/// Repository for log entries.
///
/// Deliberately append-only: there is no generic update. The single
/// permitted mutation after insert is [`LogRepository::mark_undeleted`],
/// which flips `un_delete` false-to-true exactly once.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LogRepository: Send + Sync {
    /// Append one entry.
    async fn insert(&self, input: NewLogEntry) -> LogResult<LogEntry>;

    /// Look up an entry by id.
    async fn find_by_id(&self, id: Uuid) -> LogResult<Option<LogEntry>>;

    /// One page of entries matching the filter, plus the total matching
    /// count. Sorted by id (UUIDv7, so chronological) in the requested
    /// direction.
    async fn list(&self, filter: &LogFilter, rows_per_page: u64)
        -> LogResult<(Vec<LogEntry>, u64)>;

    /// Flip `un_delete` to true. Returns false if the entry does not
    /// exist or was already flipped.
    async fn mark_undeleted(&self, id: Uuid) -> LogResult<bool>;

    /// Administrative bulk purge of all entries.
    async fn purge(&self) -> LogResult<u64>;
}

/// In-memory implementation (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryLogRepository {
    entries: Arc<RwLock<Vec<LogEntry>>>,
}

impl InMemoryLogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(entry: &LogEntry, filter: &LogFilter) -> bool {
    if let Some(event) = &filter.event {
        if &entry.event != event {
            return false;
        }
    }
    if let Some(kind) = filter.kind {
        if entry.kind != kind {
            return false;
        }
    }
    if let Some(user) = filter.user {
        if entry.actor != Some(user) {
            return false;
        }
    }
    if let Some(course) = filter.course {
        if entry.data.course_id() != Some(course) {
            return false;
        }
    }
    if let Some(intake) = filter.intake {
        if entry.data.is_intake() != intake {
            return false;
        }
    }
    if let Some(from) = filter.from {
        if entry.created_at < from {
            return false;
        }
    }
    if let Some(to) = filter.to {
        if entry.created_at > to {
            return false;
        }
    }
    true
}

#[async_trait]
impl LogRepository for InMemoryLogRepository {
    async fn insert(&self, input: NewLogEntry) -> LogResult<LogEntry> {
        let entry = LogEntry {
            id: Uuid::now_v7(),
            event: input.event,
            kind: input.kind,
            actor: input.actor,
            data: input.data,
            un_delete: false,
            created_at: chrono::Utc::now(),
        };

        self.entries.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn find_by_id(&self, id: Uuid) -> LogResult<Option<LogEntry>> {
        let entries = self.entries.read().await;
        Ok(entries.iter().find(|e| e.id == id).cloned())
    }

    async fn list(
        &self,
        filter: &LogFilter,
        rows_per_page: u64,
    ) -> LogResult<(Vec<LogEntry>, u64)> {
        let entries = self.entries.read().await;

        let mut result: Vec<LogEntry> = entries
            .iter()
            .filter(|e| matches(e, filter))
            .cloned()
            .collect();

        match filter.sort {
            SortOrder::Asc => result.sort_by(|a, b| a.id.cmp(&b.id)),
            SortOrder::Desc => result.sort_by(|a, b| b.id.cmp(&a.id)),
        }

        let total = result.len() as u64;
        let offset = (filter.page.max(1) - 1) * rows_per_page;
        let page: Vec<LogEntry> = result
            .into_iter()
            .skip(offset as usize)
            .take(rows_per_page as usize)
            .collect();

        Ok((page, total))
    }

    async fn mark_undeleted(&self, id: Uuid) -> LogResult<bool> {
        let mut entries = self.entries.write().await;

        match entries.iter_mut().find(|e| e.id == id && !e.un_delete) {
            Some(entry) => {
                entry.un_delete = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn purge(&self) -> LogResult<u64> {
        let mut entries = self.entries.write().await;
        let count = entries.len() as u64;
        entries.clear();
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LogData, LogEvent, LogKind};

    fn course_deletion(course_id: Uuid, actor: Uuid) -> NewLogEntry {
        NewLogEntry {
            event: LogEvent::CourseDeletion,
            kind: LogKind::Delete,
            actor: Some(actor),
            data: LogData::Course {
                course_id,
                name: "Algebra I".to_string(),
                code: "ALG1".to_string(),
                intake: false,
            },
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryLogRepository::new();
        let entry = repo
            .insert(course_deletion(Uuid::now_v7(), Uuid::now_v7()))
            .await
            .unwrap();

        assert!(!entry.un_delete);
        let found = repo.find_by_id(entry.id).await.unwrap().unwrap();
        assert_eq!(found, entry);
    }

    #[tokio::test]
    async fn test_list_sorts_newest_first_by_default() {
        let repo = InMemoryLogRepository::new();
        let actor = Uuid::now_v7();
        let first = repo
            .insert(course_deletion(Uuid::now_v7(), actor))
            .await
            .unwrap();
        let second = repo
            .insert(course_deletion(Uuid::now_v7(), actor))
            .await
            .unwrap();

        let (page, total) = repo.list(&LogFilter::default(), 10).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(page[0].id, second.id);
        assert_eq!(page[1].id, first.id);

        let asc = LogFilter {
            sort: SortOrder::Asc,
            ..Default::default()
        };
        let (page, _) = repo.list(&asc, 10).await.unwrap();
        assert_eq!(page[0].id, first.id);
    }

    #[tokio::test]
    async fn test_list_filters_by_event_and_actor() {
        let repo = InMemoryLogRepository::new();
        let actor = Uuid::now_v7();
        repo.insert(course_deletion(Uuid::now_v7(), actor))
            .await
            .unwrap();
        repo.insert(NewLogEntry {
            event: LogEvent::UserLogin,
            kind: LogKind::Update,
            actor: Some(actor),
            data: LogData::Empty,
        })
        .await
        .unwrap();

        let filter = LogFilter {
            event: Some(LogEvent::CourseDeletion),
            ..Default::default()
        };
        let (page, total) = repo.list(&filter, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(page[0].event, LogEvent::CourseDeletion);

        let filter = LogFilter {
            user: Some(Uuid::now_v7()),
            ..Default::default()
        };
        let (_, total) = repo.list(&filter, 10).await.unwrap();
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_list_course_filter_reaches_into_payload() {
        let repo = InMemoryLogRepository::new();
        let course_id = Uuid::now_v7();
        repo.insert(course_deletion(course_id, Uuid::now_v7()))
            .await
            .unwrap();
        repo.insert(NewLogEntry {
            event: LogEvent::UnitDeletion,
            kind: LogKind::Delete,
            actor: None,
            data: LogData::Unit {
                unit_id: Uuid::now_v7(),
                course_id,
                name: "Limits".to_string(),
            },
        })
        .await
        .unwrap();
        repo.insert(course_deletion(Uuid::now_v7(), Uuid::now_v7()))
            .await
            .unwrap();

        let filter = LogFilter {
            course: Some(course_id),
            ..Default::default()
        };
        let (_, total) = repo.list(&filter, 10).await.unwrap();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_pagination_totals() {
        let repo = InMemoryLogRepository::new();
        let actor = Uuid::now_v7();
        for _ in 0..5 {
            repo.insert(course_deletion(Uuid::now_v7(), actor))
                .await
                .unwrap();
        }

        let filter = LogFilter {
            page: 2,
            ..Default::default()
        };
        let (page, total) = repo.list(&filter, 2).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(page.len(), 2);

        let filter = LogFilter {
            page: 3,
            ..Default::default()
        };
        let (page, _) = repo.list(&filter, 2).await.unwrap();
        assert_eq!(page.len(), 1);
    }

    #[tokio::test]
    async fn test_mark_undeleted_flips_exactly_once() {
        let repo = InMemoryLogRepository::new();
        let entry = repo
            .insert(course_deletion(Uuid::now_v7(), Uuid::now_v7()))
            .await
            .unwrap();

        assert!(repo.mark_undeleted(entry.id).await.unwrap());
        assert!(!repo.mark_undeleted(entry.id).await.unwrap());

        let found = repo.find_by_id(entry.id).await.unwrap().unwrap();
        assert!(found.un_delete);
    }

    #[tokio::test]
    async fn test_purge_reports_count() {
        let repo = InMemoryLogRepository::new();
        for _ in 0..3 {
            repo.insert(course_deletion(Uuid::now_v7(), Uuid::now_v7()))
                .await
                .unwrap();
        }

        assert_eq!(repo.purge().await.unwrap(), 3);
        assert_eq!(repo.purge().await.unwrap(), 0);
    }
}
