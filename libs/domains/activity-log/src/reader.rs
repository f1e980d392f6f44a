use axum_helpers::pagination::{clamp_rows_per_page, Paginated};
use chrono::{DateTime, Utc};
use observability::ActivityMetrics;
use std::sync::Arc;
use uuid::Uuid;

use crate::directory::ReferenceDirectory;
use crate::error::LogResult;
use crate::models::{LogEntry, LogFilter, LogKind, RenderedLogEntry};
use crate::repository::LogRepository;
use crate::templates::{time_ago, LogTemplates, RenderContext};

/// Name rendered when the actor reference no longer resolves.
const FALLBACK_ACTOR: &str = "Someone";

/// Name rendered for system-generated entries with no actor.
const SYSTEM_ACTOR: &str = "System";

/// Paginates, filters and renders log entries for the list endpoint.
pub struct LogReader {
    repository: Arc<dyn LogRepository>,
    directory: Arc<dyn ReferenceDirectory>,
    templates: LogTemplates,
}

impl LogReader {
    pub fn new(repository: Arc<dyn LogRepository>, directory: Arc<dyn ReferenceDirectory>) -> Self {
        Self {
            repository,
            directory,
            templates: LogTemplates::standard(),
        }
    }

    /// One rendered page. Entries whose event has no template keep their
    /// raw fields but carry no description; the rest of the page is
    /// unaffected.
    pub async fn list(
        &self,
        filter: LogFilter,
        viewer: Option<Uuid>,
    ) -> LogResult<Paginated<RenderedLogEntry>> {
        let rows_per_page = clamp_rows_per_page(filter.row_per_page);
        let (entries, total) = self.repository.list(&filter, rows_per_page).await?;

        let now = Utc::now();
        let mut rendered = Vec::with_capacity(entries.len());
        for entry in entries {
            rendered.push(self.render(entry, viewer, now).await);
        }

        Ok(Paginated::new(rendered, total, filter.page, rows_per_page))
    }

    async fn render(
        &self,
        entry: LogEntry,
        viewer: Option<Uuid>,
        now: DateTime<Utc>,
    ) -> RenderedLogEntry {
        let actor_name = match entry.actor {
            Some(id) if Some(id) == viewer => "You".to_string(),
            Some(id) => self
                .directory
                .user_name(id)
                .await
                .unwrap_or_else(|| FALLBACK_ACTOR.to_string()),
            None => SYSTEM_ACTOR.to_string(),
        };

        let when = time_ago(entry.created_at, now);
        let ctx = RenderContext {
            actor: &actor_name,
            data: &entry.data,
            when: &when,
        };

        let description = self.templates.render(&entry.event, &ctx);
        if description.is_none() {
            ActivityMetrics::record_render_unknown(&entry.event.to_string());
        }

        // The undo affordance; whether the target is actually still
        // deleted is re-verified at undo time, not here.
        let action = (entry.kind == LogKind::Delete && !entry.un_delete)
            .then(|| vec!["UNDO".to_string()]);

        RenderedLogEntry {
            id: entry.id,
            event: entry.event,
            kind: entry.kind,
            actor: entry.actor,
            data: entry.data,
            un_delete: entry.un_delete,
            created_at: entry.created_at,
            description,
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::MockReferenceDirectory;
    use crate::models::{LogData, LogEvent};
    use crate::repository::InMemoryLogRepository;
    use crate::writer::LogWriter;

    fn course_data() -> LogData {
        LogData::Course {
            course_id: Uuid::now_v7(),
            name: "Algebra I".to_string(),
            code: "ALG1".to_string(),
            intake: false,
        }
    }

    async fn seeded_repo(actor: Uuid) -> Arc<InMemoryLogRepository> {
        let repo = Arc::new(InMemoryLogRepository::new());
        let writer = LogWriter::new(repo.clone());
        writer
            .record(
                LogEvent::CourseDeletion,
                LogKind::Delete,
                Some(actor),
                course_data(),
            )
            .await
            .unwrap();
        repo
    }

    #[tokio::test]
    async fn test_viewer_sees_their_own_entries_as_you() {
        let actor = Uuid::now_v7();
        let repo = seeded_repo(actor).await;

        let mut directory = MockReferenceDirectory::new();
        directory.expect_user_name().never();

        let reader = LogReader::new(repo, Arc::new(directory));
        let page = reader
            .list(LogFilter::default(), Some(actor))
            .await
            .unwrap();

        let description = page.data[0].description.as_deref().unwrap();
        assert!(description.starts_with("You deleted the course"));
    }

    #[tokio::test]
    async fn test_other_viewers_see_the_actor_name() {
        let actor = Uuid::now_v7();
        let repo = seeded_repo(actor).await;

        let mut directory = MockReferenceDirectory::new();
        directory
            .expect_user_name()
            .with(mockall::predicate::eq(actor))
            .returning(|_| Some("Ada Lovelace".to_string()));

        let reader = LogReader::new(repo, Arc::new(directory));
        let page = reader.list(LogFilter::default(), None).await.unwrap();

        let description = page.data[0].description.as_deref().unwrap();
        assert_eq!(
            description
                .split(" - ")
                .next()
                .unwrap(),
            "Ada Lovelace deleted the course <strong>Algebra I</strong> (ALG1)"
        );
    }

    #[tokio::test]
    async fn test_delete_entries_carry_undo_action() {
        let actor = Uuid::now_v7();
        let repo = seeded_repo(actor).await;
        let writer = LogWriter::new(repo.clone());
        writer
            .record(
                LogEvent::CourseCreation,
                LogKind::Create,
                Some(actor),
                course_data(),
            )
            .await
            .unwrap();

        let reader = LogReader::new(repo, Arc::new(MockReferenceDirectory::new()));
        let page = reader
            .list(LogFilter::default(), Some(actor))
            .await
            .unwrap();

        for entry in &page.data {
            match entry.kind {
                LogKind::Delete => {
                    assert_eq!(entry.action.as_deref(), Some(&["UNDO".to_string()][..]))
                }
                _ => assert!(entry.action.is_none()),
            }
        }
    }

    #[tokio::test]
    async fn test_undone_delete_loses_the_undo_action() {
        let actor = Uuid::now_v7();
        let repo = seeded_repo(actor).await;
        let entry_id = {
            let (entries, _) = repo.list(&LogFilter::default(), 10).await.unwrap();
            entries[0].id
        };
        repo.mark_undeleted(entry_id).await.unwrap();

        let reader = LogReader::new(repo, Arc::new(MockReferenceDirectory::new()));
        let page = reader
            .list(LogFilter::default(), Some(actor))
            .await
            .unwrap();

        assert!(page.data[0].un_delete);
        assert!(page.data[0].action.is_none());
    }

    #[tokio::test]
    async fn test_unknown_event_renders_without_description() {
        let actor = Uuid::now_v7();
        let repo = Arc::new(InMemoryLogRepository::new());
        let writer = LogWriter::new(repo.clone());
        writer
            .record(
                LogEvent::Unknown("BADGE_AWARDED".to_string()),
                LogKind::Update,
                Some(actor),
                LogData::Empty,
            )
            .await
            .unwrap();
        writer
            .record(
                LogEvent::CourseDeletion,
                LogKind::Delete,
                Some(actor),
                course_data(),
            )
            .await
            .unwrap();

        let reader = LogReader::new(repo, Arc::new(MockReferenceDirectory::new()));
        let page = reader
            .list(LogFilter::default(), Some(actor))
            .await
            .unwrap();

        // The unknown entry is still listed, just without a description
        assert_eq!(page.total_items, 2);
        let unknown = page
            .data
            .iter()
            .find(|e| e.event == LogEvent::Unknown("BADGE_AWARDED".to_string()))
            .unwrap();
        assert!(unknown.description.is_none());

        let known = page
            .data
            .iter()
            .find(|e| e.event == LogEvent::CourseDeletion)
            .unwrap();
        assert!(known.description.is_some());
    }

    #[tokio::test]
    async fn test_system_entries_render_without_actor_lookup() {
        let repo = Arc::new(InMemoryLogRepository::new());
        let writer = LogWriter::new(repo.clone());
        writer
            .record(LogEvent::UserImport, LogKind::Create, None, LogData::Empty)
            .await
            .unwrap();

        let mut directory = MockReferenceDirectory::new();
        directory.expect_user_name().never();

        let reader = LogReader::new(repo, Arc::new(directory));
        let page = reader.list(LogFilter::default(), None).await.unwrap();

        assert_eq!(
            page.data[0].description.as_deref().unwrap(),
            "System imported users - just now"
        );
    }
}
