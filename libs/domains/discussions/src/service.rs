use domain_activity_log::{LogData, LogEvent, LogKind, LogWriter};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{DiscussionError, DiscussionResult};
use crate::models::{CreateDiscussion, Discussion, DiscussionFilter};
use crate::repository::DiscussionRepository;

/// Service layer for discussions.
#[derive(Clone)]
pub struct DiscussionService {
    repository: Arc<dyn DiscussionRepository>,
    logs: LogWriter,
}

impl DiscussionService {
    pub fn new(repository: Arc<dyn DiscussionRepository>, logs: LogWriter) -> Self {
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

    fn log_data(discussion: &Discussion) -> LogData {
        LogData::Discussion {
            discussion_id: discussion.id,
            course_id: discussion.course_id,
            title: discussion.title.clone(),
        }
    }

    pub async fn create_discussion(
        &self,
        input: CreateDiscussion,
        actor: Option<Uuid>,
    ) -> DiscussionResult<Discussion> {
        input
            .validate()
            .map_err(|e| DiscussionError::Validation(e.to_string()))?;

        let discussion = self.repository.create(input).await?;

        self.record_activity(
            LogEvent::DiscussionCreation,
            LogKind::Create,
            actor,
            Self::log_data(&discussion),
        )
        .await;

        Ok(discussion)
    }

    pub async fn get_discussion(&self, id: Uuid) -> DiscussionResult<Discussion> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(DiscussionError::NotFound(id))
    }

    pub async fn list_discussions(
        &self,
        filter: DiscussionFilter,
        rows_per_page: u64,
    ) -> DiscussionResult<(Vec<Discussion>, u64)> {
        self.repository.list(&filter, rows_per_page).await
    }

    pub async fn delete_discussion(&self, id: Uuid, actor: Option<Uuid>) -> DiscussionResult<()> {
        let discussion = self.get_discussion(id).await?;

        if !self.repository.soft_delete(id).await? {
            return Err(DiscussionError::NotFound(id));
        }

        self.record_activity(
            LogEvent::DiscussionDeletion,
            LogKind::Delete,
            actor,
            Self::log_data(&discussion),
        )
        .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryDiscussionRepository;
    use domain_activity_log::{InMemoryLogRepository, LogFilter, LogRepository};

    #[tokio::test]
    async fn test_delete_logs_title_snapshot() {
        let logs = Arc::new(InMemoryLogRepository::new());
        let service = DiscussionService::new(
            Arc::new(InMemoryDiscussionRepository::new()),
            LogWriter::new(logs.clone()),
        );

        let discussion = service
            .create_discussion(
                CreateDiscussion {
                    course_id: Uuid::now_v7(),
                    author_id: Uuid::now_v7(),
                    title: "Week 3 questions".to_string(),
                    body: "Anything unclear about limits?".to_string(),
                },
                None,
            )
            .await
            .unwrap();
        service.delete_discussion(discussion.id, None).await.unwrap();

        let filter = LogFilter {
            event: Some(LogEvent::DiscussionDeletion),
            ..Default::default()
        };
        let (entries, total) = logs.list(&filter, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(
            entries[0].data,
            LogData::Discussion {
                discussion_id: discussion.id,
                course_id: discussion.course_id,
                title: "Week 3 questions".to_string()
            }
        );
    }
}
