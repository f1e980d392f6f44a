use async_trait::async_trait;
use domain_activity_log::{DeletedBy, EntityStatus};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::DiscussionResult;
use crate::models::{CreateDiscussion, Discussion, DiscussionFilter};

/// Repository trait for Discussion persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiscussionRepository: Send + Sync {
    async fn create(&self, input: CreateDiscussion) -> DiscussionResult<Discussion>;

    async fn get_by_id(&self, id: Uuid) -> DiscussionResult<Option<Discussion>>;

    async fn list(
        &self,
        filter: &DiscussionFilter,
        rows_per_page: u64,
    ) -> DiscussionResult<(Vec<Discussion>, u64)>;

    /// Mark directly deleted. Returns false if already deleted.
    async fn soft_delete(&self, id: Uuid) -> DiscussionResult<bool>;

    /// Reverse a direct deletion. Returns false unless the row is
    /// exactly (Deleted, Direct).
    async fn restore(&self, id: Uuid) -> DiscussionResult<bool>;
}

/// In-memory implementation (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryDiscussionRepository {
    discussions: Arc<RwLock<HashMap<Uuid, Discussion>>>,
}

impl InMemoryDiscussionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DiscussionRepository for InMemoryDiscussionRepository {
    async fn create(&self, input: CreateDiscussion) -> DiscussionResult<Discussion> {
        let now = chrono::Utc::now();
        let discussion = Discussion {
            id: Uuid::now_v7(),
            course_id: input.course_id,
            author_id: input.author_id,
            title: input.title,
            body: input.body,
            status: EntityStatus::Active,
            deleted_by: DeletedBy::None,
            created_at: now,
            updated_at: now,
        };

        self.discussions
            .write()
            .await
            .insert(discussion.id, discussion.clone());
        Ok(discussion)
    }

    async fn get_by_id(&self, id: Uuid) -> DiscussionResult<Option<Discussion>> {
        Ok(self.discussions.read().await.get(&id).cloned())
    }

    async fn list(
        &self,
        filter: &DiscussionFilter,
        rows_per_page: u64,
    ) -> DiscussionResult<(Vec<Discussion>, u64)> {
        let discussions = self.discussions.read().await;

        let mut result: Vec<Discussion> = discussions
            .values()
            .filter(|d| filter.course.is_none_or(|c| d.course_id == c))
            .filter(|d| filter.status.is_none_or(|s| d.status == s))
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

    async fn soft_delete(&self, id: Uuid) -> DiscussionResult<bool> {
        let mut discussions = self.discussions.write().await;
        match discussions.get_mut(&id).filter(|d| d.status.is_live()) {
            Some(discussion) => {
                discussion.status = EntityStatus::Deleted;
                discussion.deleted_by = DeletedBy::Direct;
                discussion.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn restore(&self, id: Uuid) -> DiscussionResult<bool> {
        let mut discussions = self.discussions.write().await;
        match discussions
            .get_mut(&id)
            .filter(|d| d.status == EntityStatus::Deleted && d.deleted_by == DeletedBy::Direct)
        {
            Some(discussion) => {
                discussion.status = EntityStatus::Active;
                discussion.deleted_by = DeletedBy::None;
                discussion.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
