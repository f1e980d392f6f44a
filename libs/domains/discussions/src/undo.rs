use async_trait::async_trait;
use domain_activity_log::{
    LogData, LogEntry, LogEvent, RestoreOutcome, UndoError, UndoHandler, UndoResult,
};
use std::sync::Arc;

use crate::repository::DiscussionRepository;

/// Reverses a DISCUSSION_DELETION entry.
pub struct DiscussionUndoHandler {
    repository: Arc<dyn DiscussionRepository>,
}

impl DiscussionUndoHandler {
    pub fn new(repository: Arc<dyn DiscussionRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl UndoHandler for DiscussionUndoHandler {
    async fn restore(&self, entry: &LogEntry) -> UndoResult<RestoreOutcome> {
        let LogData::Discussion { discussion_id, .. } = &entry.data else {
            return Err(UndoError::MissingReference(entry.id));
        };

        let restored = self
            .repository
            .restore(*discussion_id)
            .await
            .map_err(|e| UndoError::Store(e.to_string()))?;

        if restored {
            Ok(RestoreOutcome::Restored {
                undelete_event: LogEvent::UndeleteDiscussion,
                data: entry.data.clone(),
            })
        } else {
            Ok(RestoreOutcome::Stale)
        }
    }
}
