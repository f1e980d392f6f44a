use async_trait::async_trait;
use domain_activity_log::{
    LogData, LogEntry, LogEvent, RestoreOutcome, UndoError, UndoHandler, UndoResult,
};
use std::sync::Arc;

use crate::repository::{GroupRepository, MembershipRepository};

/// Reverses a GROUP_USER_DELETION entry: the group itself from
/// (Deleted, Direct), then every membership row the deletion cascaded.
pub struct GroupUndoHandler {
    groups: Arc<dyn GroupRepository>,
    members: Arc<dyn MembershipRepository>,
}

impl GroupUndoHandler {
    pub fn new(groups: Arc<dyn GroupRepository>, members: Arc<dyn MembershipRepository>) -> Self {
        Self { groups, members }
    }
}

#[async_trait]
impl UndoHandler for GroupUndoHandler {
    async fn restore(&self, entry: &LogEntry) -> UndoResult<RestoreOutcome> {
        let LogData::Group { group_id, .. } = &entry.data else {
            return Err(UndoError::MissingReference(entry.id));
        };
        let group_id = *group_id;

        if !self
            .groups
            .restore(group_id)
            .await
            .map_err(|e| UndoError::Store(e.to_string()))?
        {
            return Ok(RestoreOutcome::Stale);
        }

        let members = self
            .members
            .restore_cascaded_by_group(group_id)
            .await
            .map_err(|e| UndoError::Store(e.to_string()))?;

        tracing::info!(group_id = %group_id, members, "Restored group with memberships");

        Ok(RestoreOutcome::Restored {
            undelete_event: LogEvent::UndeleteGroup,
            data: entry.data.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateGroup;
    use crate::repository::{InMemoryGroupRepository, InMemoryMembershipRepository};
    use chrono::Utc;
    use domain_activity_log::{EntityStatus, LogKind};
    use uuid::Uuid;

    #[tokio::test]
    async fn test_group_undo_restores_memberships() {
        let groups = Arc::new(InMemoryGroupRepository::new());
        let members = Arc::new(InMemoryMembershipRepository::new());

        let group = groups
            .create(CreateGroup {
                course_id: Uuid::now_v7(),
                name: "Study group A".to_string(),
            })
            .await
            .unwrap();
        let user_id = Uuid::now_v7();
        members.add(group.id, user_id).await.unwrap();

        groups.soft_delete(group.id).await.unwrap();
        members.cascade_delete_by_group(group.id).await.unwrap();

        let handler = GroupUndoHandler::new(groups.clone(), members.clone());
        let entry = LogEntry {
            id: Uuid::now_v7(),
            event: LogEvent::GroupUserDeletion,
            kind: LogKind::Delete,
            actor: None,
            data: LogData::Group {
                group_id: group.id,
                course_id: group.course_id,
                name: group.name.clone(),
            },
            un_delete: false,
            created_at: Utc::now(),
        };

        let outcome = handler.restore(&entry).await.unwrap();
        assert!(matches!(outcome, RestoreOutcome::Restored { .. }));

        assert_eq!(
            groups.get_by_id(group.id).await.unwrap().unwrap().status,
            EntityStatus::Active
        );
        assert_eq!(
            members
                .find(group.id, user_id)
                .await
                .unwrap()
                .unwrap()
                .status,
            EntityStatus::Active
        );

        // A second restore attempt hits the guard
        assert_eq!(handler.restore(&entry).await.unwrap(), RestoreOutcome::Stale);
    }
}
