use domain_activity_log::{LogData, LogEvent, LogKind, LogWriter};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{GroupError, GroupResult};
use crate::models::{AddMember, CourseGroup, CreateGroup, GroupFilter, UserCourseGroup};
use crate::repository::{GroupRepository, MembershipRepository};

/// Service layer for course groups and their memberships.
///
/// Deleting a group cascades into its live membership rows; members
/// removed beforehand keep their direct-removal provenance and are not
/// resurrected by an undo.
#[derive(Clone)]
pub struct GroupService {
    groups: Arc<dyn GroupRepository>,
    members: Arc<dyn MembershipRepository>,
    logs: LogWriter,
}

impl GroupService {
    pub fn new(
        groups: Arc<dyn GroupRepository>,
        members: Arc<dyn MembershipRepository>,
        logs: LogWriter,
    ) -> Self {
        Self {
            groups,
            members,
            logs,
        }
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

    fn group_data(group: &CourseGroup) -> LogData {
        LogData::Group {
            group_id: group.id,
            course_id: group.course_id,
            name: group.name.clone(),
        }
    }

    pub async fn create_group(
        &self,
        input: CreateGroup,
        actor: Option<Uuid>,
    ) -> GroupResult<CourseGroup> {
        input
            .validate()
            .map_err(|e| GroupError::Validation(e.to_string()))?;

        let group = self.groups.create(input).await?;

        self.record_activity(
            LogEvent::GroupCreation,
            LogKind::Create,
            actor,
            Self::group_data(&group),
        )
        .await;

        Ok(group)
    }

    pub async fn get_group(&self, id: Uuid) -> GroupResult<CourseGroup> {
        self.groups
            .get_by_id(id)
            .await?
            .ok_or(GroupError::GroupNotFound(id))
    }

    pub async fn list_groups(
        &self,
        filter: GroupFilter,
        rows_per_page: u64,
    ) -> GroupResult<(Vec<CourseGroup>, u64)> {
        self.groups.list(&filter, rows_per_page).await
    }

    /// Delete a group and cascade into its memberships.
    pub async fn delete_group(&self, id: Uuid, actor: Option<Uuid>) -> GroupResult<()> {
        let group = self.get_group(id).await?;

        if !self.groups.soft_delete(id).await? {
            return Err(GroupError::GroupNotFound(id));
        }

        let members = self.members.cascade_delete_by_group(id).await?;
        tracing::info!(group_id = %id, members, "Deleted group with memberships");

        self.record_activity(
            LogEvent::GroupUserDeletion,
            LogKind::Delete,
            actor,
            Self::group_data(&group),
        )
        .await;

        Ok(())
    }

    pub async fn list_members(&self, group_id: Uuid) -> GroupResult<Vec<UserCourseGroup>> {
        // Listing members of an unknown group is a 404, not an empty page
        self.get_group(group_id).await?;
        self.members.list_by_group(group_id).await
    }

    pub async fn add_member(
        &self,
        group_id: Uuid,
        input: AddMember,
        actor: Option<Uuid>,
    ) -> GroupResult<UserCourseGroup> {
        input
            .validate()
            .map_err(|e| GroupError::Validation(e.to_string()))?;

        let group = self.get_group(group_id).await?;
        if !group.status.is_live() {
            return Err(GroupError::Validation(format!(
                "Group {} is deleted",
                group_id
            )));
        }

        let membership = self.members.add(group_id, input.user_id).await?;

        self.record_activity(
            LogEvent::GroupMemberAdded,
            LogKind::Update,
            actor,
            LogData::GroupMember {
                group_id,
                group_name: group.name,
                user_id: input.user_id,
                user_name: input.user_name,
            },
        )
        .await;

        Ok(membership)
    }

    pub async fn remove_member(
        &self,
        group_id: Uuid,
        user_id: Uuid,
        user_name: String,
        actor: Option<Uuid>,
    ) -> GroupResult<()> {
        let group = self.get_group(group_id).await?;

        if !self.members.soft_delete(group_id, user_id).await? {
            return Err(GroupError::MemberNotFound { group_id, user_id });
        }

        self.record_activity(
            LogEvent::GroupMemberRemoved,
            LogKind::Update,
            actor,
            LogData::GroupMember {
                group_id,
                group_name: group.name,
                user_id,
                user_name,
            },
        )
        .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryGroupRepository, InMemoryMembershipRepository};
    use domain_activity_log::{
        DeletedBy, EntityStatus, InMemoryLogRepository, LogFilter, LogRepository, ParentKind,
    };

    struct Fixture {
        service: GroupService,
        members: Arc<InMemoryMembershipRepository>,
        logs: Arc<InMemoryLogRepository>,
    }

    fn fixture() -> Fixture {
        let groups = Arc::new(InMemoryGroupRepository::new());
        let members = Arc::new(InMemoryMembershipRepository::new());
        let logs = Arc::new(InMemoryLogRepository::new());

        Fixture {
            service: GroupService::new(groups, members.clone(), LogWriter::new(logs.clone())),
            members,
            logs,
        }
    }

    fn study_group() -> CreateGroup {
        CreateGroup {
            course_id: Uuid::now_v7(),
            name: "Study group A".to_string(),
        }
    }

    #[tokio::test]
    async fn test_delete_group_cascades_memberships_and_logs() {
        let f = fixture();
        let actor = Uuid::now_v7();

        let group = f.service.create_group(study_group(), Some(actor)).await.unwrap();
        let member = f
            .service
            .add_member(
                group.id,
                AddMember {
                    user_id: Uuid::now_v7(),
                    user_name: "Ada Lovelace".to_string(),
                },
                Some(actor),
            )
            .await
            .unwrap();

        f.service.delete_group(group.id, Some(actor)).await.unwrap();

        let membership = f
            .members
            .find(group.id, member.user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(membership.status, EntityStatus::Deleted);
        assert_eq!(
            membership.deleted_by,
            DeletedBy::Cascaded {
                parent: ParentKind::Group,
                parent_id: group.id
            }
        );

        let filter = LogFilter {
            event: Some(LogEvent::GroupUserDeletion),
            ..Default::default()
        };
        let (entries, total) = f.logs.list(&filter, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(entries[0].kind, LogKind::Delete);
    }

    #[tokio::test]
    async fn test_membership_changes_are_logged() {
        let f = fixture();
        let group = f.service.create_group(study_group(), None).await.unwrap();
        let user_id = Uuid::now_v7();

        f.service
            .add_member(
                group.id,
                AddMember {
                    user_id,
                    user_name: "Ada Lovelace".to_string(),
                },
                None,
            )
            .await
            .unwrap();
        f.service
            .remove_member(group.id, user_id, "Ada Lovelace".to_string(), None)
            .await
            .unwrap();

        for event in [LogEvent::GroupMemberAdded, LogEvent::GroupMemberRemoved] {
            let filter = LogFilter {
                event: Some(event),
                ..Default::default()
            };
            let (_, total) = f.logs.list(&filter, 10).await.unwrap();
            assert_eq!(total, 1);
        }
    }

    #[tokio::test]
    async fn test_add_member_to_deleted_group_rejected() {
        let f = fixture();
        let group = f.service.create_group(study_group(), None).await.unwrap();
        f.service.delete_group(group.id, None).await.unwrap();

        let result = f
            .service
            .add_member(
                group.id,
                AddMember {
                    user_id: Uuid::now_v7(),
                    user_name: "Ada Lovelace".to_string(),
                },
                None,
            )
            .await;
        assert!(matches!(result, Err(GroupError::Validation(_))));
    }

    #[tokio::test]
    async fn test_remove_unknown_member_is_not_found() {
        let f = fixture();
        let group = f.service.create_group(study_group(), None).await.unwrap();

        let result = f
            .service
            .remove_member(group.id, Uuid::now_v7(), "Nobody".to_string(), None)
            .await;
        assert!(matches!(result, Err(GroupError::MemberNotFound { .. })));
    }
}
