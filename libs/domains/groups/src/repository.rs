use async_trait::async_trait;
use domain_activity_log::{DeletedBy, EntityStatus, ParentKind};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{GroupError, GroupResult};
use crate::models::{CourseGroup, CreateGroup, GroupFilter, UserCourseGroup};

/// Repository trait for course groups
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn create(&self, input: CreateGroup) -> GroupResult<CourseGroup>;

    async fn get_by_id(&self, id: Uuid) -> GroupResult<Option<CourseGroup>>;

    async fn list(
        &self,
        filter: &GroupFilter,
        rows_per_page: u64,
    ) -> GroupResult<(Vec<CourseGroup>, u64)>;

    /// Mark directly deleted. Returns false if already deleted.
    async fn soft_delete(&self, id: Uuid) -> GroupResult<bool>;

    /// Reverse a direct deletion. Returns false unless the row is
    /// exactly (Deleted, Direct).
    async fn restore(&self, id: Uuid) -> GroupResult<bool>;
}

/// Repository trait for group memberships
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Add a live membership row. Fails on a duplicate live membership.
    async fn add(&self, group_id: Uuid, user_id: Uuid) -> GroupResult<UserCourseGroup>;

    async fn find(&self, group_id: Uuid, user_id: Uuid) -> GroupResult<Option<UserCourseGroup>>;

    async fn list_by_group(&self, group_id: Uuid) -> GroupResult<Vec<UserCourseGroup>>;

    /// Mark one membership directly deleted (member removed).
    async fn soft_delete(&self, group_id: Uuid, user_id: Uuid) -> GroupResult<bool>;

    /// Cascade-delete every live membership of the group.
    async fn cascade_delete_by_group(&self, group_id: Uuid) -> GroupResult<u64>;

    /// Restore every membership cascade-deleted by the group.
    async fn restore_cascaded_by_group(&self, group_id: Uuid) -> GroupResult<u64>;
}

/// In-memory implementation of GroupRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryGroupRepository {
    groups: Arc<RwLock<HashMap<Uuid, CourseGroup>>>,
}

impl InMemoryGroupRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn create(&self, input: CreateGroup) -> GroupResult<CourseGroup> {
        let now = chrono::Utc::now();
        let group = CourseGroup {
            id: Uuid::now_v7(),
            course_id: input.course_id,
            name: input.name,
            status: EntityStatus::Active,
            deleted_by: DeletedBy::None,
            created_at: now,
            updated_at: now,
        };

        self.groups.write().await.insert(group.id, group.clone());
        Ok(group)
    }

    async fn get_by_id(&self, id: Uuid) -> GroupResult<Option<CourseGroup>> {
        Ok(self.groups.read().await.get(&id).cloned())
    }

    async fn list(
        &self,
        filter: &GroupFilter,
        rows_per_page: u64,
    ) -> GroupResult<(Vec<CourseGroup>, u64)> {
        let groups = self.groups.read().await;

        let mut result: Vec<CourseGroup> = groups
            .values()
            .filter(|g| filter.course.is_none_or(|c| g.course_id == c))
            .filter(|g| filter.status.is_none_or(|s| g.status == s))
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

    async fn soft_delete(&self, id: Uuid) -> GroupResult<bool> {
        let mut groups = self.groups.write().await;
        match groups.get_mut(&id).filter(|g| g.status.is_live()) {
            Some(group) => {
                group.status = EntityStatus::Deleted;
                group.deleted_by = DeletedBy::Direct;
                group.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn restore(&self, id: Uuid) -> GroupResult<bool> {
        let mut groups = self.groups.write().await;
        match groups
            .get_mut(&id)
            .filter(|g| g.status == EntityStatus::Deleted && g.deleted_by == DeletedBy::Direct)
        {
            Some(group) => {
                group.status = EntityStatus::Active;
                group.deleted_by = DeletedBy::None;
                group.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// In-memory implementation of MembershipRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryMembershipRepository {
    memberships: Arc<RwLock<HashMap<Uuid, UserCourseGroup>>>,
}

impl InMemoryMembershipRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MembershipRepository for InMemoryMembershipRepository {
    async fn add(&self, group_id: Uuid, user_id: Uuid) -> GroupResult<UserCourseGroup> {
        let mut memberships = self.memberships.write().await;

        let duplicate = memberships
            .values()
            .any(|m| m.group_id == group_id && m.user_id == user_id && m.status.is_live());
        if duplicate {
            return Err(GroupError::AlreadyMember { group_id, user_id });
        }

        let now = chrono::Utc::now();
        let membership = UserCourseGroup {
            id: Uuid::now_v7(),
            group_id,
            user_id,
            status: EntityStatus::Active,
            deleted_by: DeletedBy::None,
            created_at: now,
            updated_at: now,
        };

        memberships.insert(membership.id, membership.clone());
        Ok(membership)
    }

    async fn find(&self, group_id: Uuid, user_id: Uuid) -> GroupResult<Option<UserCourseGroup>> {
        Ok(self
            .memberships
            .read()
            .await
            .values()
            .find(|m| m.group_id == group_id && m.user_id == user_id)
            .cloned())
    }

    async fn list_by_group(&self, group_id: Uuid) -> GroupResult<Vec<UserCourseGroup>> {
        let mut result: Vec<UserCourseGroup> = self
            .memberships
            .read()
            .await
            .values()
            .filter(|m| m.group_id == group_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(result)
    }

    async fn soft_delete(&self, group_id: Uuid, user_id: Uuid) -> GroupResult<bool> {
        let mut memberships = self.memberships.write().await;
        match memberships
            .values_mut()
            .find(|m| m.group_id == group_id && m.user_id == user_id && m.status.is_live())
        {
            Some(membership) => {
                membership.status = EntityStatus::Deleted;
                membership.deleted_by = DeletedBy::Direct;
                membership.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn cascade_delete_by_group(&self, group_id: Uuid) -> GroupResult<u64> {
        let mut memberships = self.memberships.write().await;
        let mut affected = 0;

        for membership in memberships.values_mut() {
            if membership.group_id == group_id && membership.status.is_live() {
                membership.status = EntityStatus::Deleted;
                membership.deleted_by = DeletedBy::Cascaded {
                    parent: ParentKind::Group,
                    parent_id: group_id,
                };
                membership.updated_at = chrono::Utc::now();
                affected += 1;
            }
        }

        Ok(affected)
    }

    async fn restore_cascaded_by_group(&self, group_id: Uuid) -> GroupResult<u64> {
        let mut memberships = self.memberships.write().await;
        let expected = DeletedBy::Cascaded {
            parent: ParentKind::Group,
            parent_id: group_id,
        };
        let mut affected = 0;

        for membership in memberships.values_mut() {
            if membership.status == EntityStatus::Deleted && membership.deleted_by == expected {
                membership.status = EntityStatus::Active;
                membership.deleted_by = DeletedBy::None;
                membership.updated_at = chrono::Utc::now();
                affected += 1;
            }
        }

        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_live_membership_rejected() {
        let repo = InMemoryMembershipRepository::new();
        let group_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();

        repo.add(group_id, user_id).await.unwrap();
        let result = repo.add(group_id, user_id).await;
        assert!(matches!(result, Err(GroupError::AlreadyMember { .. })));

        // A removed member can be re-added
        repo.soft_delete(group_id, user_id).await.unwrap();
        assert!(repo.add(group_id, user_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_group_cascade_spares_removed_members() {
        let repo = InMemoryMembershipRepository::new();
        let group_id = Uuid::now_v7();
        let stays = Uuid::now_v7();
        let removed = Uuid::now_v7();

        repo.add(group_id, stays).await.unwrap();
        repo.add(group_id, removed).await.unwrap();
        repo.soft_delete(group_id, removed).await.unwrap();

        assert_eq!(repo.cascade_delete_by_group(group_id).await.unwrap(), 1);
        assert_eq!(repo.restore_cascaded_by_group(group_id).await.unwrap(), 1);

        // The member removed before the group deletion stays removed
        let membership = repo.find(group_id, removed).await.unwrap().unwrap();
        assert_eq!(membership.status, EntityStatus::Deleted);
        assert_eq!(membership.deleted_by, DeletedBy::Direct);

        let membership = repo.find(group_id, stays).await.unwrap().unwrap();
        assert_eq!(membership.status, EntityStatus::Active);
    }
}
