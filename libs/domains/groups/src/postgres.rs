use async_trait::async_trait;
use database::BaseRepository;
use domain_activity_log::{EntityStatus, ParentKind};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::{
    entity::{group, membership},
    error::{GroupError, GroupResult},
    models::{CourseGroup, CreateGroup, GroupFilter, UserCourseGroup},
    repository::{GroupRepository, MembershipRepository},
};

fn db_err(e: impl std::fmt::Display) -> GroupError {
    GroupError::Internal(format!("Database error: {}", e))
}

fn now() -> sea_orm::prelude::DateTimeWithTimeZone {
    chrono::Utc::now().into()
}

pub struct PgGroupRepository {
    base: BaseRepository<group::Entity>,
}

impl PgGroupRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl GroupRepository for PgGroupRepository {
    async fn create(&self, input: CreateGroup) -> GroupResult<CourseGroup> {
        let model = self
            .base
            .insert(group::ActiveModel::from(input))
            .await
            .map_err(db_err)?;

        tracing::info!(group_id = %model.id, "Created course group");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> GroupResult<Option<CourseGroup>> {
        Ok(self.base.find_by_id(id).await.map_err(db_err)?.map(Into::into))
    }

    async fn list(
        &self,
        filter: &GroupFilter,
        rows_per_page: u64,
    ) -> GroupResult<(Vec<CourseGroup>, u64)> {
        let mut query = group::Entity::find();

        if let Some(course_id) = filter.course {
            query = query.filter(group::Column::CourseId.eq(course_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(group::Column::Status.eq(status));
        }

        let total = query.clone().count(self.base.db()).await.map_err(db_err)?;

        let models = query
            .order_by_desc(group::Column::Id)
            .limit(rows_per_page)
            .offset((filter.page.max(1) - 1) * rows_per_page)
            .all(self.base.db())
            .await
            .map_err(db_err)?;

        Ok((models.into_iter().map(Into::into).collect(), total))
    }

    async fn soft_delete(&self, id: Uuid) -> GroupResult<bool> {
        let result = group::Entity::update_many()
            .col_expr(group::Column::Status, Expr::value(EntityStatus::Deleted))
            .col_expr(group::Column::UpdatedAt, Expr::value(now()))
            .filter(group::Column::Id.eq(id))
            .filter(group::Column::Status.ne(EntityStatus::Deleted))
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn restore(&self, id: Uuid) -> GroupResult<bool> {
        let result = group::Entity::update_many()
            .col_expr(group::Column::Status, Expr::value(EntityStatus::Active))
            .col_expr(group::Column::UpdatedAt, Expr::value(now()))
            .filter(group::Column::Id.eq(id))
            .filter(group::Column::Status.eq(EntityStatus::Deleted))
            .filter(group::Column::DeletedParentKind.is_null())
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        if result.rows_affected > 0 {
            tracing::info!(group_id = %id, "Restored course group");
        }
        Ok(result.rows_affected > 0)
    }
}

pub struct PgMembershipRepository {
    base: BaseRepository<membership::Entity>,
}

impl PgMembershipRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl MembershipRepository for PgMembershipRepository {
    async fn add(&self, group_id: Uuid, user_id: Uuid) -> GroupResult<UserCourseGroup> {
        let duplicate = membership::Entity::find()
            .filter(membership::Column::GroupId.eq(group_id))
            .filter(membership::Column::UserId.eq(user_id))
            .filter(membership::Column::Status.ne(EntityStatus::Deleted))
            .one(self.base.db())
            .await
            .map_err(db_err)?
            .is_some();

        if duplicate {
            return Err(GroupError::AlreadyMember { group_id, user_id });
        }

        let model = self
            .base
            .insert(membership::Model::new_active(group_id, user_id))
            .await
            .map_err(db_err)?;

        Ok(model.into())
    }

    async fn find(&self, group_id: Uuid, user_id: Uuid) -> GroupResult<Option<UserCourseGroup>> {
        let model = membership::Entity::find()
            .filter(membership::Column::GroupId.eq(group_id))
            .filter(membership::Column::UserId.eq(user_id))
            .order_by_desc(membership::Column::Id)
            .one(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(model.map(Into::into))
    }

    async fn list_by_group(&self, group_id: Uuid) -> GroupResult<Vec<UserCourseGroup>> {
        let models = membership::Entity::find()
            .filter(membership::Column::GroupId.eq(group_id))
            .order_by_asc(membership::Column::Id)
            .all(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn soft_delete(&self, group_id: Uuid, user_id: Uuid) -> GroupResult<bool> {
        let result = membership::Entity::update_many()
            .col_expr(
                membership::Column::Status,
                Expr::value(EntityStatus::Deleted),
            )
            .col_expr(membership::Column::UpdatedAt, Expr::value(now()))
            .filter(membership::Column::GroupId.eq(group_id))
            .filter(membership::Column::UserId.eq(user_id))
            .filter(membership::Column::Status.ne(EntityStatus::Deleted))
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn cascade_delete_by_group(&self, group_id: Uuid) -> GroupResult<u64> {
        let result = membership::Entity::update_many()
            .col_expr(
                membership::Column::Status,
                Expr::value(EntityStatus::Deleted),
            )
            .col_expr(
                membership::Column::DeletedParentKind,
                Expr::value(Some(ParentKind::Group)),
            )
            .col_expr(
                membership::Column::DeletedParentId,
                Expr::value(Some(group_id)),
            )
            .col_expr(membership::Column::UpdatedAt, Expr::value(now()))
            .filter(membership::Column::GroupId.eq(group_id))
            .filter(membership::Column::Status.ne(EntityStatus::Deleted))
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }

    async fn restore_cascaded_by_group(&self, group_id: Uuid) -> GroupResult<u64> {
        let result = membership::Entity::update_many()
            .col_expr(
                membership::Column::Status,
                Expr::value(EntityStatus::Active),
            )
            .col_expr(
                membership::Column::DeletedParentKind,
                Expr::value(None::<ParentKind>),
            )
            .col_expr(
                membership::Column::DeletedParentId,
                Expr::value(None::<Uuid>),
            )
            .col_expr(membership::Column::UpdatedAt, Expr::value(now()))
            .filter(membership::Column::Status.eq(EntityStatus::Deleted))
            .filter(membership::Column::DeletedParentKind.eq(ParentKind::Group))
            .filter(membership::Column::DeletedParentId.eq(group_id))
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }
}
