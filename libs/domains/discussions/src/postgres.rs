use async_trait::async_trait;
use database::BaseRepository;
use domain_activity_log::EntityStatus;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{DiscussionError, DiscussionResult},
    models::{CreateDiscussion, Discussion, DiscussionFilter},
    repository::DiscussionRepository,
};

fn db_err(e: impl std::fmt::Display) -> DiscussionError {
    DiscussionError::Internal(format!("Database error: {}", e))
}

fn now() -> sea_orm::prelude::DateTimeWithTimeZone {
    chrono::Utc::now().into()
}

pub struct PgDiscussionRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgDiscussionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl DiscussionRepository for PgDiscussionRepository {
    async fn create(&self, input: CreateDiscussion) -> DiscussionResult<Discussion> {
        let model = self
            .base
            .insert(entity::ActiveModel::from(input))
            .await
            .map_err(db_err)?;

        tracing::info!(discussion_id = %model.id, "Started discussion");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> DiscussionResult<Option<Discussion>> {
        Ok(self.base.find_by_id(id).await.map_err(db_err)?.map(Into::into))
    }

    async fn list(
        &self,
        filter: &DiscussionFilter,
        rows_per_page: u64,
    ) -> DiscussionResult<(Vec<Discussion>, u64)> {
        let mut query = entity::Entity::find();

        if let Some(course_id) = filter.course {
            query = query.filter(entity::Column::CourseId.eq(course_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(entity::Column::Status.eq(status));
        }

        let total = query.clone().count(self.base.db()).await.map_err(db_err)?;

        let models = query
            .order_by_desc(entity::Column::Id)
            .limit(rows_per_page)
            .offset((filter.page.max(1) - 1) * rows_per_page)
            .all(self.base.db())
            .await
            .map_err(db_err)?;

        Ok((models.into_iter().map(Into::into).collect(), total))
    }

    async fn soft_delete(&self, id: Uuid) -> DiscussionResult<bool> {
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::Status, Expr::value(EntityStatus::Deleted))
            .col_expr(entity::Column::UpdatedAt, Expr::value(now()))
            .filter(entity::Column::Id.eq(id))
            .filter(entity::Column::Status.ne(EntityStatus::Deleted))
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn restore(&self, id: Uuid) -> DiscussionResult<bool> {
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::Status, Expr::value(EntityStatus::Active))
            .col_expr(entity::Column::UpdatedAt, Expr::value(now()))
            .filter(entity::Column::Id.eq(id))
            .filter(entity::Column::Status.eq(EntityStatus::Deleted))
            .filter(entity::Column::DeletedParentKind.is_null())
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }
}
