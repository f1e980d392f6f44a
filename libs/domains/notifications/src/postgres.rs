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
    error::{NotificationError, NotificationResult},
    models::{CreateNotification, Notification, NotificationFilter},
    repository::NotificationRepository,
};

fn db_err(e: impl std::fmt::Display) -> NotificationError {
    NotificationError::Internal(format!("Database error: {}", e))
}

fn now() -> sea_orm::prelude::DateTimeWithTimeZone {
    chrono::Utc::now().into()
}

pub struct PgNotificationRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgNotificationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn create(&self, input: CreateNotification) -> NotificationResult<Notification> {
        let model = self
            .base
            .insert(entity::ActiveModel::from(input))
            .await
            .map_err(db_err)?;

        tracing::info!(notification_id = %model.id, "Published notification");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> NotificationResult<Option<Notification>> {
        Ok(self.base.find_by_id(id).await.map_err(db_err)?.map(Into::into))
    }

    async fn list(
        &self,
        filter: &NotificationFilter,
        rows_per_page: u64,
    ) -> NotificationResult<(Vec<Notification>, u64)> {
        let mut query = entity::Entity::find();

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

    async fn set_status(&self, id: Uuid, status: EntityStatus) -> NotificationResult<bool> {
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::Status, Expr::value(status))
            .col_expr(entity::Column::UpdatedAt, Expr::value(now()))
            .filter(entity::Column::Id.eq(id))
            .filter(entity::Column::Status.ne(EntityStatus::Deleted))
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn soft_delete(&self, id: Uuid) -> NotificationResult<bool> {
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

    async fn restore(&self, id: Uuid) -> NotificationResult<bool> {
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
