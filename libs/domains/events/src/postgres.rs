use async_trait::async_trait;
use database::BaseRepository;
use domain_activity_log::{EntityStatus, ParentKind};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use crate::{
    entity::{session_user, user_event},
    error::{EventError, EventResult},
    models::{CreateEvent, EnrollSession, EventFilter, SessionUser, UserEvent},
    repository::{SessionUserRepository, UserEventRepository},
};

fn db_err(e: impl std::fmt::Display) -> EventError {
    EventError::Internal(format!("Database error: {}", e))
}

fn now() -> sea_orm::prelude::DateTimeWithTimeZone {
    chrono::Utc::now().into()
}

pub struct PgUserEventRepository {
    base: BaseRepository<user_event::Entity>,
}

impl PgUserEventRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl UserEventRepository for PgUserEventRepository {
    async fn create(&self, input: CreateEvent) -> EventResult<UserEvent> {
        let model = self
            .base
            .insert(user_event::ActiveModel::from(input))
            .await
            .map_err(db_err)?;

        tracing::info!(event_id = %model.id, "Scheduled user event");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> EventResult<Option<UserEvent>> {
        Ok(self.base.find_by_id(id).await.map_err(db_err)?.map(Into::into))
    }

    async fn list(
        &self,
        filter: &EventFilter,
        rows_per_page: u64,
    ) -> EventResult<(Vec<UserEvent>, u64)> {
        let mut query = user_event::Entity::find();

        if let Some(user) = filter.user {
            query = query.filter(user_event::Column::UserId.eq(user));
        }
        if let Some(unit) = filter.unit {
            query = query.filter(user_event::Column::UnitId.eq(unit));
        }
        if let Some(status) = filter.status {
            query = query.filter(user_event::Column::Status.eq(status));
        }

        let total = query.clone().count(self.base.db()).await.map_err(db_err)?;

        let models = query
            .order_by_desc(user_event::Column::Id)
            .limit(rows_per_page)
            .offset((filter.page.max(1) - 1) * rows_per_page)
            .all(self.base.db())
            .await
            .map_err(db_err)?;

        Ok((models.into_iter().map(Into::into).collect(), total))
    }

    async fn soft_delete(&self, id: Uuid) -> EventResult<bool> {
        let result = user_event::Entity::update_many()
            .col_expr(user_event::Column::Status, Expr::value(EntityStatus::Deleted))
            .col_expr(user_event::Column::UpdatedAt, Expr::value(now()))
            .filter(user_event::Column::Id.eq(id))
            .filter(user_event::Column::Status.ne(EntityStatus::Deleted))
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn restore_direct(&self, id: Uuid) -> EventResult<bool> {
        let result = user_event::Entity::update_many()
            .col_expr(user_event::Column::Status, Expr::value(EntityStatus::Active))
            .col_expr(user_event::Column::UpdatedAt, Expr::value(now()))
            .filter(user_event::Column::Id.eq(id))
            .filter(user_event::Column::Status.eq(EntityStatus::Deleted))
            .filter(user_event::Column::DeletedParentKind.is_null())
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn cascade_delete_for_units(
        &self,
        unit_ids: &[Uuid],
        parent: ParentKind,
        parent_id: Uuid,
    ) -> EventResult<u64> {
        if unit_ids.is_empty() {
            return Ok(0);
        }

        let result = user_event::Entity::update_many()
            .col_expr(user_event::Column::Status, Expr::value(EntityStatus::Deleted))
            .col_expr(
                user_event::Column::DeletedParentKind,
                Expr::value(Some(parent)),
            )
            .col_expr(
                user_event::Column::DeletedParentId,
                Expr::value(Some(parent_id)),
            )
            .col_expr(user_event::Column::UpdatedAt, Expr::value(now()))
            .filter(user_event::Column::UnitId.is_in(unit_ids.to_vec()))
            .filter(user_event::Column::Status.ne(EntityStatus::Deleted))
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }

    async fn restore_cascaded(&self, parent: ParentKind, parent_id: Uuid) -> EventResult<u64> {
        let result = user_event::Entity::update_many()
            .col_expr(user_event::Column::Status, Expr::value(EntityStatus::Active))
            .col_expr(
                user_event::Column::DeletedParentKind,
                Expr::value(None::<ParentKind>),
            )
            .col_expr(user_event::Column::DeletedParentId, Expr::value(None::<Uuid>))
            .col_expr(user_event::Column::UpdatedAt, Expr::value(now()))
            .filter(user_event::Column::Status.eq(EntityStatus::Deleted))
            .filter(user_event::Column::DeletedParentKind.eq(parent))
            .filter(user_event::Column::DeletedParentId.eq(parent_id))
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }
}

pub struct PgSessionUserRepository {
    base: BaseRepository<session_user::Entity>,
}

impl PgSessionUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl SessionUserRepository for PgSessionUserRepository {
    async fn enroll(&self, input: EnrollSession) -> EventResult<SessionUser> {
        let model = self
            .base
            .insert(session_user::ActiveModel::from(input))
            .await
            .map_err(db_err)?;

        tracing::info!(session_id = %model.id, "Enrolled user session");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> EventResult<Option<SessionUser>> {
        Ok(self.base.find_by_id(id).await.map_err(db_err)?.map(Into::into))
    }

    async fn list_by_unit(&self, unit_id: Uuid) -> EventResult<Vec<SessionUser>> {
        let models = session_user::Entity::find()
            .filter(session_user::Column::UnitId.eq(unit_id))
            .order_by_asc(session_user::Column::Id)
            .all(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn submit_grade(&self, id: Uuid, score: f32) -> EventResult<bool> {
        let result = session_user::Entity::update_many()
            .col_expr(session_user::Column::Grade, Expr::value(Some(score)))
            .col_expr(session_user::Column::UpdatedAt, Expr::value(now()))
            .filter(session_user::Column::Id.eq(id))
            .filter(session_user::Column::Status.ne(EntityStatus::Deleted))
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn cascade_delete_for_units(
        &self,
        unit_ids: &[Uuid],
        parent: ParentKind,
        parent_id: Uuid,
    ) -> EventResult<u64> {
        if unit_ids.is_empty() {
            return Ok(0);
        }

        let result = session_user::Entity::update_many()
            .col_expr(
                session_user::Column::Status,
                Expr::value(EntityStatus::Deleted),
            )
            .col_expr(
                session_user::Column::DeletedParentKind,
                Expr::value(Some(parent)),
            )
            .col_expr(
                session_user::Column::DeletedParentId,
                Expr::value(Some(parent_id)),
            )
            .col_expr(session_user::Column::UpdatedAt, Expr::value(now()))
            .filter(session_user::Column::UnitId.is_in(unit_ids.to_vec()))
            .filter(session_user::Column::Status.ne(EntityStatus::Deleted))
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }

    async fn restore_cascaded(&self, parent: ParentKind, parent_id: Uuid) -> EventResult<u64> {
        let result = session_user::Entity::update_many()
            .col_expr(
                session_user::Column::Status,
                Expr::value(EntityStatus::Active),
            )
            .col_expr(
                session_user::Column::DeletedParentKind,
                Expr::value(None::<ParentKind>),
            )
            .col_expr(
                session_user::Column::DeletedParentId,
                Expr::value(None::<Uuid>),
            )
            .col_expr(session_user::Column::UpdatedAt, Expr::value(now()))
            .filter(session_user::Column::Status.eq(EntityStatus::Deleted))
            .filter(session_user::Column::DeletedParentKind.eq(parent))
            .filter(session_user::Column::DeletedParentId.eq(parent_id))
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }
}
