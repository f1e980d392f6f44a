use async_trait::async_trait;
use database::BaseRepository;
use domain_activity_log::EntityStatus;
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{UserError, UserResult},
    models::{CreateUser, UpdateUser, User, UserFilter},
    repository::UserRepository,
};

pub struct PgUserRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn now() -> sea_orm::prelude::DateTimeWithTimeZone {
        chrono::Utc::now().into()
    }
}

fn db_err(e: impl std::fmt::Display) -> UserError {
    UserError::Internal(format!("Database error: {}", e))
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, input: CreateUser) -> UserResult<User> {
        if self.exists_by_username(&input.username).await? {
            return Err(UserError::DuplicateUsername(input.username));
        }

        let active_model: entity::ActiveModel = input.into();
        let model = self.base.insert(active_model).await.map_err(db_err)?;

        tracing::info!(user_id = %model.id, "Created user");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        let model = self.base.find_by_id(id).await.map_err(db_err)?;
        Ok(model.map(Into::into))
    }

    async fn list(&self, filter: &UserFilter, rows_per_page: u64) -> UserResult<(Vec<User>, u64)> {
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

    async fn update(&self, id: Uuid, input: UpdateUser) -> UserResult<User> {
        let model = self
            .base
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .ok_or(UserError::NotFound(id))?;

        let mut active: entity::ActiveModel = model.into_active_model();
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(first_name) = input.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = input.last_name {
            active.last_name = Set(last_name);
        }
        active.updated_at = Set(Self::now());

        let model = self.base.update(active).await.map_err(db_err)?;
        Ok(model.into())
    }

    async fn exists_by_username(&self, username: &str) -> UserResult<bool> {
        let exists = entity::Entity::find()
            .filter(entity::Column::Username.eq(username))
            .one(self.base.db())
            .await
            .map_err(db_err)?
            .is_some();

        Ok(exists)
    }

    async fn record_login(&self, id: Uuid) -> UserResult<bool> {
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::LastLoginAt, Expr::value(Some(Self::now())))
            .filter(entity::Column::Id.eq(id))
            .filter(entity::Column::Status.ne(EntityStatus::Deleted))
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn set_status(&self, id: Uuid, status: EntityStatus) -> UserResult<bool> {
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::Status, Expr::value(status))
            .col_expr(entity::Column::UpdatedAt, Expr::value(Self::now()))
            .filter(entity::Column::Id.eq(id))
            .filter(entity::Column::Status.ne(EntityStatus::Deleted))
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn soft_delete(&self, id: Uuid) -> UserResult<bool> {
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::Status, Expr::value(EntityStatus::Deleted))
            .col_expr(entity::Column::UpdatedAt, Expr::value(Self::now()))
            .filter(entity::Column::Id.eq(id))
            .filter(entity::Column::Status.ne(EntityStatus::Deleted))
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn delete_permanently(&self, id: Uuid) -> UserResult<bool> {
        // Single conditional update: anonymize identifiers, preserve the
        // originals in the backup columns.
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::BackupEmail, Expr::col(entity::Column::Email).into())
            .col_expr(
                entity::Column::BackupUsername,
                Expr::col(entity::Column::Username).into(),
            )
            .col_expr(
                entity::Column::Email,
                Expr::value(format!("deleted-{}@removed.invalid", id)),
            )
            .col_expr(entity::Column::Username, Expr::value(format!("deleted-{}", id)))
            .col_expr(entity::Column::Status, Expr::value(EntityStatus::Deleted))
            .col_expr(entity::Column::UpdatedAt, Expr::value(Self::now()))
            .filter(entity::Column::Id.eq(id))
            .filter(entity::Column::Status.ne(EntityStatus::Deleted))
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn restore(&self, id: Uuid) -> UserResult<bool> {
        // Guard and compensating write in one conditional update: only a
        // row still in (Deleted, Direct) is touched.
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::Status, Expr::value(EntityStatus::Active))
            .col_expr(
                entity::Column::Email,
                Expr::cust("COALESCE(backup_email, email)"),
            )
            .col_expr(
                entity::Column::Username,
                Expr::cust("COALESCE(backup_username, username)"),
            )
            .col_expr(entity::Column::BackupEmail, Expr::value(None::<String>))
            .col_expr(entity::Column::BackupUsername, Expr::value(None::<String>))
            .col_expr(entity::Column::UpdatedAt, Expr::value(Self::now()))
            .filter(entity::Column::Id.eq(id))
            .filter(entity::Column::Status.eq(EntityStatus::Deleted))
            .filter(entity::Column::DeletedParentKind.is_null())
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        if result.rows_affected > 0 {
            tracing::info!(user_id = %id, "Restored user");
        }
        Ok(result.rows_affected > 0)
    }
}
