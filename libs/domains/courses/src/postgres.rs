use async_trait::async_trait;
use database::BaseRepository;
use domain_activity_log::{EntityStatus, ParentKind};
use sea_orm::sea_query::Expr;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::{
    entity::{course, unit},
    error::{CourseError, CourseResult},
    models::{
        Course, CourseFilter, CreateCourse, CreateUnit, Unit, UnitFilter, UpdateCourse, UpdateUnit,
    },
    repository::{CourseRepository, UnitRepository},
};

fn db_err(e: impl std::fmt::Display) -> CourseError {
    CourseError::Internal(format!("Database error: {}", e))
}

fn now() -> sea_orm::prelude::DateTimeWithTimeZone {
    chrono::Utc::now().into()
}

pub struct PgCourseRepository {
    base: BaseRepository<course::Entity>,
}

impl PgCourseRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl CourseRepository for PgCourseRepository {
    async fn create(&self, input: CreateCourse) -> CourseResult<Course> {
        if self.exists_by_code(&input.code).await? {
            return Err(CourseError::DuplicateCode(input.code));
        }

        let model = self
            .base
            .insert(course::ActiveModel::from(input))
            .await
            .map_err(db_err)?;

        tracing::info!(course_id = %model.id, code = %model.code, "Created course");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> CourseResult<Option<Course>> {
        Ok(self.base.find_by_id(id).await.map_err(db_err)?.map(Into::into))
    }

    async fn list(
        &self,
        filter: &CourseFilter,
        rows_per_page: u64,
    ) -> CourseResult<(Vec<Course>, u64)> {
        let mut query = course::Entity::find();

        if let Some(status) = filter.status {
            query = query.filter(course::Column::Status.eq(status));
        }
        if let Some(intake) = filter.intake {
            query = query.filter(course::Column::Intake.eq(intake));
        }

        let total = query.clone().count(self.base.db()).await.map_err(db_err)?;

        let models = query
            .order_by_desc(course::Column::Id)
            .limit(rows_per_page)
            .offset((filter.page.max(1) - 1) * rows_per_page)
            .all(self.base.db())
            .await
            .map_err(db_err)?;

        Ok((models.into_iter().map(Into::into).collect(), total))
    }

    async fn update(&self, id: Uuid, input: UpdateCourse) -> CourseResult<Course> {
        let model = self
            .base
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .ok_or(CourseError::CourseNotFound(id))?;

        let mut active = model.into_active_model();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        active.updated_at = Set(now());

        let model = self.base.update(active).await.map_err(db_err)?;
        Ok(model.into())
    }

    async fn exists_by_code(&self, code: &str) -> CourseResult<bool> {
        let exists = course::Entity::find()
            .filter(course::Column::Code.eq(code))
            .one(self.base.db())
            .await
            .map_err(db_err)?
            .is_some();

        Ok(exists)
    }

    async fn set_status(&self, id: Uuid, status: EntityStatus) -> CourseResult<bool> {
        let result = course::Entity::update_many()
            .col_expr(course::Column::Status, Expr::value(status))
            .col_expr(course::Column::UpdatedAt, Expr::value(now()))
            .filter(course::Column::Id.eq(id))
            .filter(course::Column::Status.ne(EntityStatus::Deleted))
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn soft_delete(&self, id: Uuid) -> CourseResult<bool> {
        let result = course::Entity::update_many()
            .col_expr(course::Column::Status, Expr::value(EntityStatus::Deleted))
            .col_expr(course::Column::UpdatedAt, Expr::value(now()))
            .filter(course::Column::Id.eq(id))
            .filter(course::Column::Status.ne(EntityStatus::Deleted))
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn restore(&self, id: Uuid) -> CourseResult<bool> {
        let result = course::Entity::update_many()
            .col_expr(course::Column::Status, Expr::value(EntityStatus::Active))
            .col_expr(course::Column::UpdatedAt, Expr::value(now()))
            .filter(course::Column::Id.eq(id))
            .filter(course::Column::Status.eq(EntityStatus::Deleted))
            .filter(course::Column::DeletedParentKind.is_null())
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        if result.rows_affected > 0 {
            tracing::info!(course_id = %id, "Restored course");
        }
        Ok(result.rows_affected > 0)
    }
}

pub struct PgUnitRepository {
    base: BaseRepository<unit::Entity>,
}

impl PgUnitRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }
}

#[async_trait]
impl UnitRepository for PgUnitRepository {
    async fn create(&self, input: CreateUnit) -> CourseResult<Unit> {
        let model = self
            .base
            .insert(unit::ActiveModel::from(input))
            .await
            .map_err(db_err)?;

        tracing::info!(unit_id = %model.id, course_id = %model.course_id, "Created unit");
        Ok(model.into())
    }

    async fn get_by_id(&self, id: Uuid) -> CourseResult<Option<Unit>> {
        Ok(self.base.find_by_id(id).await.map_err(db_err)?.map(Into::into))
    }

    async fn list(
        &self,
        filter: &UnitFilter,
        rows_per_page: u64,
    ) -> CourseResult<(Vec<Unit>, u64)> {
        let mut query = unit::Entity::find();

        if let Some(course_id) = filter.course {
            query = query.filter(unit::Column::CourseId.eq(course_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(unit::Column::Status.eq(status));
        }

        let total = query.clone().count(self.base.db()).await.map_err(db_err)?;

        let models = query
            .order_by_desc(unit::Column::Id)
            .limit(rows_per_page)
            .offset((filter.page.max(1) - 1) * rows_per_page)
            .all(self.base.db())
            .await
            .map_err(db_err)?;

        Ok((models.into_iter().map(Into::into).collect(), total))
    }

    async fn update(&self, id: Uuid, input: UpdateUnit) -> CourseResult<Unit> {
        let model = self
            .base
            .find_by_id(id)
            .await
            .map_err(db_err)?
            .ok_or(CourseError::UnitNotFound(id))?;

        let mut active = model.into_active_model();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        active.updated_at = Set(now());

        let model = self.base.update(active).await.map_err(db_err)?;
        Ok(model.into())
    }

    async fn ids_by_course(&self, course_id: Uuid) -> CourseResult<Vec<Uuid>> {
        let ids = unit::Entity::find()
            .select_only()
            .column(unit::Column::Id)
            .filter(unit::Column::CourseId.eq(course_id))
            .into_tuple::<Uuid>()
            .all(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(ids)
    }

    async fn set_status(&self, id: Uuid, status: EntityStatus) -> CourseResult<bool> {
        let result = unit::Entity::update_many()
            .col_expr(unit::Column::Status, Expr::value(status))
            .col_expr(unit::Column::UpdatedAt, Expr::value(now()))
            .filter(unit::Column::Id.eq(id))
            .filter(unit::Column::Status.ne(EntityStatus::Deleted))
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn soft_delete(&self, id: Uuid) -> CourseResult<bool> {
        let result = unit::Entity::update_many()
            .col_expr(unit::Column::Status, Expr::value(EntityStatus::Deleted))
            .col_expr(unit::Column::UpdatedAt, Expr::value(now()))
            .filter(unit::Column::Id.eq(id))
            .filter(unit::Column::Status.ne(EntityStatus::Deleted))
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn restore_direct(&self, id: Uuid) -> CourseResult<bool> {
        let result = unit::Entity::update_many()
            .col_expr(unit::Column::Status, Expr::value(EntityStatus::Active))
            .col_expr(unit::Column::UpdatedAt, Expr::value(now()))
            .filter(unit::Column::Id.eq(id))
            .filter(unit::Column::Status.eq(EntityStatus::Deleted))
            .filter(unit::Column::DeletedParentKind.is_null())
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn cascade_delete_by_course(&self, course_id: Uuid) -> CourseResult<u64> {
        let result = unit::Entity::update_many()
            .col_expr(unit::Column::Status, Expr::value(EntityStatus::Deleted))
            .col_expr(
                unit::Column::DeletedParentKind,
                Expr::value(Some(ParentKind::Course)),
            )
            .col_expr(unit::Column::DeletedParentId, Expr::value(Some(course_id)))
            .col_expr(unit::Column::UpdatedAt, Expr::value(now()))
            .filter(unit::Column::CourseId.eq(course_id))
            .filter(unit::Column::Status.ne(EntityStatus::Deleted))
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }

    async fn restore_cascaded_by_course(&self, course_id: Uuid) -> CourseResult<u64> {
        let result = unit::Entity::update_many()
            .col_expr(unit::Column::Status, Expr::value(EntityStatus::Active))
            .col_expr(
                unit::Column::DeletedParentKind,
                Expr::value(None::<ParentKind>),
            )
            .col_expr(unit::Column::DeletedParentId, Expr::value(None::<Uuid>))
            .col_expr(unit::Column::UpdatedAt, Expr::value(now()))
            .filter(unit::Column::Status.eq(EntityStatus::Deleted))
            .filter(unit::Column::DeletedParentKind.eq(ParentKind::Course))
            .filter(unit::Column::DeletedParentId.eq(course_id))
            .exec(self.base.db())
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }
}
