use async_trait::async_trait;
use database::BaseRepository;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::{
    entity,
    error::{LogError, LogResult},
    models::{LogEntry, LogFilter, NewLogEntry, SortOrder},
    repository::LogRepository,
};

pub struct PgLogRepository {
    base: BaseRepository<entity::Entity>,
}

impl PgLogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    fn filtered_query(filter: &LogFilter) -> sea_orm::Select<entity::Entity> {
        let mut query = entity::Entity::find();

        if let Some(event) = &filter.event {
            query = query.filter(entity::Column::Event.eq(event.to_string()));
        }

        if let Some(kind) = filter.kind {
            query = query.filter(entity::Column::Kind.eq(kind.to_string()));
        }

        if let Some(user) = filter.user {
            query = query.filter(entity::Column::Actor.eq(user));
        }

        // Indirect filters reach into the JSONB payload
        if let Some(course) = filter.course {
            query = query.filter(Expr::cust_with_values(
                "data->>'course_id' = $1",
                [course.to_string()],
            ));
        }

        if let Some(intake) = filter.intake {
            query = query.filter(Expr::cust_with_values(
                "COALESCE(data->>'intake', 'false') = $1",
                [intake.to_string()],
            ));
        }

        if let Some(from) = filter.from {
            query = query.filter(entity::Column::CreatedAt.gte(from));
        }

        if let Some(to) = filter.to {
            query = query.filter(entity::Column::CreatedAt.lte(to));
        }

        query
    }
}

#[async_trait]
impl LogRepository for PgLogRepository {
    async fn insert(&self, input: NewLogEntry) -> LogResult<LogEntry> {
        let active_model: entity::ActiveModel = input.into();

        let model = self
            .base
            .insert(active_model)
            .await
            .map_err(|e| LogError::Store(format!("Database error: {}", e)))?;

        tracing::debug!(log_id = %model.id, event = %model.event, "Appended log entry");
        model.try_into_entry()
    }

    async fn find_by_id(&self, id: Uuid) -> LogResult<Option<LogEntry>> {
        let model = self
            .base
            .find_by_id(id)
            .await
            .map_err(|e| LogError::Store(format!("Database error: {}", e)))?;

        model.map(entity::Model::try_into_entry).transpose()
    }

    async fn list(
        &self,
        filter: &LogFilter,
        rows_per_page: u64,
    ) -> LogResult<(Vec<LogEntry>, u64)> {
        let query = Self::filtered_query(filter);

        let total = query
            .clone()
            .count(self.base.db())
            .await
            .map_err(|e| LogError::Store(format!("Database error: {}", e)))?;

        // UUIDv7 ids are time-ordered, so id order is chronological order
        let query = match filter.sort {
            SortOrder::Asc => query.order_by_asc(entity::Column::Id),
            SortOrder::Desc => query.order_by_desc(entity::Column::Id),
        };

        let offset = (filter.page.max(1) - 1) * rows_per_page;
        let models = query
            .limit(rows_per_page)
            .offset(offset)
            .all(self.base.db())
            .await
            .map_err(|e| LogError::Store(format!("Database error: {}", e)))?;

        let entries = models
            .into_iter()
            .map(entity::Model::try_into_entry)
            .collect::<LogResult<Vec<_>>>()?;

        Ok((entries, total))
    }

    async fn mark_undeleted(&self, id: Uuid) -> LogResult<bool> {
        // Conditional update: the flip happens at most once even under
        // concurrent undo attempts.
        let result = entity::Entity::update_many()
            .col_expr(entity::Column::UnDelete, Expr::value(true))
            .filter(entity::Column::Id.eq(id))
            .filter(entity::Column::UnDelete.eq(false))
            .exec(self.base.db())
            .await
            .map_err(|e| LogError::Store(format!("Database error: {}", e)))?;

        Ok(result.rows_affected > 0)
    }

    async fn purge(&self) -> LogResult<u64> {
        let result = entity::Entity::delete_many()
            .exec(self.base.db())
            .await
            .map_err(|e| LogError::Store(format!("Database error: {}", e)))?;

        tracing::info!(deleted = result.rows_affected, "Purged activity log");
        Ok(result.rows_affected)
    }
}
