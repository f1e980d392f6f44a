use crate::models::UserEvent;
use domain_activity_log::{DeletedBy, EntityStatus, ParentKind};
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

/// Sea-ORM entity for the user_events table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub unit_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub title: String,
    pub starts_at: DateTimeWithTimeZone,
    pub status: EntityStatus,
    pub deleted_parent_kind: Option<ParentKind>,
    pub deleted_parent_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for UserEvent {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            unit_id: model.unit_id,
            title: model.title,
            starts_at: model.starts_at.into(),
            status: model.status,
            deleted_by: DeletedBy::from_columns(
                model.status,
                model.deleted_parent_kind,
                model.deleted_parent_id,
            ),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<crate::models::CreateEvent> for ActiveModel {
    fn from(input: crate::models::CreateEvent) -> Self {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();

        ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(input.user_id),
            unit_id: Set(input.unit_id),
            title: Set(input.title),
            starts_at: Set(input.starts_at.into()),
            status: Set(EntityStatus::Active),
            deleted_parent_kind: Set(None),
            deleted_parent_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}
