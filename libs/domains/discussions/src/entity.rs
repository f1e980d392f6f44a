use crate::models::Discussion;
use domain_activity_log::{DeletedBy, EntityStatus, ParentKind};
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

/// Sea-ORM entity for the discussions table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "discussions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub course_id: Uuid,
    pub author_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub status: EntityStatus,
    pub deleted_parent_kind: Option<ParentKind>,
    pub deleted_parent_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Discussion {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            course_id: model.course_id,
            author_id: model.author_id,
            title: model.title,
            body: model.body,
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

impl From<crate::models::CreateDiscussion> for ActiveModel {
    fn from(input: crate::models::CreateDiscussion) -> Self {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();

        ActiveModel {
            id: Set(Uuid::now_v7()),
            course_id: Set(input.course_id),
            author_id: Set(input.author_id),
            title: Set(input.title),
            body: Set(input.body),
            status: Set(EntityStatus::Active),
            deleted_parent_kind: Set(None),
            deleted_parent_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}
