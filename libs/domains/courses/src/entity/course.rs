use crate::models::Course;
use domain_activity_log::{DeletedBy, EntityStatus, ParentKind};
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

/// Sea-ORM entity for the courses table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub code: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub intake: bool,
    pub status: EntityStatus,
    pub deleted_parent_kind: Option<ParentKind>,
    pub deleted_parent_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Course {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            code: model.code,
            description: model.description,
            intake: model.intake,
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

impl From<crate::models::CreateCourse> for ActiveModel {
    fn from(input: crate::models::CreateCourse) -> Self {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();

        ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name),
            code: Set(input.code),
            description: Set(input.description),
            intake: Set(input.intake),
            status: Set(EntityStatus::Active),
            deleted_parent_kind: Set(None),
            deleted_parent_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}
