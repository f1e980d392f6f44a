use crate::models::User;
use domain_activity_log::{DeletedBy, EntityStatus, ParentKind};
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};

/// Sea-ORM entity for the users table
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub username: String,
    #[sea_orm(column_type = "Text")]
    pub email: String,
    #[sea_orm(column_type = "Text")]
    pub first_name: String,
    #[sea_orm(column_type = "Text")]
    pub last_name: String,
    pub status: EntityStatus,
    pub deleted_parent_kind: Option<ParentKind>,
    pub deleted_parent_id: Option<Uuid>,
    #[sea_orm(column_type = "Text", nullable)]
    pub backup_email: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub backup_username: Option<String>,
    pub last_login_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            status: model.status,
            deleted_by: DeletedBy::from_columns(
                model.status,
                model.deleted_parent_kind,
                model.deleted_parent_id,
            ),
            backup_email: model.backup_email,
            backup_username: model.backup_username,
            last_login_at: model.last_login_at.map(Into::into),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<crate::models::CreateUser> for ActiveModel {
    fn from(input: crate::models::CreateUser) -> Self {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();

        ActiveModel {
            id: Set(Uuid::now_v7()),
            username: Set(input.username),
            email: Set(input.email),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            status: Set(EntityStatus::Active),
            deleted_parent_kind: Set(None),
            deleted_parent_id: Set(None),
            backup_email: Set(None),
            backup_username: Set(None),
            last_login_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}
