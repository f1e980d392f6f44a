use crate::error::{LogError, LogResult};
use crate::models::{LogData, LogEntry, LogEvent, LogKind, NewLogEntry};
use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sea-ORM entity for the activity_logs table.
///
/// `event` and `kind` are stored as text, not database enums, so rows
/// written by newer builds with a larger catalogue still load.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub event: String,
    #[sea_orm(column_type = "Text")]
    pub kind: String,
    pub actor: Option<Uuid>,
    #[sea_orm(column_type = "JsonBinary")]
    pub data: Json,
    pub un_delete: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert a stored row into the domain model. The event falls back
    /// to `Unknown`; a kind outside the closed set means the row was
    /// corrupted and is surfaced as a storage error.
    pub fn try_into_entry(self) -> LogResult<LogEntry> {
        let kind = LogKind::from_str(&self.kind)
            .map_err(|_| LogError::Store(format!("unrecognized log kind '{}'", self.kind)))?;

        Ok(LogEntry {
            id: self.id,
            event: LogEvent::from_str(&self.event)
                .unwrap_or(LogEvent::Unknown(self.event)),
            kind,
            actor: self.actor,
            data: LogData::from_value(self.data),
            un_delete: self.un_delete,
            created_at: self.created_at.into(),
        })
    }
}

impl From<NewLogEntry> for ActiveModel {
    fn from(input: NewLogEntry) -> Self {
        let data = serde_json::to_value(&input.data)
            .expect("log payload serialization cannot fail");

        ActiveModel {
            id: Set(Uuid::now_v7()),
            event: Set(input.event.to_string()),
            kind: Set(input.kind.to_string()),
            actor: Set(input.actor),
            data: Set(data),
            un_delete: Set(false),
            created_at: Set(chrono::Utc::now().into()),
        }
    }
}
