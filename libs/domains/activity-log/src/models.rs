//! Data models for the activity log domain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// The event catalogue.
///
/// One value per recordable domain mutation. The catalogue grows over
/// time, so values read back from storage that are no longer (or not
/// yet) known deserialize into [`LogEvent::Unknown`] instead of failing;
/// such entries list without a description and cannot be undone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LogEvent {
    UserCreation,
    UserUpdate,
    UserDeletion,
    UndeleteUser,
    UserLogin,
    UserImport,
    UserExport,
    CourseCreation,
    CourseUpdate,
    CourseDeletion,
    UndeleteCourse,
    IntakeCreation,
    IntakeDeletion,
    UndeleteIntake,
    UnitCreation,
    UnitUpdate,
    UnitDeletion,
    UndeleteUnit,
    GroupCreation,
    GroupUserDeletion,
    UndeleteGroup,
    GroupMemberAdded,
    GroupMemberRemoved,
    DiscussionCreation,
    DiscussionDeletion,
    UndeleteDiscussion,
    NotificationCreation,
    NotificationDeletion,
    UndeleteNotification,
    EventCreation,
    EventDeletion,
    UndeleteEvent,
    GradeSubmitted,
    /// Catch-all for catalogue values this build does not know.
    #[strum(default)]
    Unknown(String),
}

impl Serialize for LogEvent {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for LogEvent {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(LogEvent::from_str(&s).unwrap_or(LogEvent::Unknown(s)))
    }
}

/// Coarse category of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LogKind {
    Create,
    Update,
    Delete,
    Undelete,
}

impl Serialize for LogKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for LogKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        LogKind::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// The entity references a log entry carries, one variant per reference
/// shape. Display fields are captured when the entry is written so
/// deletion entries can still name what was deleted.
///
/// Payloads written by a newer catalogue fall back to [`LogData::Other`]
/// rather than failing to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum LogData {
    User {
        user_id: Uuid,
        full_name: String,
    },
    Course {
        course_id: Uuid,
        name: String,
        code: String,
        intake: bool,
    },
    Unit {
        unit_id: Uuid,
        course_id: Uuid,
        name: String,
    },
    Group {
        group_id: Uuid,
        course_id: Uuid,
        name: String,
    },
    GroupMember {
        group_id: Uuid,
        group_name: String,
        user_id: Uuid,
        user_name: String,
    },
    Discussion {
        discussion_id: Uuid,
        course_id: Uuid,
        title: String,
    },
    Notification {
        notification_id: Uuid,
        title: String,
    },
    Event {
        event_id: Uuid,
        user_id: Uuid,
        title: String,
    },
    Grade {
        user_id: Uuid,
        unit_id: Uuid,
        score: f32,
    },
    Empty,
    #[serde(untagged)]
    Other(serde_json::Value),
}

impl LogData {
    /// Parse a stored payload, falling back to `Other` for shapes this
    /// build does not know.
    pub fn from_value(value: serde_json::Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or(LogData::Other(value))
    }

    /// The course this payload references, if any. Used by the indirect
    /// course filter on the list endpoint.
    pub fn course_id(&self) -> Option<Uuid> {
        match self {
            LogData::Course { course_id, .. }
            | LogData::Unit { course_id, .. }
            | LogData::Group { course_id, .. }
            | LogData::Discussion { course_id, .. } => Some(*course_id),
            _ => None,
        }
    }

    /// Whether the payload is flagged as an intake (cohort) course.
    pub fn is_intake(&self) -> bool {
        matches!(self, LogData::Course { intake: true, .. })
    }
}

/// An immutable audit record of one domain mutation.
///
/// Append-only: after creation the only permitted change is the single
/// `un_delete` false-to-true flip, recorded when the deletion this entry
/// describes has been reversed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub event: LogEvent,
    #[serde(rename = "type")]
    pub kind: LogKind,
    pub actor: Option<Uuid>,
    pub data: LogData,
    #[serde(rename = "unDelete")]
    pub un_delete: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for appending one log entry.
#[derive(Debug, Clone)]
pub struct NewLogEntry {
    pub event: LogEvent,
    pub kind: LogKind,
    pub actor: Option<Uuid>,
    pub data: LogData,
}

/// Sort direction for the list endpoint. Descending (newest first) is
/// the default; ascending serves parent-first threaded views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Query filters for listing log entries.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogFilter {
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: u64,
    /// Page size; clamped to the allowed range.
    #[serde(rename = "rowPerPage")]
    #[param(value_type = Option<u64>)]
    pub row_per_page: Option<u64>,
    /// Exact event match, e.g. `COURSE_DELETION`.
    #[param(value_type = Option<String>)]
    pub event: Option<LogEvent>,
    /// Coarse category match, e.g. `DELETE`.
    #[serde(rename = "type")]
    #[param(value_type = Option<String>)]
    pub kind: Option<LogKind>,
    /// Entries triggered by this user.
    pub user: Option<Uuid>,
    /// Entries whose payload references this course.
    pub course: Option<Uuid>,
    /// Restrict to intake (cohort) course entries.
    pub intake: Option<bool>,
    /// Inclusive lower bound on creation time.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on creation time.
    pub to: Option<DateTime<Utc>>,
    #[serde(default)]
    #[param(value_type = Option<String>)]
    pub sort: SortOrder,
}

fn default_page() -> u64 {
    1
}

impl Default for LogFilter {
    fn default() -> Self {
        Self {
            page: 1,
            row_per_page: None,
            event: None,
            kind: None,
            user: None,
            course: None,
            intake: None,
            from: None,
            to: None,
            sort: SortOrder::Desc,
        }
    }
}

/// A log entry as returned by the list endpoint: the record itself plus
/// the rendered description and, for deletions that can still be
/// reversed, the undo affordance marker.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RenderedLogEntry {
    pub id: Uuid,
    #[schema(value_type = String)]
    pub event: LogEvent,
    #[serde(rename = "type")]
    #[schema(value_type = String)]
    pub kind: LogKind,
    pub actor: Option<Uuid>,
    #[schema(value_type = Object)]
    pub data: LogData,
    #[serde(rename = "unDelete")]
    pub un_delete: bool,
    pub created_at: DateTime<Utc>,
    /// Human-readable description; absent for unknown events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `["UNDO"]` on delete entries that have not been undone yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<Vec<String>>,
}

/// Result of the administrative bulk purge.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PurgeResult {
    #[serde(rename = "deletedCount")]
    pub deleted_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_round_trips_as_screaming_snake() {
        assert_eq!(LogEvent::CourseDeletion.to_string(), "COURSE_DELETION");
        assert_eq!(
            LogEvent::from_str("COURSE_DELETION").unwrap(),
            LogEvent::CourseDeletion
        );
        assert_eq!(LogEvent::UndeleteCourse.to_string(), "UNDELETE_COURSE");
    }

    #[test]
    fn test_unknown_event_is_preserved() {
        let event = LogEvent::from_str("BADGE_AWARDED").unwrap();
        assert_eq!(event, LogEvent::Unknown("BADGE_AWARDED".to_string()));
        assert_eq!(event.to_string(), "BADGE_AWARDED");
    }

    #[test]
    fn test_event_serde_uses_wire_names() {
        let json = serde_json::to_string(&LogEvent::GroupUserDeletion).unwrap();
        assert_eq!(json, "\"GROUP_USER_DELETION\"");

        let back: LogEvent = serde_json::from_str("\"GROUP_USER_DELETION\"").unwrap();
        assert_eq!(back, LogEvent::GroupUserDeletion);
    }

    #[test]
    fn test_log_data_tagged_round_trip() {
        let data = LogData::Course {
            course_id: Uuid::now_v7(),
            name: "Algebra I".to_string(),
            code: "ALG1".to_string(),
            intake: false,
        };
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["entity"], "course");
        assert_eq!(value["name"], "Algebra I");
        assert_eq!(LogData::from_value(value), data);
    }

    #[test]
    fn test_log_data_unknown_payload_falls_back() {
        let value = serde_json::json!({"entity": "badge", "badge_id": "b-1"});
        let data = LogData::from_value(value.clone());
        assert_eq!(data, LogData::Other(value));
    }

    #[test]
    fn test_course_id_reaches_into_indirect_payloads() {
        let course_id = Uuid::now_v7();
        let data = LogData::Unit {
            unit_id: Uuid::now_v7(),
            course_id,
            name: "Limits".to_string(),
        };
        assert_eq!(data.course_id(), Some(course_id));
        assert_eq!(LogData::Empty.course_id(), None);
    }

    #[test]
    fn test_filter_defaults() {
        let filter = LogFilter::default();
        assert_eq!(filter.page, 1);
        assert_eq!(filter.sort, SortOrder::Desc);
        assert!(filter.event.is_none());
    }
}
