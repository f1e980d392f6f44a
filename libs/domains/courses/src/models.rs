use chrono::{DateTime, Utc};
use domain_activity_log::{DeletedBy, EntityStatus};
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// A course, or an intake (a cohort-bound run of a course).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    /// Short course code, e.g. "ALG1".
    pub code: String,
    pub description: String,
    /// Intakes are scheduled cohort runs; they share the course
    /// lifecycle but are logged under the intake events.
    pub intake: bool,
    pub status: EntityStatus,
    #[schema(value_type = Object)]
    pub deleted_by: DeletedBy,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What kind of content a unit carries.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "unit_kind")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UnitKind {
    /// Authored lesson content; starts in Draft until published.
    #[default]
    #[sea_orm(string_value = "lesson")]
    Lesson,
    #[sea_orm(string_value = "assessment")]
    Assessment,
    #[sea_orm(string_value = "resource")]
    Resource,
}

impl UnitKind {
    /// Lessons go through an authoring phase before activation.
    pub fn initial_status(&self) -> EntityStatus {
        match self {
            UnitKind::Lesson => EntityStatus::Draft,
            _ => EntityStatus::Active,
        }
    }
}

/// A unit of study within a course.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Unit {
    pub id: Uuid,
    pub course_id: Uuid,
    pub name: String,
    pub kind: UnitKind,
    pub status: EntityStatus,
    #[schema(value_type = Object)]
    pub deleted_by: DeletedBy,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a course
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCourse {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub code: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub intake: bool,
}

/// DTO for updating a course
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCourse {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Query filters for listing courses
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseFilter {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(rename = "rowPerPage")]
    #[param(value_type = Option<u64>)]
    pub row_per_page: Option<u64>,
    #[param(value_type = Option<String>)]
    pub status: Option<EntityStatus>,
    pub intake: Option<bool>,
}

/// DTO for creating a unit
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUnit {
    pub course_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub kind: UnitKind,
}

/// DTO for updating a unit
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUnit {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
}

/// Query filters for listing units
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UnitFilter {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(rename = "rowPerPage")]
    #[param(value_type = Option<u64>)]
    pub row_per_page: Option<u64>,
    pub course: Option<Uuid>,
    #[param(value_type = Option<String>)]
    pub status: Option<EntityStatus>,
}

fn default_page() -> u64 {
    1
}

impl Default for CourseFilter {
    fn default() -> Self {
        Self {
            page: 1,
            row_per_page: None,
            status: None,
            intake: None,
        }
    }
}

impl Default for UnitFilter {
    fn default() -> Self {
        Self {
            page: 1,
            row_per_page: None,
            course: None,
            status: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lessons_start_in_draft() {
        assert_eq!(UnitKind::Lesson.initial_status(), EntityStatus::Draft);
        assert_eq!(UnitKind::Assessment.initial_status(), EntityStatus::Active);
        assert_eq!(UnitKind::Resource.initial_status(), EntityStatus::Active);
    }
}
