use chrono::{DateTime, Utc};
use domain_activity_log::{DeletedBy, EntityStatus};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// A study group within a course.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseGroup {
    pub id: Uuid,
    pub course_id: Uuid,
    pub name: String,
    pub status: EntityStatus,
    #[schema(value_type = Object)]
    pub deleted_by: DeletedBy,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user's membership in a course group.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserCourseGroup {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub status: EntityStatus,
    #[schema(value_type = Object)]
    pub deleted_by: DeletedBy,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a group
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateGroup {
    pub course_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

/// DTO for adding a member
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AddMember {
    pub user_id: Uuid,
    /// Display name recorded in the activity log.
    #[validate(length(min = 1, max = 200))]
    pub user_name: String,
}

/// Query filters for listing groups
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GroupFilter {
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

impl Default for GroupFilter {
    fn default() -> Self {
        Self {
            page: 1,
            row_per_page: None,
            course: None,
            status: None,
        }
    }
}
