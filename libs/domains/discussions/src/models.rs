use chrono::{DateTime, Utc};
use domain_activity_log::{DeletedBy, EntityStatus};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// A discussion thread attached to a course.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Discussion {
    pub id: Uuid,
    pub course_id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub status: EntityStatus,
    #[schema(value_type = Object)]
    pub deleted_by: DeletedBy,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for starting a discussion
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateDiscussion {
    pub course_id: Uuid,
    pub author_id: Uuid,
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(min = 1))]
    pub body: String,
}

/// Query filters for listing discussions
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DiscussionFilter {
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

impl Default for DiscussionFilter {
    fn default() -> Self {
        Self {
            page: 1,
            row_per_page: None,
            course: None,
            status: None,
        }
    }
}
