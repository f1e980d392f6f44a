use chrono::{DateTime, Utc};
use domain_activity_log::{DeletedBy, EntityStatus};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// A calendar entry on a user's schedule, tied to a unit.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub unit_id: Uuid,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub status: EntityStatus,
    #[schema(value_type = Object)]
    pub deleted_by: DeletedBy,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user's study session record for a unit, carrying the grade.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionUser {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub user_id: Uuid,
    pub grade: Option<f32>,
    pub status: EntityStatus,
    #[schema(value_type = Object)]
    pub deleted_by: DeletedBy,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for scheduling a user event
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateEvent {
    pub user_id: Uuid,
    pub unit_id: Uuid,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub starts_at: DateTime<Utc>,
}

/// Query filters for listing user events
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventFilter {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(rename = "rowPerPage")]
    #[param(value_type = Option<u64>)]
    pub row_per_page: Option<u64>,
    pub user: Option<Uuid>,
    pub unit: Option<Uuid>,
    #[param(value_type = Option<String>)]
    pub status: Option<EntityStatus>,
}

fn default_page() -> u64 {
    1
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            page: 1,
            row_per_page: None,
            user: None,
            unit: None,
            status: None,
        }
    }
}

/// DTO for enrolling a user into a unit session
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct EnrollSession {
    pub unit_id: Uuid,
    pub user_id: Uuid,
}

/// DTO for submitting a grade on a session
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubmitGrade {
    #[validate(range(min = 0.0, max = 100.0))]
    pub score: f32,
}
