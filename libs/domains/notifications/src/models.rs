use chrono::{DateTime, Utc};
use domain_activity_log::{DeletedBy, EntityStatus};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// An in-app announcement shown to learners.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub status: EntityStatus,
    #[schema(value_type = Object)]
    pub deleted_by: DeletedBy,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// DTO for publishing a notification
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateNotification {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(min = 1))]
    pub body: String,
}

/// Query filters for listing notifications
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NotificationFilter {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(rename = "rowPerPage")]
    #[param(value_type = Option<u64>)]
    pub row_per_page: Option<u64>,
    #[param(value_type = Option<String>)]
    pub status: Option<EntityStatus>,
}

fn default_page() -> u64 {
    1
}

impl Default for NotificationFilter {
    fn default() -> Self {
        Self {
            page: 1,
            row_per_page: None,
            status: None,
        }
    }
}
