use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum GroupError {
    #[error("Group not found: {0}")]
    GroupNotFound(Uuid),

    #[error("User {user_id} is not a member of group {group_id}")]
    MemberNotFound { group_id: Uuid, user_id: Uuid },

    #[error("User {user_id} is already a member of group {group_id}")]
    AlreadyMember { group_id: Uuid, user_id: Uuid },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type GroupResult<T> = Result<T, GroupError>;

impl From<GroupError> for AppError {
    fn from(err: GroupError) -> Self {
        match err {
            GroupError::GroupNotFound(id) => AppError::NotFound(format!("Group {} not found", id)),
            GroupError::MemberNotFound { group_id, user_id } => AppError::NotFound(format!(
                "User {} is not a member of group {}",
                user_id, group_id
            )),
            GroupError::AlreadyMember { group_id, user_id } => AppError::Conflict(format!(
                "User {} is already a member of group {}",
                user_id, group_id
            )),
            GroupError::Validation(msg) => AppError::BadRequest(msg),
            GroupError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for GroupError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
