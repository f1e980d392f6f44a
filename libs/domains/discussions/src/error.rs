use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DiscussionError {
    #[error("Discussion not found: {0}")]
    NotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DiscussionResult<T> = Result<T, DiscussionError>;

impl From<DiscussionError> for AppError {
    fn from(err: DiscussionError) -> Self {
        match err {
            DiscussionError::NotFound(id) => {
                AppError::NotFound(format!("Discussion {} not found", id))
            }
            DiscussionError::Validation(msg) => AppError::BadRequest(msg),
            DiscussionError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for DiscussionError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
