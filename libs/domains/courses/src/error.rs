use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CourseError {
    #[error("Course not found: {0}")]
    CourseNotFound(Uuid),

    #[error("Unit not found: {0}")]
    UnitNotFound(Uuid),

    #[error("Course with code '{0}' already exists")]
    DuplicateCode(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CourseResult<T> = Result<T, CourseError>;

impl From<CourseError> for AppError {
    fn from(err: CourseError) -> Self {
        match err {
            CourseError::CourseNotFound(id) => {
                AppError::NotFound(format!("Course {} not found", id))
            }
            CourseError::UnitNotFound(id) => AppError::NotFound(format!("Unit {} not found", id)),
            CourseError::DuplicateCode(code) => {
                AppError::Conflict(format!("Course with code '{}' already exists", code))
            }
            CourseError::Validation(msg) => AppError::BadRequest(msg),
            CourseError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl From<domain_events::EventError> for CourseError {
    fn from(err: domain_events::EventError) -> Self {
        CourseError::Internal(err.to_string())
    }
}

impl IntoResponse for CourseError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
