use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event not found: {0}")]
    EventNotFound(Uuid),

    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type EventResult<T> = Result<T, EventError>;

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::EventNotFound(id) => {
                AppError::NotFound(format!("Event {} not found", id))
            }
            EventError::SessionNotFound(id) => {
                AppError::NotFound(format!("Session {} not found", id))
            }
            EventError::Validation(msg) => AppError::BadRequest(msg),
            EventError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
