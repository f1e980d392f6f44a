use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

/// Errors from the log writer and reader.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("Log entry not found: {0}")]
    NotFound(Uuid),

    #[error("Storage error: {0}")]
    Store(String),
}

pub type LogResult<T> = Result<T, LogError>;

/// Errors from the undo engine.
///
/// The deliberate no-op cases (stale guard, unsupported event) are
/// outcomes, not errors; only genuinely failed operations land here.
#[derive(Debug, Error)]
pub enum UndoError {
    #[error("Log entry not found: {0}")]
    LogNotFound(Uuid),

    #[error("Log entry {0} does not carry a restorable entity reference")]
    MissingReference(Uuid),

    #[error("Storage error: {0}")]
    Store(String),
}

pub type UndoResult<T> = Result<T, UndoError>;

impl From<LogError> for UndoError {
    fn from(err: LogError) -> Self {
        match err {
            LogError::NotFound(id) => UndoError::LogNotFound(id),
            LogError::Store(msg) => UndoError::Store(msg),
        }
    }
}

impl From<LogError> for AppError {
    fn from(err: LogError) -> Self {
        match err {
            LogError::NotFound(id) => AppError::NotFound(format!("Log entry {} not found", id)),
            LogError::Store(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl From<UndoError> for AppError {
    fn from(err: UndoError) -> Self {
        match err {
            UndoError::LogNotFound(id) => {
                AppError::NotFound(format!("Log entry {} not found", id))
            }
            UndoError::MissingReference(id) => AppError::UnprocessableEntity(format!(
                "Log entry {} does not reference a restorable entity",
                id
            )),
            UndoError::Store(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for LogError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl IntoResponse for UndoError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
