use axum::{
    extract::{Query, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{BadRequestUuidResponse, InternalServerErrorResponse, NotFoundResponse},
    extract_user_id, Paginated, UuidPath,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::error::{LogResult, UndoResult};
use crate::models::{LogFilter, PurgeResult, RenderedLogEntry};
use crate::reader::LogReader;
use crate::repository::LogRepository;
use crate::undo::{UndoEngine, UndoOutcome};

const TAG: &str = "activity-log";

/// OpenAPI documentation for the activity log API
#[derive(OpenApi)]
#[openapi(
    paths(list_logs, undo_event, clean_logs),
    components(
        schemas(RenderedLogEntry, PurgeResult, UndoResponse, UndoOutcome),
        responses(NotFoundResponse, BadRequestUuidResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = TAG, description = "Activity log and undo endpoints")
    )
)]
pub struct ApiDoc;

/// Shared state for the activity log routes.
#[derive(Clone)]
pub struct LogsState {
    pub reader: Arc<LogReader>,
    pub engine: Arc<UndoEngine>,
    pub repository: Arc<dyn LogRepository>,
}

/// Create the activity log router.
pub fn router(state: LogsState) -> Router {
    Router::new()
        .route("/", get(list_logs).delete(clean_logs))
        .route("/{id}/undo", post(undo_event))
        .with_state(state)
}

#[derive(Debug, Serialize, ToSchema)]
struct UndoResponse {
    status: UndoOutcome,
}

/// List activity log entries
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(LogFilter),
    responses(
        (status = 200, description = "One page of rendered log entries", body = Paginated<RenderedLogEntry>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_logs(
    State(state): State<LogsState>,
    headers: HeaderMap,
    Query(filter): Query<LogFilter>,
) -> LogResult<Json<Paginated<RenderedLogEntry>>> {
    let viewer = extract_user_id(&headers);
    let page = state.reader.list(filter, viewer).await?;
    Ok(Json(page))
}

/// Reverse the deletion recorded by a log entry
#[utoipa::path(
    post,
    path = "/{id}/undo",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Log entry ID")
    ),
    responses(
        (status = 200, description = "Undo outcome (no-ops report their reason)", body = UndoResponse),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn undo_event(
    State(state): State<LogsState>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> UndoResult<Json<UndoResponse>> {
    let actor = extract_user_id(&headers);
    let status = state.engine.undo(id, actor).await?;
    Ok(Json(UndoResponse { status }))
}

/// Administrative bulk purge of all log entries
#[utoipa::path(
    delete,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "Number of purged entries", body = PurgeResult),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn clean_logs(State(state): State<LogsState>) -> LogResult<Json<PurgeResult>> {
    let deleted_count = state.repository.purge().await?;
    tracing::info!(deleted_count, "Cleaned activity log");
    Ok(Json(PurgeResult { deleted_count }))
}
