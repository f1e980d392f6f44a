use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
    extract_user_id,
    pagination::clamp_rows_per_page,
    Paginated, UuidPath, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::EventResult;
use crate::models::{CreateEvent, EnrollSession, EventFilter, SessionUser, SubmitGrade, UserEvent};
use crate::service::EventService;

const TAG: &str = "events";

/// OpenAPI documentation for the events API
#[derive(OpenApi)]
#[openapi(
    paths(list_events, create_event, get_event, delete_event),
    components(
        schemas(UserEvent, CreateEvent),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "User event endpoints")
    )
)]
pub struct ApiDoc;

/// OpenAPI documentation for the sessions API
#[derive(OpenApi)]
#[openapi(
    paths(enroll_session, submit_grade),
    components(schemas(SessionUser, EnrollSession, SubmitGrade)),
    tags(
        (name = TAG, description = "Unit session endpoints")
    )
)]
pub struct SessionsApiDoc;

/// Router for user events.
pub fn events_router(service: Arc<EventService>) -> Router {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/{id}", get(get_event).delete(delete_event))
        .with_state(service)
}

/// Router for unit sessions.
pub fn sessions_router(service: Arc<EventService>) -> Router {
    Router::new()
        .route("/", post(enroll_session))
        .route("/{id}/grade", post(submit_grade))
        .with_state(service)
}

/// List user events
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(EventFilter),
    responses(
        (status = 200, description = "One page of events", body = Paginated<UserEvent>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_events(
    State(service): State<Arc<EventService>>,
    Query(filter): Query<EventFilter>,
) -> EventResult<Json<Paginated<UserEvent>>> {
    let rows_per_page = clamp_rows_per_page(filter.row_per_page);
    let page = filter.page;
    let (events, total) = service.list_events(filter, rows_per_page).await?;
    Ok(Json(Paginated::new(events, total, page, rows_per_page)))
}

/// Schedule a user event
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateEvent,
    responses(
        (status = 201, description = "Event scheduled", body = UserEvent),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_event(
    State(service): State<Arc<EventService>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateEvent>,
) -> EventResult<impl IntoResponse> {
    let actor = extract_user_id(&headers);
    let event = service.create_event(input, actor).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Get an event by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event found", body = UserEvent),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_event(
    State(service): State<Arc<EventService>>,
    UuidPath(id): UuidPath,
) -> EventResult<Json<UserEvent>> {
    let event = service.get_event(id).await?;
    Ok(Json(event))
}

/// Delete an event
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_event(
    State(service): State<Arc<EventService>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> EventResult<impl IntoResponse> {
    let actor = extract_user_id(&headers);
    service.delete_event(id, actor).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Enroll a user into a unit session
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = EnrollSession,
    responses(
        (status = 201, description = "Session created", body = SessionUser),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn enroll_session(
    State(service): State<Arc<EventService>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<EnrollSession>,
) -> EventResult<impl IntoResponse> {
    let actor = extract_user_id(&headers);
    let session = service.enroll_session(input, actor).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// Submit a grade for a session
#[utoipa::path(
    post,
    path = "/{id}/grade",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = SubmitGrade,
    responses(
        (status = 200, description = "Grade recorded", body = SessionUser),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn submit_grade(
    State(service): State<Arc<EventService>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<SubmitGrade>,
) -> EventResult<Json<SessionUser>> {
    let actor = extract_user_id(&headers);
    let session = service.submit_grade(id, input.score, actor).await?;
    Ok(Json(session))
}
