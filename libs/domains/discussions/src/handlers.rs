use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
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

use crate::error::DiscussionResult;
use crate::models::{CreateDiscussion, Discussion, DiscussionFilter};
use crate::service::DiscussionService;

const TAG: &str = "discussions";

/// OpenAPI documentation for the discussions API
#[derive(OpenApi)]
#[openapi(
    paths(list_discussions, create_discussion, get_discussion, delete_discussion),
    components(
        schemas(Discussion, CreateDiscussion),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Discussion endpoints")
    )
)]
pub struct ApiDoc;

/// Create the discussions router
pub fn router(service: DiscussionService) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_discussions).post(create_discussion))
        .route("/{id}", get(get_discussion).delete(delete_discussion))
        .with_state(shared_service)
}

/// List discussions
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(DiscussionFilter),
    responses(
        (status = 200, description = "One page of discussions", body = Paginated<Discussion>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_discussions(
    State(service): State<Arc<DiscussionService>>,
    Query(filter): Query<DiscussionFilter>,
) -> DiscussionResult<Json<Paginated<Discussion>>> {
    let rows_per_page = clamp_rows_per_page(filter.row_per_page);
    let page = filter.page;
    let (discussions, total) = service.list_discussions(filter, rows_per_page).await?;
    Ok(Json(Paginated::new(discussions, total, page, rows_per_page)))
}

/// Start a discussion
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateDiscussion,
    responses(
        (status = 201, description = "Discussion started", body = Discussion),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_discussion(
    State(service): State<Arc<DiscussionService>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateDiscussion>,
) -> DiscussionResult<impl IntoResponse> {
    let actor = extract_user_id(&headers);
    let discussion = service.create_discussion(input, actor).await?;
    Ok((StatusCode::CREATED, Json(discussion)))
}

/// Get a discussion by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Discussion ID")),
    responses(
        (status = 200, description = "Discussion found", body = Discussion),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_discussion(
    State(service): State<Arc<DiscussionService>>,
    UuidPath(id): UuidPath,
) -> DiscussionResult<Json<Discussion>> {
    let discussion = service.get_discussion(id).await?;
    Ok(Json(discussion))
}

/// Delete a discussion
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Discussion ID")),
    responses(
        (status = 204, description = "Discussion deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_discussion(
    State(service): State<Arc<DiscussionService>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> DiscussionResult<impl IntoResponse> {
    let actor = extract_user_id(&headers);
    service.delete_discussion(id, actor).await?;
    Ok(StatusCode::NO_CONTENT)
}
