use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
        InternalServerErrorResponse, NotFoundResponse,
    },
    extract_user_id,
    pagination::clamp_rows_per_page,
    Paginated, UuidPath, ValidatedJson,
};
use axum::extract::Path;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::{GroupError, GroupResult};
use crate::models::{AddMember, CourseGroup, CreateGroup, GroupFilter, UserCourseGroup};
use crate::service::GroupService;

const TAG: &str = "groups";

/// OpenAPI documentation for the groups API
#[derive(OpenApi)]
#[openapi(
    paths(list_groups, create_group, get_group, delete_group, list_members, add_member, remove_member),
    components(
        schemas(CourseGroup, UserCourseGroup, CreateGroup, AddMember),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Course group and membership endpoints")
    )
)]
pub struct ApiDoc;

/// Create the groups router
pub fn router(service: GroupService) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_groups).post(create_group))
        .route("/{id}", get(get_group).delete(delete_group))
        .route("/{id}/members", get(list_members).post(add_member))
        .route("/{id}/members/{user_id}", axum::routing::delete(remove_member))
        .with_state(shared_service)
}

/// List course groups
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(GroupFilter),
    responses(
        (status = 200, description = "One page of groups", body = Paginated<CourseGroup>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_groups(
    State(service): State<Arc<GroupService>>,
    Query(filter): Query<GroupFilter>,
) -> GroupResult<Json<Paginated<CourseGroup>>> {
    let rows_per_page = clamp_rows_per_page(filter.row_per_page);
    let page = filter.page;
    let (groups, total) = service.list_groups(filter, rows_per_page).await?;
    Ok(Json(Paginated::new(groups, total, page, rows_per_page)))
}

/// Create a course group
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateGroup,
    responses(
        (status = 201, description = "Group created", body = CourseGroup),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_group(
    State(service): State<Arc<GroupService>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateGroup>,
) -> GroupResult<impl IntoResponse> {
    let actor = extract_user_id(&headers);
    let group = service.create_group(input, actor).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

/// Get a group by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group found", body = CourseGroup),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_group(
    State(service): State<Arc<GroupService>>,
    UuidPath(id): UuidPath,
) -> GroupResult<Json<CourseGroup>> {
    let group = service.get_group(id).await?;
    Ok(Json(group))
}

/// Delete a group together with its memberships
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Group ID")),
    responses(
        (status = 204, description = "Group deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_group(
    State(service): State<Arc<GroupService>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> GroupResult<impl IntoResponse> {
    let actor = extract_user_id(&headers);
    service.delete_group(id, actor).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the members of a group
#[utoipa::path(
    get,
    path = "/{id}/members",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Membership rows", body = Vec<UserCourseGroup>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_members(
    State(service): State<Arc<GroupService>>,
    UuidPath(id): UuidPath,
) -> GroupResult<Json<Vec<UserCourseGroup>>> {
    let members = service.list_members(id).await?;
    Ok(Json(members))
}

/// Add a member to a group
#[utoipa::path(
    post,
    path = "/{id}/members",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Group ID")),
    request_body = AddMember,
    responses(
        (status = 201, description = "Member added", body = UserCourseGroup),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_member(
    State(service): State<Arc<GroupService>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<AddMember>,
) -> GroupResult<impl IntoResponse> {
    let actor = extract_user_id(&headers);
    let membership = service.add_member(id, input, actor).await?;
    Ok((StatusCode::CREATED, Json(membership)))
}

#[derive(Debug, Deserialize)]
struct RemoveMemberParams {
    /// Display name recorded in the activity log.
    #[serde(default)]
    user_name: Option<String>,
}

/// Remove a member from a group
#[utoipa::path(
    delete,
    path = "/{id}/members/{user_id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Group ID"),
        ("user_id" = Uuid, Path, description = "User ID"),
        ("user_name" = Option<String>, Query, description = "Display name for the activity log")
    ),
    responses(
        (status = 204, description = "Member removed"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn remove_member(
    State(service): State<Arc<GroupService>>,
    headers: HeaderMap,
    Path((id, user_id)): Path<(String, String)>,
    Query(params): Query<RemoveMemberParams>,
) -> GroupResult<impl IntoResponse> {
    let group_id = Uuid::parse_str(&id)
        .map_err(|_| GroupError::Validation(format!("Invalid UUID: {}", id)))?;
    let user_id = Uuid::parse_str(&user_id)
        .map_err(|_| GroupError::Validation(format!("Invalid UUID: {}", user_id)))?;

    let actor = extract_user_id(&headers);
    let user_name = params.user_name.unwrap_or_else(|| user_id.to_string());
    service
        .remove_member(group_id, user_id, user_name, actor)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
