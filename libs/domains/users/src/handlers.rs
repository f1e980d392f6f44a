use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
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
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi};

use crate::error::UserResult;
use crate::models::{CreateUser, UpdateUser, User, UserFilter};
use crate::service::UserService;

const TAG: &str = "users";

/// OpenAPI documentation for the users API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_users,
        create_user,
        get_user,
        update_user,
        delete_user,
        activate_user,
        deactivate_user,
    ),
    components(
        schemas(User, CreateUser, UpdateUser),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "User management endpoints")
    )
)]
pub struct ApiDoc;

/// Create the users router
pub fn router(service: UserService) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route(
            "/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/{id}/activate", post(activate_user))
        .route("/{id}/deactivate", post(deactivate_user))
        .with_state(shared_service)
}

/// List users
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(UserFilter),
    responses(
        (status = 200, description = "One page of users", body = Paginated<User>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_users(
    State(service): State<Arc<UserService>>,
    Query(filter): Query<UserFilter>,
) -> UserResult<Json<Paginated<User>>> {
    let rows_per_page = clamp_rows_per_page(filter.row_per_page);
    let page = filter.page;
    let (users, total) = service.list_users(filter, rows_per_page).await?;
    Ok(Json(Paginated::new(users, total, page, rows_per_page)))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_user(
    State(service): State<Arc<UserService>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateUser>,
) -> UserResult<impl IntoResponse> {
    let actor = extract_user_id(&headers);
    let user = service.create_user(input, actor).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_user(
    State(service): State<Arc<UserService>>,
    UuidPath(id): UuidPath,
) -> UserResult<Json<User>> {
    let user = service.get_user(id).await?;
    Ok(Json(user))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_user(
    State(service): State<Arc<UserService>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateUser>,
) -> UserResult<Json<User>> {
    let actor = extract_user_id(&headers);
    let user = service.update_user(id, input, actor).await?;
    Ok(Json(user))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
struct DeleteUserParams {
    /// Also anonymize the user's identifiers.
    #[serde(default)]
    permanent: bool,
}

/// Soft-delete a user (optionally permanently, anonymizing identifiers)
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "User ID"),
        DeleteUserParams
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_user(
    State(service): State<Arc<UserService>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
    Query(params): Query<DeleteUserParams>,
) -> UserResult<impl IntoResponse> {
    let actor = extract_user_id(&headers);
    service.delete_user(id, params.permanent, actor).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Activate a user
#[utoipa::path(
    post,
    path = "/{id}/activate",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User activated", body = User),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn activate_user(
    State(service): State<Arc<UserService>>,
    UuidPath(id): UuidPath,
) -> UserResult<Json<User>> {
    let user = service.activate_user(id).await?;
    Ok(Json(user))
}

/// Deactivate a user
#[utoipa::path(
    post,
    path = "/{id}/deactivate",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deactivated", body = User),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn deactivate_user(
    State(service): State<Arc<UserService>>,
    UuidPath(id): UuidPath,
) -> UserResult<Json<User>> {
    let user = service.deactivate_user(id).await?;
    Ok(Json(user))
}
