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
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CourseResult;
use crate::models::{
    Course, CourseFilter, CreateCourse, CreateUnit, Unit, UnitFilter, UpdateCourse, UpdateUnit,
};
use crate::service::CourseService;

const TAG: &str = "courses";

/// OpenAPI documentation for the courses API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_courses,
        create_course,
        get_course,
        update_course,
        delete_course,
        activate_course,
        deactivate_course,
    ),
    components(
        schemas(Course, CreateCourse, UpdateCourse),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Course authoring endpoints")
    )
)]
pub struct ApiDoc;

/// OpenAPI documentation for the units API
#[derive(OpenApi)]
#[openapi(
    paths(list_units, create_unit, get_unit, update_unit, delete_unit, activate_unit),
    components(schemas(Unit, CreateUnit, UpdateUnit)),
    tags(
        (name = TAG, description = "Unit authoring endpoints")
    )
)]
pub struct UnitsApiDoc;

/// Router for courses.
pub fn courses_router(service: Arc<CourseService>) -> Router {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route(
            "/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/{id}/activate", post(activate_course))
        .route("/{id}/deactivate", post(deactivate_course))
        .with_state(service)
}

/// Router for units.
pub fn units_router(service: Arc<CourseService>) -> Router {
    Router::new()
        .route("/", get(list_units).post(create_unit))
        .route("/{id}", get(get_unit).put(update_unit).delete(delete_unit))
        .route("/{id}/activate", post(activate_unit))
        .with_state(service)
}

/// List courses
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(CourseFilter),
    responses(
        (status = 200, description = "One page of courses", body = Paginated<Course>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_courses(
    State(service): State<Arc<CourseService>>,
    Query(filter): Query<CourseFilter>,
) -> CourseResult<Json<Paginated<Course>>> {
    let rows_per_page = clamp_rows_per_page(filter.row_per_page);
    let page = filter.page;
    let (courses, total) = service.list_courses(filter, rows_per_page).await?;
    Ok(Json(Paginated::new(courses, total, page, rows_per_page)))
}

/// Create a course (or an intake)
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateCourse,
    responses(
        (status = 201, description = "Course created", body = Course),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_course(
    State(service): State<Arc<CourseService>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateCourse>,
) -> CourseResult<impl IntoResponse> {
    let actor = extract_user_id(&headers);
    let course = service.create_course(input, actor).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

/// Get a course by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course found", body = Course),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_course(
    State(service): State<Arc<CourseService>>,
    UuidPath(id): UuidPath,
) -> CourseResult<Json<Course>> {
    let course = service.get_course(id).await?;
    Ok(Json(course))
}

/// Update a course
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Course ID")),
    request_body = UpdateCourse,
    responses(
        (status = 200, description = "Course updated", body = Course),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_course(
    State(service): State<Arc<CourseService>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateCourse>,
) -> CourseResult<Json<Course>> {
    let actor = extract_user_id(&headers);
    let course = service.update_course(id, input, actor).await?;
    Ok(Json(course))
}

/// Delete a course, cascading into its units, sessions and events
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_course(
    State(service): State<Arc<CourseService>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> CourseResult<impl IntoResponse> {
    let actor = extract_user_id(&headers);
    service.delete_course(id, actor).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Activate a course
#[utoipa::path(
    post,
    path = "/{id}/activate",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course activated", body = Course),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn activate_course(
    State(service): State<Arc<CourseService>>,
    UuidPath(id): UuidPath,
) -> CourseResult<Json<Course>> {
    let course = service.activate_course(id).await?;
    Ok(Json(course))
}

/// Deactivate a course
#[utoipa::path(
    post,
    path = "/{id}/deactivate",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course deactivated", body = Course),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn deactivate_course(
    State(service): State<Arc<CourseService>>,
    UuidPath(id): UuidPath,
) -> CourseResult<Json<Course>> {
    let course = service.deactivate_course(id).await?;
    Ok(Json(course))
}

/// List units
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(UnitFilter),
    responses(
        (status = 200, description = "One page of units", body = Paginated<Unit>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_units(
    State(service): State<Arc<CourseService>>,
    Query(filter): Query<UnitFilter>,
) -> CourseResult<Json<Paginated<Unit>>> {
    let rows_per_page = clamp_rows_per_page(filter.row_per_page);
    let page = filter.page;
    let (units, total) = service.list_units(filter, rows_per_page).await?;
    Ok(Json(Paginated::new(units, total, page, rows_per_page)))
}

/// Create a unit
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateUnit,
    responses(
        (status = 201, description = "Unit created", body = Unit),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_unit(
    State(service): State<Arc<CourseService>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateUnit>,
) -> CourseResult<impl IntoResponse> {
    let actor = extract_user_id(&headers);
    let unit = service.create_unit(input, actor).await?;
    Ok((StatusCode::CREATED, Json(unit)))
}

/// Get a unit by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Unit ID")),
    responses(
        (status = 200, description = "Unit found", body = Unit),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_unit(
    State(service): State<Arc<CourseService>>,
    UuidPath(id): UuidPath,
) -> CourseResult<Json<Unit>> {
    let unit = service.get_unit(id).await?;
    Ok(Json(unit))
}

/// Update a unit
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Unit ID")),
    request_body = UpdateUnit,
    responses(
        (status = 200, description = "Unit updated", body = Unit),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_unit(
    State(service): State<Arc<CourseService>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateUnit>,
) -> CourseResult<Json<Unit>> {
    let actor = extract_user_id(&headers);
    let unit = service.update_unit(id, input, actor).await?;
    Ok(Json(unit))
}

/// Delete a unit, cascading into its sessions and events
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Unit ID")),
    responses(
        (status = 204, description = "Unit deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_unit(
    State(service): State<Arc<CourseService>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> CourseResult<impl IntoResponse> {
    let actor = extract_user_id(&headers);
    service.delete_unit(id, actor).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Publish a unit (Draft or Inactive to Active)
#[utoipa::path(
    post,
    path = "/{id}/activate",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Unit ID")),
    responses(
        (status = 200, description = "Unit activated", body = Unit),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn activate_unit(
    State(service): State<Arc<CourseService>>,
    UuidPath(id): UuidPath,
) -> CourseResult<Json<Unit>> {
    let unit = service.activate_unit(id).await?;
    Ok(Json(unit))
}
