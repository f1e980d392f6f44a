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

use crate::error::NotificationResult;
use crate::models::{CreateNotification, Notification, NotificationFilter};
use crate::service::NotificationService;

const TAG: &str = "notifications";

/// OpenAPI documentation for the notifications API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_notifications,
        create_notification,
        get_notification,
        delete_notification,
        activate_notification,
        deactivate_notification,
    ),
    components(
        schemas(Notification, CreateNotification),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "In-app notification endpoints")
    )
)]
pub struct ApiDoc;

/// Create the notifications router
pub fn router(service: NotificationService) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_notifications).post(create_notification))
        .route("/{id}", get(get_notification).delete(delete_notification))
        .route("/{id}/activate", post(activate_notification))
        .route("/{id}/deactivate", post(deactivate_notification))
        .with_state(shared_service)
}

/// List notifications
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(NotificationFilter),
    responses(
        (status = 200, description = "One page of notifications", body = Paginated<Notification>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_notifications(
    State(service): State<Arc<NotificationService>>,
    Query(filter): Query<NotificationFilter>,
) -> NotificationResult<Json<Paginated<Notification>>> {
    let rows_per_page = clamp_rows_per_page(filter.row_per_page);
    let page = filter.page;
    let (notifications, total) = service.list_notifications(filter, rows_per_page).await?;
    Ok(Json(Paginated::new(
        notifications,
        total,
        page,
        rows_per_page,
    )))
}

/// Publish a notification
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateNotification,
    responses(
        (status = 201, description = "Notification published", body = Notification),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_notification(
    State(service): State<Arc<NotificationService>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateNotification>,
) -> NotificationResult<impl IntoResponse> {
    let actor = extract_user_id(&headers);
    let notification = service.create_notification(input, actor).await?;
    Ok((StatusCode::CREATED, Json(notification)))
}

/// Get a notification by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification found", body = Notification),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_notification(
    State(service): State<Arc<NotificationService>>,
    UuidPath(id): UuidPath,
) -> NotificationResult<Json<Notification>> {
    let notification = service.get_notification(id).await?;
    Ok(Json(notification))
}

/// Delete a notification
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 204, description = "Notification deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_notification(
    State(service): State<Arc<NotificationService>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> NotificationResult<impl IntoResponse> {
    let actor = extract_user_id(&headers);
    service.delete_notification(id, actor).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Activate a notification
#[utoipa::path(
    post,
    path = "/{id}/activate",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification activated", body = Notification),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn activate_notification(
    State(service): State<Arc<NotificationService>>,
    UuidPath(id): UuidPath,
) -> NotificationResult<Json<Notification>> {
    let notification = service.activate_notification(id).await?;
    Ok(Json(notification))
}

/// Deactivate a notification
#[utoipa::path(
    post,
    path = "/{id}/deactivate",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification deactivated", body = Notification),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn deactivate_notification(
    State(service): State<Arc<NotificationService>>,
    UuidPath(id): UuidPath,
) -> NotificationResult<Json<Notification>> {
    let notification = service.deactivate_notification(id).await?;
    Ok(Json(notification))
}
