use utoipa::OpenApi;

/// Aggregated OpenAPI documentation for the campus API.
#[derive(OpenApi)]
#[openapi(
    nest(
        (path = "/api/logs", api = domain_activity_log::handlers::ApiDoc),
        (path = "/api/users", api = domain_users::handlers::ApiDoc),
        (path = "/api/courses", api = domain_courses::handlers::ApiDoc),
        (path = "/api/units", api = domain_courses::handlers::UnitsApiDoc),
        (path = "/api/groups", api = domain_groups::handlers::ApiDoc),
        (path = "/api/discussions", api = domain_discussions::handlers::ApiDoc),
        (path = "/api/notifications", api = domain_notifications::handlers::ApiDoc),
        (path = "/api/events", api = domain_events::handlers::ApiDoc),
        (path = "/api/sessions", api = domain_events::handlers::SessionsApiDoc),
    ),
    info(
        title = "Campus API",
        description = "Learning-management backend: authoring, enrollment, discussions, notifications, and the activity log with soft-delete undo"
    )
)]
pub struct ApiDoc;
