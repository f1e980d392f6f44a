use axum::Router;
use std::sync::Arc;

pub mod health;

use domain_activity_log::{
    handlers::LogsState, LogEvent, LogReader, LogWriter, PgLogRepository, UndoEngine, UndoRegistry,
};
use domain_courses::{CourseService, CourseUndoHandler, PgCourseRepository, PgUnitRepository, UnitUndoHandler};
use domain_discussions::{DiscussionService, DiscussionUndoHandler, PgDiscussionRepository};
use domain_events::{EventService, EventUndoHandler, PgSessionUserRepository, PgUserEventRepository};
use domain_groups::{GroupService, GroupUndoHandler, PgGroupRepository, PgMembershipRepository};
use domain_notifications::{NotificationService, NotificationUndoHandler, PgNotificationRepository};
use domain_users::{PgUserRepository, UserDirectory, UserService, UserUndoHandler};

/// Creates the API routes without the `/api` prefix (added by
/// `create_router`). Repositories, services, the undo handler registry
/// and the actor directory are all wired here; the returned router has
/// its state applied.
pub fn routes(state: &crate::state::AppState) -> Router {
    let db = state.db.clone();

    // Repositories
    let logs = Arc::new(PgLogRepository::new(db.clone()));
    let users = Arc::new(PgUserRepository::new(db.clone()));
    let courses = Arc::new(PgCourseRepository::new(db.clone()));
    let units = Arc::new(PgUnitRepository::new(db.clone()));
    let groups = Arc::new(PgGroupRepository::new(db.clone()));
    let memberships = Arc::new(PgMembershipRepository::new(db.clone()));
    let discussions = Arc::new(PgDiscussionRepository::new(db.clone()));
    let notifications = Arc::new(PgNotificationRepository::new(db.clone()));
    let events = Arc::new(PgUserEventRepository::new(db.clone()));
    let sessions = Arc::new(PgSessionUserRepository::new(db));

    let writer = LogWriter::new(logs.clone());

    // Services
    let user_service = UserService::new(users.clone(), writer.clone());
    let course_service = Arc::new(CourseService::new(
        courses.clone(),
        units.clone(),
        sessions.clone(),
        events.clone(),
        writer.clone(),
    ));
    let group_service = GroupService::new(groups.clone(), memberships.clone(), writer.clone());
    let discussion_service = DiscussionService::new(discussions.clone(), writer.clone());
    let notification_service =
        NotificationService::new(notifications.clone(), writer.clone());
    let event_service = Arc::new(EventService::new(
        events.clone(),
        sessions.clone(),
        writer.clone(),
    ));

    // One handler per deletion event in the catalogue; the course
    // handler doubles for intakes.
    let course_undo = Arc::new(CourseUndoHandler::new(
        courses,
        units.clone(),
        sessions.clone(),
        events.clone(),
    ));
    let registry = UndoRegistry::new()
        .register(LogEvent::UserDeletion, Arc::new(UserUndoHandler::new(users.clone())))
        .register(LogEvent::CourseDeletion, course_undo.clone())
        .register(LogEvent::IntakeDeletion, course_undo)
        .register(
            LogEvent::EventDeletion,
            Arc::new(EventUndoHandler::new(events.clone())),
        )
        .register(
            LogEvent::UnitDeletion,
            Arc::new(UnitUndoHandler::new(units, sessions, events)),
        )
        .register(
            LogEvent::GroupUserDeletion,
            Arc::new(GroupUndoHandler::new(groups, memberships)),
        )
        .register(
            LogEvent::DiscussionDeletion,
            Arc::new(DiscussionUndoHandler::new(discussions)),
        )
        .register(
            LogEvent::NotificationDeletion,
            Arc::new(NotificationUndoHandler::new(notifications)),
        );

    let directory = Arc::new(UserDirectory::new(users));
    let logs_state = LogsState {
        reader: Arc::new(LogReader::new(logs.clone(), directory)),
        engine: Arc::new(UndoEngine::new(logs.clone(), writer, registry)),
        repository: logs,
    };

    Router::new()
        .nest("/logs", domain_activity_log::handlers::router(logs_state))
        .nest("/users", domain_users::handlers::router(user_service))
        .nest(
            "/courses",
            domain_courses::handlers::courses_router(course_service.clone()),
        )
        .nest(
            "/units",
            domain_courses::handlers::units_router(course_service),
        )
        .nest("/groups", domain_groups::handlers::router(group_service))
        .nest(
            "/discussions",
            domain_discussions::handlers::router(discussion_service),
        )
        .nest(
            "/notifications",
            domain_notifications::handlers::router(notification_service),
        )
        .nest(
            "/events",
            domain_events::handlers::events_router(event_service.clone()),
        )
        .nest(
            "/sessions",
            domain_events::handlers::sessions_router(event_service),
        )
}

/// Router with the /ready endpoint backed by a live database check.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
