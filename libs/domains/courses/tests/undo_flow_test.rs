//! End-to-end delete/undo flow across courses, units, sessions and
//! events, driven through the activity log engine over in-memory
//! repositories.

use domain_activity_log::*;
use domain_courses::*;
use domain_events::{
    EnrollSession, EventService, InMemorySessionUserRepository, InMemoryUserEventRepository,
    SessionUserRepository, UserEventRepository,
};
use std::sync::Arc;
use uuid::Uuid;

struct World {
    actor: Uuid,
    courses: Arc<InMemoryCourseRepository>,
    units: Arc<InMemoryUnitRepository>,
    sessions: Arc<InMemorySessionUserRepository>,
    events: Arc<InMemoryUserEventRepository>,
    logs: Arc<InMemoryLogRepository>,
    course_service: CourseService,
    event_service: EventService,
    reader: LogReader,
    engine: UndoEngine,
}

fn world() -> World {
    let courses = Arc::new(InMemoryCourseRepository::new());
    let units = Arc::new(InMemoryUnitRepository::new());
    let sessions = Arc::new(InMemorySessionUserRepository::new());
    let events = Arc::new(InMemoryUserEventRepository::new());
    let logs = Arc::new(InMemoryLogRepository::new());
    let writer = LogWriter::new(logs.clone());

    let course_service = CourseService::new(
        courses.clone(),
        units.clone(),
        sessions.clone(),
        events.clone(),
        writer.clone(),
    );
    let event_service = EventService::new(events.clone(), sessions.clone(), writer.clone());

    let course_handler = Arc::new(CourseUndoHandler::new(
        courses.clone(),
        units.clone(),
        sessions.clone(),
        events.clone(),
    ));
    let registry = UndoRegistry::new()
        .register(LogEvent::CourseDeletion, course_handler.clone())
        .register(LogEvent::IntakeDeletion, course_handler)
        .register(
            LogEvent::UnitDeletion,
            Arc::new(UnitUndoHandler::new(
                units.clone(),
                sessions.clone(),
                events.clone(),
            )),
        );

    let reader = LogReader::new(logs.clone(), Arc::new(EmptyDirectory));
    let engine = UndoEngine::new(logs.clone(), writer, registry);

    World {
        actor: Uuid::now_v7(),
        courses,
        units,
        sessions,
        events,
        logs,
        course_service,
        event_service,
        reader,
        engine,
    }
}

async fn deletion_log_id(logs: &Arc<InMemoryLogRepository>, event: LogEvent) -> Uuid {
    let filter = LogFilter {
        event: Some(event),
        ..Default::default()
    };
    let (entries, total) = logs.list(&filter, 10).await.unwrap();
    assert_eq!(total, 1, "expected exactly one deletion entry");
    entries[0].id
}

#[tokio::test]
async fn test_course_delete_list_undo_scenario() {
    let w = world();

    // Create and delete the course
    let course = w
        .course_service
        .create_course(
            CreateCourse {
                name: "Algebra I".to_string(),
                code: "ALG1".to_string(),
                description: String::new(),
                intake: false,
            },
            Some(w.actor),
        )
        .await
        .unwrap();
    w.course_service
        .delete_course(course.id, Some(w.actor))
        .await
        .unwrap();

    // The list shows the deletion with the undo affordance
    let page = w
        .reader
        .list(
            LogFilter {
                event: Some(LogEvent::CourseDeletion),
                ..Default::default()
            },
            Some(w.actor),
        )
        .await
        .unwrap();
    let rendered = &page.data[0];
    assert_eq!(rendered.action.as_deref(), Some(&["UNDO".to_string()][..]));
    assert_eq!(
        rendered
            .description
            .as_deref()
            .unwrap()
            .split(" - ")
            .next()
            .unwrap(),
        "You deleted the course <strong>Algebra I</strong> (ALG1)"
    );

    // Undo it
    let log_id = rendered.id;
    assert_eq!(
        w.engine.undo(log_id, Some(w.actor)).await.unwrap(),
        UndoOutcome::Undone
    );

    // Course is active again
    let course = w.courses.get_by_id(course.id).await.unwrap().unwrap();
    assert_eq!(course.status, EntityStatus::Active);

    // An UNDELETE_COURSE entry exists and the original is flagged
    let filter = LogFilter {
        event: Some(LogEvent::UndeleteCourse),
        ..Default::default()
    };
    let (_, undeletes) = w.logs.list(&filter, 10).await.unwrap();
    assert_eq!(undeletes, 1);
    assert!(w.logs.find_by_id(log_id).await.unwrap().unwrap().un_delete);
}

#[tokio::test]
async fn test_undo_is_idempotent() {
    let w = world();

    let course = w
        .course_service
        .create_course(
            CreateCourse {
                name: "Algebra I".to_string(),
                code: "ALG1".to_string(),
                description: String::new(),
                intake: false,
            },
            Some(w.actor),
        )
        .await
        .unwrap();
    w.course_service
        .delete_course(course.id, Some(w.actor))
        .await
        .unwrap();

    let log_id = deletion_log_id(&w.logs, LogEvent::CourseDeletion).await;

    assert_eq!(
        w.engine.undo(log_id, Some(w.actor)).await.unwrap(),
        UndoOutcome::Undone
    );
    let state_after_first = w.courses.get_by_id(course.id).await.unwrap().unwrap();

    // The second call is a no-op: same entity state, no new entries
    let (_, entries_after_first) = w.logs.list(&LogFilter::default(), 100).await.unwrap();
    assert_eq!(
        w.engine.undo(log_id, Some(w.actor)).await.unwrap(),
        UndoOutcome::AlreadyUndone
    );
    let state_after_second = w.courses.get_by_id(course.id).await.unwrap().unwrap();
    let (_, entries_after_second) = w.logs.list(&LogFilter::default(), 100).await.unwrap();

    assert_eq!(state_after_first.status, state_after_second.status);
    assert_eq!(entries_after_first, entries_after_second);
}

#[tokio::test]
async fn test_cascade_fidelity_spares_independent_deletions() {
    let w = world();

    let course = w
        .course_service
        .create_course(
            CreateCourse {
                name: "Algebra I".to_string(),
                code: "ALG1".to_string(),
                description: String::new(),
                intake: false,
            },
            Some(w.actor),
        )
        .await
        .unwrap();

    let cascaded_unit = w
        .course_service
        .create_unit(
            CreateUnit {
                course_id: course.id,
                name: "Limits".to_string(),
                kind: UnitKind::Assessment,
            },
            Some(w.actor),
        )
        .await
        .unwrap();
    let independent_unit = w
        .course_service
        .create_unit(
            CreateUnit {
                course_id: course.id,
                name: "Sets".to_string(),
                kind: UnitKind::Assessment,
            },
            Some(w.actor),
        )
        .await
        .unwrap();

    // A session and event hang off the cascaded unit
    let session = w
        .sessions
        .enroll(EnrollSession {
            unit_id: cascaded_unit.id,
            user_id: Uuid::now_v7(),
        })
        .await
        .unwrap();
    let event = w
        .event_service
        .create_event(
            domain_events::CreateEvent {
                user_id: Uuid::now_v7(),
                unit_id: cascaded_unit.id,
                title: "Review".to_string(),
                starts_at: chrono::Utc::now(),
            },
            Some(w.actor),
        )
        .await
        .unwrap();

    // One unit is deleted on its own BEFORE the course goes away
    w.course_service
        .delete_unit(independent_unit.id, Some(w.actor))
        .await
        .unwrap();

    // Delete and undo the course
    w.course_service
        .delete_course(course.id, Some(w.actor))
        .await
        .unwrap();
    let log_id = deletion_log_id(&w.logs, LogEvent::CourseDeletion).await;
    assert_eq!(
        w.engine.undo(log_id, Some(w.actor)).await.unwrap(),
        UndoOutcome::Undone
    );

    // The cascade-deleted web is back
    assert_eq!(
        w.units
            .get_by_id(cascaded_unit.id)
            .await
            .unwrap()
            .unwrap()
            .status,
        EntityStatus::Active
    );
    assert_eq!(
        w.sessions
            .get_by_id(session.id)
            .await
            .unwrap()
            .unwrap()
            .status,
        EntityStatus::Active
    );
    assert_eq!(
        w.events.get_by_id(event.id).await.unwrap().unwrap().status,
        EntityStatus::Active
    );

    // The independently deleted unit stays deleted
    let independent = w
        .units
        .get_by_id(independent_unit.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(independent.status, EntityStatus::Deleted);
    assert_eq!(independent.deleted_by, DeletedBy::Direct);
}

#[tokio::test]
async fn test_reactivated_entity_makes_undo_a_noop() {
    let w = world();

    let course = w
        .course_service
        .create_course(
            CreateCourse {
                name: "Algebra I".to_string(),
                code: "ALG1".to_string(),
                description: String::new(),
                intake: false,
            },
            Some(w.actor),
        )
        .await
        .unwrap();
    w.course_service
        .delete_course(course.id, Some(w.actor))
        .await
        .unwrap();
    let log_id = deletion_log_id(&w.logs, LogEvent::CourseDeletion).await;

    // The course comes back through an unrelated path
    w.courses.restore(course.id).await.unwrap();

    // The guard refuses: no duplicate undelete entry, no flag flip
    assert_eq!(
        w.engine.undo(log_id, Some(w.actor)).await.unwrap(),
        UndoOutcome::Stale
    );
    let filter = LogFilter {
        event: Some(LogEvent::UndeleteCourse),
        ..Default::default()
    };
    let (_, undeletes) = w.logs.list(&filter, 10).await.unwrap();
    assert_eq!(undeletes, 0);
    assert!(!w.logs.find_by_id(log_id).await.unwrap().unwrap().un_delete);
}

#[tokio::test]
async fn test_unit_undo_restores_its_own_cascade_only() {
    let w = world();

    let course = w
        .course_service
        .create_course(
            CreateCourse {
                name: "Algebra I".to_string(),
                code: "ALG1".to_string(),
                description: String::new(),
                intake: false,
            },
            Some(w.actor),
        )
        .await
        .unwrap();
    let unit = w
        .course_service
        .create_unit(
            CreateUnit {
                course_id: course.id,
                name: "Limits".to_string(),
                kind: UnitKind::Assessment,
            },
            Some(w.actor),
        )
        .await
        .unwrap();
    let session = w
        .sessions
        .enroll(EnrollSession {
            unit_id: unit.id,
            user_id: Uuid::now_v7(),
        })
        .await
        .unwrap();

    w.course_service
        .delete_unit(unit.id, Some(w.actor))
        .await
        .unwrap();
    let log_id = deletion_log_id(&w.logs, LogEvent::UnitDeletion).await;

    assert_eq!(
        w.engine.undo(log_id, Some(w.actor)).await.unwrap(),
        UndoOutcome::Undone
    );

    assert_eq!(
        w.units.get_by_id(unit.id).await.unwrap().unwrap().status,
        EntityStatus::Active
    );
    assert_eq!(
        w.sessions
            .get_by_id(session.id)
            .await
            .unwrap()
            .unwrap()
            .status,
        EntityStatus::Active
    );

    let filter = LogFilter {
        event: Some(LogEvent::UndeleteUnit),
        ..Default::default()
    };
    let (_, undeletes) = w.logs.list(&filter, 10).await.unwrap();
    assert_eq!(undeletes, 1);
}

#[tokio::test]
async fn test_intake_undo_is_tagged_as_intake() {
    let w = world();

    let intake = w
        .course_service
        .create_course(
            CreateCourse {
                name: "Algebra I - Fall".to_string(),
                code: "ALG1-F".to_string(),
                description: String::new(),
                intake: true,
            },
            Some(w.actor),
        )
        .await
        .unwrap();
    w.course_service
        .delete_course(intake.id, Some(w.actor))
        .await
        .unwrap();

    let log_id = deletion_log_id(&w.logs, LogEvent::IntakeDeletion).await;
    assert_eq!(
        w.engine.undo(log_id, Some(w.actor)).await.unwrap(),
        UndoOutcome::Undone
    );

    let filter = LogFilter {
        event: Some(LogEvent::UndeleteIntake),
        ..Default::default()
    };
    let (_, undeletes) = w.logs.list(&filter, 10).await.unwrap();
    assert_eq!(undeletes, 1);
}
