use domain_activity_log::{EntityStatus, LogData, LogEvent, LogKind, LogWriter, ParentKind};
use domain_events::{SessionUserRepository, UserEventRepository};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{CourseError, CourseResult};
use crate::models::{
    Course, CourseFilter, CreateCourse, CreateUnit, Unit, UnitFilter, UpdateCourse, UpdateUnit,
};
use crate::repository::{CourseRepository, UnitRepository};

/// Service layer for courses and their units.
///
/// Deleting a course is the widest cascade in the system: the course
/// goes to (Deleted, Direct), and its live units plus the sessions and
/// events attached to those units go to (Deleted, Cascaded(Course)).
/// Each cascade write touches only live rows, so an independently
/// deleted dependent keeps its own provenance and survives a later
/// undo of the course untouched.
#[derive(Clone)]
pub struct CourseService {
    courses: Arc<dyn CourseRepository>,
    units: Arc<dyn UnitRepository>,
    sessions: Arc<dyn SessionUserRepository>,
    events: Arc<dyn UserEventRepository>,
    logs: LogWriter,
}

impl CourseService {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        units: Arc<dyn UnitRepository>,
        sessions: Arc<dyn SessionUserRepository>,
        events: Arc<dyn UserEventRepository>,
        logs: LogWriter,
    ) -> Self {
        Self {
            courses,
            units,
            sessions,
            events,
            logs,
        }
    }

    async fn record_activity(
        &self,
        event: LogEvent,
        kind: LogKind,
        actor: Option<Uuid>,
        data: LogData,
    ) {
        if let Err(e) = self.logs.record(event, kind, actor, data).await {
            tracing::warn!(error = %e, "Failed to record activity entry");
        }
    }

    fn course_data(course: &Course) -> LogData {
        LogData::Course {
            course_id: course.id,
            name: course.name.clone(),
            code: course.code.clone(),
            intake: course.intake,
        }
    }

    fn unit_data(unit: &Unit) -> LogData {
        LogData::Unit {
            unit_id: unit.id,
            course_id: unit.course_id,
            name: unit.name.clone(),
        }
    }

    pub async fn create_course(
        &self,
        input: CreateCourse,
        actor: Option<Uuid>,
    ) -> CourseResult<Course> {
        input
            .validate()
            .map_err(|e| CourseError::Validation(e.to_string()))?;

        let course = self.courses.create(input).await?;

        let event = if course.intake {
            LogEvent::IntakeCreation
        } else {
            LogEvent::CourseCreation
        };
        self.record_activity(event, LogKind::Create, actor, Self::course_data(&course))
            .await;

        Ok(course)
    }

    pub async fn get_course(&self, id: Uuid) -> CourseResult<Course> {
        self.courses
            .get_by_id(id)
            .await?
            .ok_or(CourseError::CourseNotFound(id))
    }

    pub async fn list_courses(
        &self,
        filter: CourseFilter,
        rows_per_page: u64,
    ) -> CourseResult<(Vec<Course>, u64)> {
        self.courses.list(&filter, rows_per_page).await
    }

    pub async fn update_course(
        &self,
        id: Uuid,
        input: UpdateCourse,
        actor: Option<Uuid>,
    ) -> CourseResult<Course> {
        input
            .validate()
            .map_err(|e| CourseError::Validation(e.to_string()))?;

        let course = self.courses.update(id, input).await?;

        self.record_activity(
            LogEvent::CourseUpdate,
            LogKind::Update,
            actor,
            Self::course_data(&course),
        )
        .await;

        Ok(course)
    }

    /// Delete a course and cascade into its units, their sessions and
    /// their events. The three dependent sweeps are independent and run
    /// concurrently; all complete before this returns.
    pub async fn delete_course(&self, id: Uuid, actor: Option<Uuid>) -> CourseResult<()> {
        let course = self.get_course(id).await?;

        if !self.courses.soft_delete(id).await? {
            return Err(CourseError::CourseNotFound(id));
        }

        let unit_ids = self.units.ids_by_course(id).await?;

        let (units, sessions, events) = tokio::try_join!(
            self.units.cascade_delete_by_course(id),
            async {
                self.sessions
                    .cascade_delete_for_units(&unit_ids, ParentKind::Course, id)
                    .await
                    .map_err(CourseError::from)
            },
            async {
                self.events
                    .cascade_delete_for_units(&unit_ids, ParentKind::Course, id)
                    .await
                    .map_err(CourseError::from)
            },
        )?;

        tracing::info!(
            course_id = %id,
            units,
            sessions,
            events,
            "Deleted course with cascade"
        );

        let event = if course.intake {
            LogEvent::IntakeDeletion
        } else {
            LogEvent::CourseDeletion
        };
        self.record_activity(event, LogKind::Delete, actor, Self::course_data(&course))
            .await;

        Ok(())
    }

    pub async fn activate_course(&self, id: Uuid) -> CourseResult<Course> {
        if !self.courses.set_status(id, EntityStatus::Active).await? {
            return Err(CourseError::CourseNotFound(id));
        }
        self.get_course(id).await
    }

    pub async fn deactivate_course(&self, id: Uuid) -> CourseResult<Course> {
        if !self.courses.set_status(id, EntityStatus::Inactive).await? {
            return Err(CourseError::CourseNotFound(id));
        }
        self.get_course(id).await
    }

    pub async fn create_unit(&self, input: CreateUnit, actor: Option<Uuid>) -> CourseResult<Unit> {
        input
            .validate()
            .map_err(|e| CourseError::Validation(e.to_string()))?;

        // The parent course must exist and be live
        let course = self.get_course(input.course_id).await?;
        if !course.status.is_live() {
            return Err(CourseError::Validation(format!(
                "Course {} is deleted",
                course.id
            )));
        }

        let unit = self.units.create(input).await?;

        self.record_activity(
            LogEvent::UnitCreation,
            LogKind::Create,
            actor,
            Self::unit_data(&unit),
        )
        .await;

        Ok(unit)
    }

    pub async fn get_unit(&self, id: Uuid) -> CourseResult<Unit> {
        self.units
            .get_by_id(id)
            .await?
            .ok_or(CourseError::UnitNotFound(id))
    }

    pub async fn list_units(
        &self,
        filter: UnitFilter,
        rows_per_page: u64,
    ) -> CourseResult<(Vec<Unit>, u64)> {
        self.units.list(&filter, rows_per_page).await
    }

    pub async fn update_unit(
        &self,
        id: Uuid,
        input: UpdateUnit,
        actor: Option<Uuid>,
    ) -> CourseResult<Unit> {
        input
            .validate()
            .map_err(|e| CourseError::Validation(e.to_string()))?;

        let unit = self.units.update(id, input).await?;

        self.record_activity(
            LogEvent::UnitUpdate,
            LogKind::Update,
            actor,
            Self::unit_data(&unit),
        )
        .await;

        Ok(unit)
    }

    /// Delete a unit directly and cascade into its sessions and events.
    pub async fn delete_unit(&self, id: Uuid, actor: Option<Uuid>) -> CourseResult<()> {
        let unit = self.get_unit(id).await?;

        if !self.units.soft_delete(id).await? {
            return Err(CourseError::UnitNotFound(id));
        }

        let unit_ids = [id];
        let (sessions, events) = tokio::try_join!(
            async {
                self.sessions
                    .cascade_delete_for_units(&unit_ids, ParentKind::Unit, id)
                    .await
                    .map_err(CourseError::from)
            },
            async {
                self.events
                    .cascade_delete_for_units(&unit_ids, ParentKind::Unit, id)
                    .await
                    .map_err(CourseError::from)
            },
        )?;

        tracing::info!(unit_id = %id, sessions, events, "Deleted unit with cascade");

        self.record_activity(
            LogEvent::UnitDeletion,
            LogKind::Delete,
            actor,
            Self::unit_data(&unit),
        )
        .await;

        Ok(())
    }

    /// Publish a unit: Draft (or Inactive) to Active.
    pub async fn activate_unit(&self, id: Uuid) -> CourseResult<Unit> {
        if !self.units.set_status(id, EntityStatus::Active).await? {
            return Err(CourseError::UnitNotFound(id));
        }
        self.get_unit(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UnitKind;
    use crate::repository::{InMemoryCourseRepository, InMemoryUnitRepository};
    use domain_activity_log::{InMemoryLogRepository, LogFilter, LogRepository};
    use domain_events::{
        CreateEvent, EnrollSession, InMemorySessionUserRepository, InMemoryUserEventRepository,
    };

    struct Fixture {
        service: CourseService,
        courses: Arc<InMemoryCourseRepository>,
        units: Arc<InMemoryUnitRepository>,
        sessions: Arc<InMemorySessionUserRepository>,
        events: Arc<InMemoryUserEventRepository>,
        logs: Arc<InMemoryLogRepository>,
    }

    fn fixture() -> Fixture {
        let courses = Arc::new(InMemoryCourseRepository::new());
        let units = Arc::new(InMemoryUnitRepository::new());
        let sessions = Arc::new(InMemorySessionUserRepository::new());
        let events = Arc::new(InMemoryUserEventRepository::new());
        let logs = Arc::new(InMemoryLogRepository::new());

        let service = CourseService::new(
            courses.clone(),
            units.clone(),
            sessions.clone(),
            events.clone(),
            LogWriter::new(logs.clone()),
        );

        Fixture {
            service,
            courses,
            units,
            sessions,
            events,
            logs,
        }
    }

    fn algebra() -> CreateCourse {
        CreateCourse {
            name: "Algebra I".to_string(),
            code: "ALG1".to_string(),
            description: String::new(),
            intake: false,
        }
    }

    #[tokio::test]
    async fn test_delete_course_cascades_into_units_sessions_events() {
        let f = fixture();
        let actor = Uuid::now_v7();

        let course = f.service.create_course(algebra(), Some(actor)).await.unwrap();
        let unit = f
            .service
            .create_unit(
                CreateUnit {
                    course_id: course.id,
                    name: "Limits".to_string(),
                    kind: UnitKind::Assessment,
                },
                Some(actor),
            )
            .await
            .unwrap();

        let session = f
            .sessions
            .enroll(EnrollSession {
                unit_id: unit.id,
                user_id: Uuid::now_v7(),
            })
            .await
            .unwrap();
        let event = f
            .events
            .create(CreateEvent {
                user_id: Uuid::now_v7(),
                unit_id: unit.id,
                title: "Review".to_string(),
                starts_at: chrono::Utc::now(),
            })
            .await
            .unwrap();

        f.service.delete_course(course.id, Some(actor)).await.unwrap();

        let expected = domain_activity_log::DeletedBy::Cascaded {
            parent: ParentKind::Course,
            parent_id: course.id,
        };
        assert_eq!(
            f.units.get_by_id(unit.id).await.unwrap().unwrap().deleted_by,
            expected
        );
        assert_eq!(
            f.sessions
                .get_by_id(session.id)
                .await
                .unwrap()
                .unwrap()
                .deleted_by,
            expected
        );
        assert_eq!(
            f.events.get_by_id(event.id).await.unwrap().unwrap().deleted_by,
            expected
        );

        // One COURSE_DELETION entry, payload carries the display fields
        let filter = LogFilter {
            event: Some(LogEvent::CourseDeletion),
            ..Default::default()
        };
        let (entries, total) = f.logs.list(&filter, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(
            entries[0].data,
            LogData::Course {
                course_id: course.id,
                name: "Algebra I".to_string(),
                code: "ALG1".to_string(),
                intake: false
            }
        );
    }

    #[tokio::test]
    async fn test_intake_deletion_logged_under_intake_event() {
        let f = fixture();
        let course = f
            .service
            .create_course(
                CreateCourse {
                    intake: true,
                    ..algebra()
                },
                None,
            )
            .await
            .unwrap();

        f.service.delete_course(course.id, None).await.unwrap();

        let filter = LogFilter {
            event: Some(LogEvent::IntakeDeletion),
            ..Default::default()
        };
        let (_, total) = f.logs.list(&filter, 10).await.unwrap();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_delete_already_deleted_course_is_not_found() {
        let f = fixture();
        let course = f.service.create_course(algebra(), None).await.unwrap();
        f.service.delete_course(course.id, None).await.unwrap();

        let result = f.service.delete_course(course.id, None).await;
        assert!(matches!(result, Err(CourseError::CourseNotFound(_))));

        // No duplicate deletion entry
        let filter = LogFilter {
            event: Some(LogEvent::CourseDeletion),
            ..Default::default()
        };
        let (_, total) = f.logs.list(&filter, 10).await.unwrap();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_unit_delete_cascades_with_unit_provenance() {
        let f = fixture();
        let course = f.service.create_course(algebra(), None).await.unwrap();
        let unit = f
            .service
            .create_unit(
                CreateUnit {
                    course_id: course.id,
                    name: "Limits".to_string(),
                    kind: UnitKind::Assessment,
                },
                None,
            )
            .await
            .unwrap();
        let session = f
            .sessions
            .enroll(EnrollSession {
                unit_id: unit.id,
                user_id: Uuid::now_v7(),
            })
            .await
            .unwrap();

        f.service.delete_unit(unit.id, None).await.unwrap();

        // The course is untouched; the session carries Unit provenance
        assert_eq!(
            f.courses
                .get_by_id(course.id)
                .await
                .unwrap()
                .unwrap()
                .status,
            EntityStatus::Active
        );
        assert_eq!(
            f.sessions
                .get_by_id(session.id)
                .await
                .unwrap()
                .unwrap()
                .deleted_by,
            domain_activity_log::DeletedBy::Cascaded {
                parent: ParentKind::Unit,
                parent_id: unit.id
            }
        );
    }

    #[tokio::test]
    async fn test_create_unit_requires_live_course() {
        let f = fixture();
        let course = f.service.create_course(algebra(), None).await.unwrap();
        f.service.delete_course(course.id, None).await.unwrap();

        let result = f
            .service
            .create_unit(
                CreateUnit {
                    course_id: course.id,
                    name: "Limits".to_string(),
                    kind: UnitKind::Lesson,
                },
                None,
            )
            .await;
        assert!(matches!(result, Err(CourseError::Validation(_))));
    }
}
