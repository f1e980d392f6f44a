use async_trait::async_trait;
use domain_activity_log::{
    LogData, LogEntry, LogEvent, ParentKind, RestoreOutcome, UndoError, UndoHandler, UndoResult,
};
use domain_events::{SessionUserRepository, UserEventRepository};
use std::sync::Arc;

use crate::repository::{CourseRepository, UnitRepository};

fn store_err(e: impl std::fmt::Display) -> UndoError {
    UndoError::Store(e.to_string())
}

/// Reverses COURSE_DELETION and INTAKE_DELETION entries.
///
/// The course itself is the guard: the conditional restore touches it
/// only in (Deleted, Direct). Once the parent is back, every dependent
/// in (Deleted, Cascaded(Course, id)) is swept back to Active. The
/// dependent set is derived from provenance at undo time, never from
/// the log payload, which only names the course.
pub struct CourseUndoHandler {
    courses: Arc<dyn CourseRepository>,
    units: Arc<dyn UnitRepository>,
    sessions: Arc<dyn SessionUserRepository>,
    events: Arc<dyn UserEventRepository>,
}

impl CourseUndoHandler {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        units: Arc<dyn UnitRepository>,
        sessions: Arc<dyn SessionUserRepository>,
        events: Arc<dyn UserEventRepository>,
    ) -> Self {
        Self {
            courses,
            units,
            sessions,
            events,
        }
    }
}

#[async_trait]
impl UndoHandler for CourseUndoHandler {
    async fn restore(&self, entry: &LogEntry) -> UndoResult<RestoreOutcome> {
        let LogData::Course { course_id, .. } = &entry.data else {
            return Err(UndoError::MissingReference(entry.id));
        };
        let course_id = *course_id;

        if !self.courses.restore(course_id).await.map_err(store_err)? {
            return Ok(RestoreOutcome::Stale);
        }

        // Independent sweeps, joined before returning
        let (units, sessions, events) = tokio::try_join!(
            async {
                self.units
                    .restore_cascaded_by_course(course_id)
                    .await
                    .map_err(store_err)
            },
            async {
                self.sessions
                    .restore_cascaded(ParentKind::Course, course_id)
                    .await
                    .map_err(store_err)
            },
            async {
                self.events
                    .restore_cascaded(ParentKind::Course, course_id)
                    .await
                    .map_err(store_err)
            },
        )?;

        tracing::info!(
            course_id = %course_id,
            units,
            sessions,
            events,
            "Restored course with cascade"
        );

        let undelete_event = if entry.event == LogEvent::IntakeDeletion {
            LogEvent::UndeleteIntake
        } else {
            LogEvent::UndeleteCourse
        };

        Ok(RestoreOutcome::Restored {
            undelete_event,
            data: entry.data.clone(),
        })
    }
}

/// Reverses a UNIT_DELETION entry: the unit from (Deleted, Direct),
/// then its sessions and events from (Deleted, Cascaded(Unit, id)).
pub struct UnitUndoHandler {
    units: Arc<dyn UnitRepository>,
    sessions: Arc<dyn SessionUserRepository>,
    events: Arc<dyn UserEventRepository>,
}

impl UnitUndoHandler {
    pub fn new(
        units: Arc<dyn UnitRepository>,
        sessions: Arc<dyn SessionUserRepository>,
        events: Arc<dyn UserEventRepository>,
    ) -> Self {
        Self {
            units,
            sessions,
            events,
        }
    }
}

#[async_trait]
impl UndoHandler for UnitUndoHandler {
    async fn restore(&self, entry: &LogEntry) -> UndoResult<RestoreOutcome> {
        let LogData::Unit { unit_id, .. } = &entry.data else {
            return Err(UndoError::MissingReference(entry.id));
        };
        let unit_id = *unit_id;

        if !self.units.restore_direct(unit_id).await.map_err(store_err)? {
            return Ok(RestoreOutcome::Stale);
        }

        let (sessions, events) = tokio::try_join!(
            async {
                self.sessions
                    .restore_cascaded(ParentKind::Unit, unit_id)
                    .await
                    .map_err(store_err)
            },
            async {
                self.events
                    .restore_cascaded(ParentKind::Unit, unit_id)
                    .await
                    .map_err(store_err)
            },
        )?;

        tracing::info!(unit_id = %unit_id, sessions, events, "Restored unit with cascade");

        Ok(RestoreOutcome::Restored {
            undelete_event: LogEvent::UndeleteUnit,
            data: entry.data.clone(),
        })
    }
}
