use domain_activity_log::{LogData, LogEvent, LogKind, LogWriter};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{EventError, EventResult};
use crate::models::{CreateEvent, EnrollSession, EventFilter, SessionUser, UserEvent};
use crate::repository::{SessionUserRepository, UserEventRepository};

/// Service layer for user events and unit sessions.
#[derive(Clone)]
pub struct EventService {
    events: Arc<dyn UserEventRepository>,
    sessions: Arc<dyn SessionUserRepository>,
    logs: LogWriter,
}

impl EventService {
    pub fn new(
        events: Arc<dyn UserEventRepository>,
        sessions: Arc<dyn SessionUserRepository>,
        logs: LogWriter,
    ) -> Self {
        Self {
            events,
            sessions,
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

    fn event_data(event: &UserEvent) -> LogData {
        LogData::Event {
            event_id: event.id,
            user_id: event.user_id,
            title: event.title.clone(),
        }
    }

    pub async fn create_event(
        &self,
        input: CreateEvent,
        actor: Option<Uuid>,
    ) -> EventResult<UserEvent> {
        input
            .validate()
            .map_err(|e| EventError::Validation(e.to_string()))?;

        let event = self.events.create(input).await?;

        self.record_activity(
            LogEvent::EventCreation,
            LogKind::Create,
            actor,
            Self::event_data(&event),
        )
        .await;

        Ok(event)
    }

    pub async fn get_event(&self, id: Uuid) -> EventResult<UserEvent> {
        self.events
            .get_by_id(id)
            .await?
            .ok_or(EventError::EventNotFound(id))
    }

    pub async fn list_events(
        &self,
        filter: EventFilter,
        rows_per_page: u64,
    ) -> EventResult<(Vec<UserEvent>, u64)> {
        self.events.list(&filter, rows_per_page).await
    }

    /// Delete an event directly. Reversible through the undo engine.
    pub async fn delete_event(&self, id: Uuid, actor: Option<Uuid>) -> EventResult<()> {
        let event = self.get_event(id).await?;

        if !self.events.soft_delete(id).await? {
            return Err(EventError::EventNotFound(id));
        }

        self.record_activity(
            LogEvent::EventDeletion,
            LogKind::Delete,
            actor,
            Self::event_data(&event),
        )
        .await;

        Ok(())
    }

    pub async fn enroll_session(
        &self,
        input: EnrollSession,
        _actor: Option<Uuid>,
    ) -> EventResult<SessionUser> {
        input
            .validate()
            .map_err(|e| EventError::Validation(e.to_string()))?;

        self.sessions.enroll(input).await
    }

    pub async fn get_session(&self, id: Uuid) -> EventResult<SessionUser> {
        self.sessions
            .get_by_id(id)
            .await?
            .ok_or(EventError::SessionNotFound(id))
    }

    /// Record a grade on a session and log the grading event.
    pub async fn submit_grade(
        &self,
        id: Uuid,
        score: f32,
        actor: Option<Uuid>,
    ) -> EventResult<SessionUser> {
        if !(0.0..=100.0).contains(&score) {
            return Err(EventError::Validation(format!(
                "Score {} out of range 0-100",
                score
            )));
        }

        if !self.sessions.submit_grade(id, score).await? {
            return Err(EventError::SessionNotFound(id));
        }

        let session = self.get_session(id).await?;
        self.record_activity(
            LogEvent::GradeSubmitted,
            LogKind::Update,
            actor,
            LogData::Grade {
                user_id: session.user_id,
                unit_id: session.unit_id,
                score,
            },
        )
        .await;

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemorySessionUserRepository, InMemoryUserEventRepository};
    use chrono::Utc;
    use domain_activity_log::{InMemoryLogRepository, LogFilter, LogRepository};

    fn service_with_logs() -> (EventService, Arc<InMemoryLogRepository>) {
        let logs = Arc::new(InMemoryLogRepository::new());
        let service = EventService::new(
            Arc::new(InMemoryUserEventRepository::new()),
            Arc::new(InMemorySessionUserRepository::new()),
            LogWriter::new(logs.clone()),
        );
        (service, logs)
    }

    #[tokio::test]
    async fn test_delete_event_records_snapshot() {
        let (service, logs) = service_with_logs();
        let actor = Uuid::now_v7();

        let event = service
            .create_event(
                CreateEvent {
                    user_id: Uuid::now_v7(),
                    unit_id: Uuid::now_v7(),
                    title: "Midterm review".to_string(),
                    starts_at: Utc::now(),
                },
                Some(actor),
            )
            .await
            .unwrap();

        service.delete_event(event.id, Some(actor)).await.unwrap();

        let filter = LogFilter {
            event: Some(LogEvent::EventDeletion),
            ..Default::default()
        };
        let (entries, total) = logs.list(&filter, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(
            entries[0].data,
            LogData::Event {
                event_id: event.id,
                user_id: event.user_id,
                title: "Midterm review".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_grade_submission_logs_grading_event() {
        let (service, logs) = service_with_logs();
        let unit_id = Uuid::now_v7();
        let user_id = Uuid::now_v7();

        let session = service
            .enroll_session(EnrollSession { unit_id, user_id }, None)
            .await
            .unwrap();

        let graded = service
            .submit_grade(session.id, 92.5, Some(user_id))
            .await
            .unwrap();
        assert_eq!(graded.grade, Some(92.5));

        let filter = LogFilter {
            event: Some(LogEvent::GradeSubmitted),
            ..Default::default()
        };
        let (entries, _) = logs.list(&filter, 10).await.unwrap();
        assert_eq!(
            entries[0].data,
            LogData::Grade {
                user_id,
                unit_id,
                score: 92.5
            }
        );
    }

    #[tokio::test]
    async fn test_out_of_range_grade_rejected() {
        let (service, _) = service_with_logs();
        let result = service.submit_grade(Uuid::now_v7(), 140.0, None).await;
        assert!(matches!(result, Err(EventError::Validation(_))));
    }
}
