use async_trait::async_trait;
use domain_activity_log::{DeletedBy, EntityStatus, ParentKind};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{EventError, EventResult};
use crate::models::{CreateEvent, EnrollSession, EventFilter, SessionUser, UserEvent};

/// Repository trait for user events.
///
/// Events are deleted directly (EVENT_DELETION) or cascaded when the
/// unit or course they hang off is deleted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserEventRepository: Send + Sync {
    async fn create(&self, input: CreateEvent) -> EventResult<UserEvent>;

    async fn get_by_id(&self, id: Uuid) -> EventResult<Option<UserEvent>>;

    async fn list(
        &self,
        filter: &EventFilter,
        rows_per_page: u64,
    ) -> EventResult<(Vec<UserEvent>, u64)>;

    /// Mark directly deleted. Returns false if already deleted.
    async fn soft_delete(&self, id: Uuid) -> EventResult<bool>;

    /// Reverse a direct deletion. Returns false unless the row is
    /// exactly (Deleted, Direct).
    async fn restore_direct(&self, id: Uuid) -> EventResult<bool>;

    /// Cascade-delete every live event of the given units, stamping the
    /// given parent as provenance. Returns the affected count.
    async fn cascade_delete_for_units(
        &self,
        unit_ids: &[Uuid],
        parent: ParentKind,
        parent_id: Uuid,
    ) -> EventResult<u64>;

    /// Restore every event cascade-deleted by the given parent.
    async fn restore_cascaded(&self, parent: ParentKind, parent_id: Uuid) -> EventResult<u64>;
}

/// Repository trait for unit session records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionUserRepository: Send + Sync {
    async fn enroll(&self, input: EnrollSession) -> EventResult<SessionUser>;

    async fn get_by_id(&self, id: Uuid) -> EventResult<Option<SessionUser>>;

    async fn list_by_unit(&self, unit_id: Uuid) -> EventResult<Vec<SessionUser>>;

    /// Record a grade. Returns false for unknown or deleted sessions.
    async fn submit_grade(&self, id: Uuid, score: f32) -> EventResult<bool>;

    async fn cascade_delete_for_units(
        &self,
        unit_ids: &[Uuid],
        parent: ParentKind,
        parent_id: Uuid,
    ) -> EventResult<u64>;

    async fn restore_cascaded(&self, parent: ParentKind, parent_id: Uuid) -> EventResult<u64>;
}

/// In-memory implementation of UserEventRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserEventRepository {
    events: Arc<RwLock<HashMap<Uuid, UserEvent>>>,
}

impl InMemoryUserEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserEventRepository for InMemoryUserEventRepository {
    async fn create(&self, input: CreateEvent) -> EventResult<UserEvent> {
        let now = chrono::Utc::now();
        let event = UserEvent {
            id: Uuid::now_v7(),
            user_id: input.user_id,
            unit_id: input.unit_id,
            title: input.title,
            starts_at: input.starts_at,
            status: EntityStatus::Active,
            deleted_by: DeletedBy::None,
            created_at: now,
            updated_at: now,
        };

        self.events.write().await.insert(event.id, event.clone());
        Ok(event)
    }

    async fn get_by_id(&self, id: Uuid) -> EventResult<Option<UserEvent>> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn list(
        &self,
        filter: &EventFilter,
        rows_per_page: u64,
    ) -> EventResult<(Vec<UserEvent>, u64)> {
        let events = self.events.read().await;

        let mut result: Vec<UserEvent> = events
            .values()
            .filter(|e| filter.user.is_none_or(|u| e.user_id == u))
            .filter(|e| filter.unit.is_none_or(|u| e.unit_id == u))
            .filter(|e| filter.status.is_none_or(|s| e.status == s))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.id.cmp(&a.id));

        let total = result.len() as u64;
        let offset = (filter.page.max(1) - 1) * rows_per_page;
        let page = result
            .into_iter()
            .skip(offset as usize)
            .take(rows_per_page as usize)
            .collect();

        Ok((page, total))
    }

    async fn soft_delete(&self, id: Uuid) -> EventResult<bool> {
        let mut events = self.events.write().await;
        match events.get_mut(&id).filter(|e| e.status.is_live()) {
            Some(event) => {
                event.status = EntityStatus::Deleted;
                event.deleted_by = DeletedBy::Direct;
                event.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn restore_direct(&self, id: Uuid) -> EventResult<bool> {
        let mut events = self.events.write().await;
        match events
            .get_mut(&id)
            .filter(|e| e.status == EntityStatus::Deleted && e.deleted_by == DeletedBy::Direct)
        {
            Some(event) => {
                event.status = EntityStatus::Active;
                event.deleted_by = DeletedBy::None;
                event.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn cascade_delete_for_units(
        &self,
        unit_ids: &[Uuid],
        parent: ParentKind,
        parent_id: Uuid,
    ) -> EventResult<u64> {
        let mut events = self.events.write().await;
        let mut affected = 0;

        for event in events.values_mut() {
            if unit_ids.contains(&event.unit_id) && event.status.is_live() {
                event.status = EntityStatus::Deleted;
                event.deleted_by = DeletedBy::Cascaded { parent, parent_id };
                event.updated_at = chrono::Utc::now();
                affected += 1;
            }
        }

        Ok(affected)
    }

    async fn restore_cascaded(&self, parent: ParentKind, parent_id: Uuid) -> EventResult<u64> {
        let mut events = self.events.write().await;
        let expected = DeletedBy::Cascaded { parent, parent_id };
        let mut affected = 0;

        for event in events.values_mut() {
            if event.status == EntityStatus::Deleted && event.deleted_by == expected {
                event.status = EntityStatus::Active;
                event.deleted_by = DeletedBy::None;
                event.updated_at = chrono::Utc::now();
                affected += 1;
            }
        }

        Ok(affected)
    }
}

/// In-memory implementation of SessionUserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemorySessionUserRepository {
    sessions: Arc<RwLock<HashMap<Uuid, SessionUser>>>,
}

impl InMemorySessionUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionUserRepository for InMemorySessionUserRepository {
    async fn enroll(&self, input: EnrollSession) -> EventResult<SessionUser> {
        let now = chrono::Utc::now();
        let session = SessionUser {
            id: Uuid::now_v7(),
            unit_id: input.unit_id,
            user_id: input.user_id,
            grade: None,
            status: EntityStatus::Active,
            deleted_by: DeletedBy::None,
            created_at: now,
            updated_at: now,
        };

        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        Ok(session)
    }

    async fn get_by_id(&self, id: Uuid) -> EventResult<Option<SessionUser>> {
        Ok(self.sessions.read().await.get(&id).cloned())
    }

    async fn list_by_unit(&self, unit_id: Uuid) -> EventResult<Vec<SessionUser>> {
        let mut result: Vec<SessionUser> = self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| s.unit_id == unit_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(result)
    }

    async fn submit_grade(&self, id: Uuid, score: f32) -> EventResult<bool> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&id).filter(|s| s.status.is_live()) {
            Some(session) => {
                session.grade = Some(score);
                session.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn cascade_delete_for_units(
        &self,
        unit_ids: &[Uuid],
        parent: ParentKind,
        parent_id: Uuid,
    ) -> EventResult<u64> {
        let mut sessions = self.sessions.write().await;
        let mut affected = 0;

        for session in sessions.values_mut() {
            if unit_ids.contains(&session.unit_id) && session.status.is_live() {
                session.status = EntityStatus::Deleted;
                session.deleted_by = DeletedBy::Cascaded { parent, parent_id };
                session.updated_at = chrono::Utc::now();
                affected += 1;
            }
        }

        Ok(affected)
    }

    async fn restore_cascaded(&self, parent: ParentKind, parent_id: Uuid) -> EventResult<u64> {
        let mut sessions = self.sessions.write().await;
        let expected = DeletedBy::Cascaded { parent, parent_id };
        let mut affected = 0;

        for session in sessions.values_mut() {
            if session.status == EntityStatus::Deleted && session.deleted_by == expected {
                session.status = EntityStatus::Active;
                session.deleted_by = DeletedBy::None;
                session.updated_at = chrono::Utc::now();
                affected += 1;
            }
        }

        Ok(affected)
    }
}
