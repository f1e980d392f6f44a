use domain_activity_log::{EntityStatus, LogData, LogEvent, LogKind, LogWriter};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User, UserFilter};
use crate::repository::UserRepository;

/// Service layer for user business logic.
///
/// Every mutation records an activity entry through the log writer as a
/// best-effort side effect: a failed log write is warned about, never
/// allowed to fail the mutation itself.
#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    logs: LogWriter,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, logs: LogWriter) -> Self {
        Self { repository, logs }
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

    fn log_data(user: &User) -> LogData {
        LogData::User {
            user_id: user.id,
            full_name: user.full_name(),
        }
    }

    pub async fn create_user(&self, input: CreateUser, actor: Option<Uuid>) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let user = self.repository.create(input).await?;

        self.record_activity(
            LogEvent::UserCreation,
            LogKind::Create,
            actor,
            Self::log_data(&user),
        )
        .await;

        Ok(user)
    }

    pub async fn get_user(&self, id: Uuid) -> UserResult<User> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    pub async fn list_users(
        &self,
        filter: UserFilter,
        rows_per_page: u64,
    ) -> UserResult<(Vec<User>, u64)> {
        self.repository.list(&filter, rows_per_page).await
    }

    pub async fn update_user(
        &self,
        id: Uuid,
        input: UpdateUser,
        actor: Option<Uuid>,
    ) -> UserResult<User> {
        input
            .validate()
            .map_err(|e| UserError::Validation(e.to_string()))?;

        let user = self.repository.update(id, input).await?;

        self.record_activity(
            LogEvent::UserUpdate,
            LogKind::Update,
            actor,
            Self::log_data(&user),
        )
        .await;

        Ok(user)
    }

    /// Soft delete, or permanently delete (anonymizing identifiers).
    /// Either way the deletion is recorded and reversible through the
    /// undo engine.
    pub async fn delete_user(
        &self,
        id: Uuid,
        permanent: bool,
        actor: Option<Uuid>,
    ) -> UserResult<()> {
        // Snapshot before deletion so the log keeps the real name
        let user = self.get_user(id).await?;

        let deleted = if permanent {
            self.repository.delete_permanently(id).await?
        } else {
            self.repository.soft_delete(id).await?
        };

        if !deleted {
            return Err(UserError::NotFound(id));
        }

        self.record_activity(
            LogEvent::UserDeletion,
            LogKind::Delete,
            actor,
            Self::log_data(&user),
        )
        .await;

        Ok(())
    }

    pub async fn activate_user(&self, id: Uuid) -> UserResult<User> {
        if !self.repository.set_status(id, EntityStatus::Active).await? {
            return Err(UserError::NotFound(id));
        }
        self.get_user(id).await
    }

    pub async fn deactivate_user(&self, id: Uuid) -> UserResult<User> {
        if !self
            .repository
            .set_status(id, EntityStatus::Inactive)
            .await?
        {
            return Err(UserError::NotFound(id));
        }
        self.get_user(id).await
    }

    /// Stamp a successful login and record it.
    pub async fn record_login(&self, id: Uuid) -> UserResult<()> {
        if !self.repository.record_login(id).await? {
            return Err(UserError::NotFound(id));
        }

        let user = self.get_user(id).await?;
        self.record_activity(
            LogEvent::UserLogin,
            LogKind::Update,
            Some(id),
            Self::log_data(&user),
        )
        .await;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryUserRepository, MockUserRepository};
    use domain_activity_log::{InMemoryLogRepository, LogFilter, LogRepository};

    fn ada() -> CreateUser {
        CreateUser {
            username: "ada".to_string(),
            email: "ada@example.edu".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    fn service_with_logs() -> (UserService, Arc<InMemoryLogRepository>) {
        let logs = Arc::new(InMemoryLogRepository::new());
        let service = UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            LogWriter::new(logs.clone()),
        );
        (service, logs)
    }

    #[tokio::test]
    async fn test_create_records_activity() {
        let (service, logs) = service_with_logs();
        let user = service.create_user(ada(), None).await.unwrap();

        let (entries, total) = logs.list(&LogFilter::default(), 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(entries[0].event, LogEvent::UserCreation);
        assert_eq!(
            entries[0].data,
            LogData::User {
                user_id: user.id,
                full_name: "Ada Lovelace".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_email() {
        let (service, _) = service_with_logs();
        let result = service
            .create_user(
                CreateUser {
                    email: "not-an-email".to_string(),
                    ..ada()
                },
                None,
            )
            .await;
        assert!(matches!(result, Err(UserError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_records_name_snapshot() {
        let (service, logs) = service_with_logs();
        let actor = Uuid::now_v7();
        let user = service.create_user(ada(), Some(actor)).await.unwrap();

        service.delete_user(user.id, true, Some(actor)).await.unwrap();

        let filter = LogFilter {
            event: Some(LogEvent::UserDeletion),
            ..Default::default()
        };
        let (entries, _) = logs.list(&filter, 10).await.unwrap();
        // The payload snapshot names the user even after anonymization
        assert_eq!(
            entries[0].data,
            LogData::User {
                user_id: user.id,
                full_name: "Ada Lovelace".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_delete_unknown_user_is_not_found() {
        let (service, _) = service_with_logs();
        let result = service.delete_user(Uuid::now_v7(), false, None).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_mutation_survives_log_write_failure() {
        use async_trait::async_trait;
        use domain_activity_log::{LogEntry, LogError, LogResult, NewLogEntry};

        struct FailingLogRepository;

        #[async_trait]
        impl LogRepository for FailingLogRepository {
            async fn insert(&self, _input: NewLogEntry) -> LogResult<LogEntry> {
                Err(LogError::Store("log store down".to_string()))
            }
            async fn find_by_id(&self, id: Uuid) -> LogResult<Option<LogEntry>> {
                Err(LogError::NotFound(id))
            }
            async fn list(
                &self,
                _filter: &LogFilter,
                _rows_per_page: u64,
            ) -> LogResult<(Vec<LogEntry>, u64)> {
                Ok((vec![], 0))
            }
            async fn mark_undeleted(&self, _id: Uuid) -> LogResult<bool> {
                Ok(false)
            }
            async fn purge(&self) -> LogResult<u64> {
                Ok(0)
            }
        }

        let service = UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            LogWriter::new(Arc::new(FailingLogRepository)),
        );

        // The user is created even though the activity write failed
        let user = service.create_user(ada(), None).await.unwrap();
        assert_eq!(user.username, "ada");
    }

    #[tokio::test]
    async fn test_record_login_requires_live_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_record_login().returning(|_| Ok(false));

        let service = UserService::new(
            Arc::new(repo),
            LogWriter::new(Arc::new(InMemoryLogRepository::new())),
        );

        let result = service.record_login(Uuid::now_v7()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }
}
