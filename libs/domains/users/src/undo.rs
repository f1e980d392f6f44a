use async_trait::async_trait;
use domain_activity_log::{
    LogData, LogEntry, LogEvent, RestoreOutcome, UndoError, UndoHandler, UndoResult,
};
use std::sync::Arc;

use crate::repository::UserRepository;

/// Reverses a USER_DELETION entry.
///
/// The repository restore is conditional on the row still being in
/// (Deleted, Direct); anonymized identifiers come back from the backup
/// columns as part of the same write.
pub struct UserUndoHandler {
    repository: Arc<dyn UserRepository>,
}

impl UserUndoHandler {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl UndoHandler for UserUndoHandler {
    async fn restore(&self, entry: &LogEntry) -> UndoResult<RestoreOutcome> {
        let LogData::User { user_id, .. } = &entry.data else {
            return Err(UndoError::MissingReference(entry.id));
        };

        let restored = self
            .repository
            .restore(*user_id)
            .await
            .map_err(|e| UndoError::Store(e.to_string()))?;

        if restored {
            Ok(RestoreOutcome::Restored {
                undelete_event: LogEvent::UndeleteUser,
                data: entry.data.clone(),
            })
        } else {
            Ok(RestoreOutcome::Stale)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateUser;
    use crate::repository::InMemoryUserRepository;
    use chrono::Utc;
    use domain_activity_log::LogKind;
    use uuid::Uuid;

    fn deletion_entry(data: LogData) -> LogEntry {
        LogEntry {
            id: Uuid::now_v7(),
            event: LogEvent::UserDeletion,
            kind: LogKind::Delete,
            actor: Some(Uuid::now_v7()),
            data,
            un_delete: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_restores_anonymized_user() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let user = repo
            .create(CreateUser {
                username: "ada".to_string(),
                email: "ada@example.edu".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
            })
            .await
            .unwrap();
        repo.delete_permanently(user.id).await.unwrap();

        let handler = UserUndoHandler::new(repo.clone());
        let entry = deletion_entry(LogData::User {
            user_id: user.id,
            full_name: "Ada Lovelace".to_string(),
        });

        let outcome = handler.restore(&entry).await.unwrap();
        assert!(matches!(
            outcome,
            RestoreOutcome::Restored {
                undelete_event: LogEvent::UndeleteUser,
                ..
            }
        ));

        let restored = repo.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(restored.email, "ada@example.edu");
        assert_eq!(restored.username, "ada");
    }

    #[tokio::test]
    async fn test_active_user_is_stale() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let user = repo
            .create(CreateUser {
                username: "ada".to_string(),
                email: "ada@example.edu".to_string(),
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
            })
            .await
            .unwrap();

        let handler = UserUndoHandler::new(repo);
        let entry = deletion_entry(LogData::User {
            user_id: user.id,
            full_name: "Ada Lovelace".to_string(),
        });

        // Never deleted: the guard refuses to touch it
        assert_eq!(handler.restore(&entry).await.unwrap(), RestoreOutcome::Stale);
    }

    #[tokio::test]
    async fn test_wrong_payload_is_missing_reference() {
        let repo = Arc::new(InMemoryUserRepository::new());
        let handler = UserUndoHandler::new(repo);
        let entry = deletion_entry(LogData::Empty);

        let result = handler.restore(&entry).await;
        assert!(matches!(result, Err(UndoError::MissingReference(_))));
    }
}
