use async_trait::async_trait;
use domain_activity_log::{DeletedBy, EntityStatus};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User, UserFilter};

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, input: CreateUser) -> UserResult<User>;

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>>;

    async fn list(&self, filter: &UserFilter, rows_per_page: u64) -> UserResult<(Vec<User>, u64)>;

    async fn update(&self, id: Uuid, input: UpdateUser) -> UserResult<User>;

    async fn exists_by_username(&self, username: &str) -> UserResult<bool>;

    /// Stamp last_login_at. Returns false for unknown or deleted users.
    async fn record_login(&self, id: Uuid) -> UserResult<bool>;

    /// Flip status between Active/Inactive. Never touches deleted rows.
    async fn set_status(&self, id: Uuid, status: EntityStatus) -> UserResult<bool>;

    /// Mark directly deleted. Returns false if already deleted.
    async fn soft_delete(&self, id: Uuid) -> UserResult<bool>;

    /// Soft delete plus identifier anonymization: email/username are
    /// replaced with placeholders and the originals preserved in the
    /// backup columns.
    async fn delete_permanently(&self, id: Uuid) -> UserResult<bool>;

    /// Reverse a direct deletion: back to Active, provenance cleared,
    /// anonymized identifiers restored from the backups. Returns false
    /// unless the row is exactly (Deleted, Direct).
    async fn restore(&self, id: Uuid) -> UserResult<bool>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn anonymized_email(id: Uuid) -> String {
    format!("deleted-{}@removed.invalid", id)
}

fn anonymized_username(id: Uuid) -> String {
    format!("deleted-{}", id)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, input: CreateUser) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|u| u.username.eq_ignore_ascii_case(&input.username))
        {
            return Err(UserError::DuplicateUsername(input.username));
        }

        let now = chrono::Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            username: input.username,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            status: EntityStatus::Active,
            deleted_by: DeletedBy::None,
            backup_email: None,
            backup_username: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> UserResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn list(&self, filter: &UserFilter, rows_per_page: u64) -> UserResult<(Vec<User>, u64)> {
        let users = self.users.read().await;

        let mut result: Vec<User> = users
            .values()
            .filter(|u| filter.status.is_none_or(|s| u.status == s))
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

    async fn update(&self, id: Uuid, input: UpdateUser) -> UserResult<User> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(UserError::NotFound(id))?;

        if let Some(email) = input.email {
            user.email = email;
        }
        if let Some(first_name) = input.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = input.last_name {
            user.last_name = last_name;
        }
        user.updated_at = chrono::Utc::now();

        Ok(user.clone())
    }

    async fn exists_by_username(&self, username: &str) -> UserResult<bool> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|u| u.username.eq_ignore_ascii_case(username)))
    }

    async fn record_login(&self, id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;
        match users.get_mut(&id).filter(|u| u.status.is_live()) {
            Some(user) => {
                user.last_login_at = Some(chrono::Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_status(&self, id: Uuid, status: EntityStatus) -> UserResult<bool> {
        let mut users = self.users.write().await;
        match users.get_mut(&id).filter(|u| u.status.is_live()) {
            Some(user) => {
                user.status = status;
                user.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn soft_delete(&self, id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;
        match users.get_mut(&id).filter(|u| u.status.is_live()) {
            Some(user) => {
                user.status = EntityStatus::Deleted;
                user.deleted_by = DeletedBy::Direct;
                user.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_permanently(&self, id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;
        match users.get_mut(&id).filter(|u| u.status.is_live()) {
            Some(user) => {
                user.backup_email = Some(std::mem::replace(
                    &mut user.email,
                    anonymized_email(user.id),
                ));
                user.backup_username = Some(std::mem::replace(
                    &mut user.username,
                    anonymized_username(user.id),
                ));
                user.status = EntityStatus::Deleted;
                user.deleted_by = DeletedBy::Direct;
                user.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn restore(&self, id: Uuid) -> UserResult<bool> {
        let mut users = self.users.write().await;
        match users
            .get_mut(&id)
            .filter(|u| u.status == EntityStatus::Deleted && u.deleted_by == DeletedBy::Direct)
        {
            Some(user) => {
                if let Some(email) = user.backup_email.take() {
                    user.email = email;
                }
                if let Some(username) = user.backup_username.take() {
                    user.username = username;
                }
                user.status = EntityStatus::Active;
                user.deleted_by = DeletedBy::None;
                user.updated_at = chrono::Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> CreateUser {
        CreateUser {
            username: "ada".to_string(),
            email: "ada@example.edu".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(ada()).await.unwrap();

        assert_eq!(user.status, EntityStatus::Active);
        assert_eq!(user.full_name(), "Ada Lovelace");

        let fetched = repo.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, user.id);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create(ada()).await.unwrap();

        let result = repo.create(ada()).await;
        assert!(matches!(result, Err(UserError::DuplicateUsername(_))));
    }

    #[tokio::test]
    async fn test_soft_delete_then_restore() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(ada()).await.unwrap();

        assert!(repo.soft_delete(user.id).await.unwrap());
        let deleted = repo.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(deleted.status, EntityStatus::Deleted);
        assert_eq!(deleted.deleted_by, DeletedBy::Direct);

        // Second delete is a no-op
        assert!(!repo.soft_delete(user.id).await.unwrap());

        assert!(repo.restore(user.id).await.unwrap());
        let restored = repo.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(restored.status, EntityStatus::Active);
        assert_eq!(restored.deleted_by, DeletedBy::None);

        // Restore only works from the deleted state
        assert!(!repo.restore(user.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_permanent_delete_anonymizes_and_restore_recovers() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(ada()).await.unwrap();

        assert!(repo.delete_permanently(user.id).await.unwrap());
        let deleted = repo.get_by_id(user.id).await.unwrap().unwrap();
        assert_ne!(deleted.email, "ada@example.edu");
        assert_ne!(deleted.username, "ada");
        assert_eq!(deleted.backup_email.as_deref(), Some("ada@example.edu"));
        assert_eq!(deleted.backup_username.as_deref(), Some("ada"));
        assert!(deleted.is_anonymized());

        assert!(repo.restore(user.id).await.unwrap());
        let restored = repo.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(restored.email, "ada@example.edu");
        assert_eq!(restored.username, "ada");
        assert!(restored.backup_email.is_none());
        assert!(restored.backup_username.is_none());
    }

    #[tokio::test]
    async fn test_record_login_skips_deleted_users() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(ada()).await.unwrap();

        assert!(repo.record_login(user.id).await.unwrap());
        repo.soft_delete(user.id).await.unwrap();
        assert!(!repo.record_login(user.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_filters_by_status() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(ada()).await.unwrap();
        repo.create(CreateUser {
            username: "grace".to_string(),
            email: "grace@example.edu".to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
        })
        .await
        .unwrap();
        repo.soft_delete(user.id).await.unwrap();

        let filter = UserFilter {
            status: Some(EntityStatus::Active),
            ..Default::default()
        };
        let (page, total) = repo.list(&filter, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(page[0].username, "grace");
    }
}
