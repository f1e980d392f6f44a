use async_trait::async_trait;
use domain_activity_log::ReferenceDirectory;
use std::sync::Arc;
use uuid::Uuid;

use crate::repository::UserRepository;

/// Resolves log actors against the users table, active rows only.
pub struct UserDirectory {
    repository: Arc<dyn UserRepository>,
}

impl UserDirectory {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ReferenceDirectory for UserDirectory {
    async fn user_name(&self, id: Uuid) -> Option<String> {
        match self.repository.get_by_id(id).await {
            Ok(Some(user)) if user.status.is_live() => Some(user.full_name()),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(user_id = %id, error = %e, "Actor lookup failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateUser;
    use crate::repository::InMemoryUserRepository;

    #[tokio::test]
    async fn test_resolves_live_users_only() {
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

        let directory = UserDirectory::new(repo.clone());
        assert_eq!(
            directory.user_name(user.id).await.as_deref(),
            Some("Ada Lovelace")
        );

        repo.soft_delete(user.id).await.unwrap();
        assert_eq!(directory.user_name(user.id).await, None);

        assert_eq!(directory.user_name(Uuid::now_v7()).await, None);
    }
}
