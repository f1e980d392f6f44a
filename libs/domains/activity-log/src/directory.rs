use async_trait::async_trait;
use uuid::Uuid;

/// Resolves actor references against the entity store when rendering
/// log descriptions. Implemented by the application over the users
/// repository; target display fields come from the log payload itself,
/// since the target of a deletion entry is usually no longer live.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReferenceDirectory: Send + Sync {
    /// Display name of an active user, or `None` if the reference no
    /// longer resolves.
    async fn user_name(&self, id: Uuid) -> Option<String>;
}

/// Directory that resolves nothing. Every actor renders under the
/// fallback name.
#[derive(Debug, Default, Clone)]
pub struct EmptyDirectory;

#[async_trait]
impl ReferenceDirectory for EmptyDirectory {
    async fn user_name(&self, _id: Uuid) -> Option<String> {
        None
    }
}
