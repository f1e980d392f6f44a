//! Users Domain
//!
//! User accounts with the shared soft-delete lifecycle. A permanent
//! deletion anonymizes the identifiers but preserves them in backup
//! columns, so the undo engine can bring the account back intact.

pub mod directory;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod undo;

// Re-export commonly used types
pub use directory::UserDirectory;
pub use error::{UserError, UserResult};
pub use models::{CreateUser, UpdateUser, User, UserFilter};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
pub use undo::UserUndoHandler;
