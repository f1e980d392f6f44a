//! Notifications Domain

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod undo;

pub use error::{NotificationError, NotificationResult};
pub use models::{CreateNotification, Notification, NotificationFilter};
pub use postgres::PgNotificationRepository;
pub use repository::{InMemoryNotificationRepository, NotificationRepository};
pub use service::NotificationService;
pub use undo::NotificationUndoHandler;
