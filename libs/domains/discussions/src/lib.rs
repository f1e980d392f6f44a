//! Discussions Domain

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod undo;

pub use error::{DiscussionError, DiscussionResult};
pub use models::{CreateDiscussion, Discussion, DiscussionFilter};
pub use postgres::PgDiscussionRepository;
pub use repository::{DiscussionRepository, InMemoryDiscussionRepository};
pub use service::DiscussionService;
pub use undo::DiscussionUndoHandler;
