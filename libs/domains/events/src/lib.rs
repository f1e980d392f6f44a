//! Events Domain
//!
//! User calendar events and unit session records. Both are cascade
//! targets: deleting a unit (or its course) sweeps the attached events
//! and sessions into the cascade provenance, and undoing that deletion
//! brings them back.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod undo;

// Re-export commonly used types
pub use error::{EventError, EventResult};
pub use models::{CreateEvent, EnrollSession, EventFilter, SessionUser, SubmitGrade, UserEvent};
pub use postgres::{PgSessionUserRepository, PgUserEventRepository};
pub use repository::{
    InMemorySessionUserRepository, InMemoryUserEventRepository, SessionUserRepository,
    UserEventRepository,
};
pub use service::EventService;
pub use undo::EventUndoHandler;
