//! Activity Log Domain
//!
//! The audit log and soft-delete/undo engine the other domains build on.
//!
//! # Architecture
//!
//! ```text
//! entity services ──record──▶ LogWriter ──▶ LogRepository
//!                                              │
//! GET /logs ◀── LogReader ◀── templates ◀──────┤
//!                                              │
//! POST /logs/{id}/undo ──▶ UndoEngine ──▶ UndoRegistry ──▶ UndoHandler
//!                                              (one per deletion event,
//!                                               implemented by the
//!                                               owning domain)
//! ```
//!
//! The lifecycle module defines the status/provenance pair every
//! soft-deletable entity persists; domain crates share it so the undo
//! handlers can express their restore guards structurally.

pub mod directory;
pub mod entity;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod models;
pub mod postgres;
pub mod reader;
pub mod repository;
pub mod templates;
pub mod undo;
pub mod writer;

// Re-export commonly used types
pub use directory::{EmptyDirectory, ReferenceDirectory};
pub use error::{LogError, LogResult, UndoError, UndoResult};
pub use lifecycle::{DeletedBy, EntityStatus, ParentKind};
pub use models::{
    LogData, LogEntry, LogEvent, LogFilter, LogKind, NewLogEntry, PurgeResult, RenderedLogEntry,
    SortOrder,
};
pub use postgres::PgLogRepository;
pub use reader::LogReader;
pub use repository::{InMemoryLogRepository, LogRepository};
pub use templates::LogTemplates;
pub use undo::{RestoreOutcome, UndoEngine, UndoHandler, UndoOutcome, UndoRegistry};
pub use writer::LogWriter;
