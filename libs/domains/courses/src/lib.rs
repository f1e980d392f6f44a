//! Courses Domain
//!
//! Courses (and intakes) with their units. Course deletion owns the
//! widest cascade in the system; see [`service::CourseService`] and the
//! undo handlers in [`undo`].

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod undo;

// Re-export commonly used types
pub use error::{CourseError, CourseResult};
pub use models::{
    Course, CourseFilter, CreateCourse, CreateUnit, Unit, UnitFilter, UnitKind, UpdateCourse,
    UpdateUnit,
};
pub use postgres::{PgCourseRepository, PgUnitRepository};
pub use repository::{
    CourseRepository, InMemoryCourseRepository, InMemoryUnitRepository, UnitRepository,
};
pub use service::CourseService;
pub use undo::{CourseUndoHandler, UnitUndoHandler};
