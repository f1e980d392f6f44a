//! Groups Domain
//!
//! Course groups and their user memberships. A group deletion sweeps
//! the live membership rows into the group's cascade provenance.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod undo;

// Re-export commonly used types
pub use error::{GroupError, GroupResult};
pub use models::{AddMember, CourseGroup, CreateGroup, GroupFilter, UserCourseGroup};
pub use postgres::{PgGroupRepository, PgMembershipRepository};
pub use repository::{
    GroupRepository, InMemoryGroupRepository, InMemoryMembershipRepository, MembershipRepository,
};
pub use service::GroupService;
pub use undo::GroupUndoHandler;
