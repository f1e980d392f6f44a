//! # Axum Helpers
//!
//! Shared utilities for the campus HTTP services.
//!
//! ## Modules
//!
//! - **[`errors`]**: Structured error responses with error codes
//! - **[`extractors`]**: Custom extractors (UUID path, validated JSON)
//! - **[`pagination`]**: The paginated list envelope every list endpoint returns
//! - **[`server`]**: Server setup, health checks, graceful shutdown

pub mod errors;
pub mod extractors;
pub mod http;
pub mod pagination;
pub mod server;

// Re-export error types
pub use errors::{AppError, ErrorCode, ErrorResponse};

// Re-export extractors
pub use extractors::{UuidPath, ValidatedJson};

// Re-export the list envelope
pub use pagination::Paginated;

// Re-export server types
pub use server::{
    create_app, create_production_app, create_router, health_router, shutdown_signal,
    HealthResponse,
};

// Re-export HTTP middleware and helpers
pub use http::{extract_user_id, security_headers};
