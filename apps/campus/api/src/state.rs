//! Shared application state.

/// Cloned into every handler scope; everything inside is an Arc or an
/// Arc-backed pool, so clones are cheap.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: database::postgres::DatabaseConnection,
}
