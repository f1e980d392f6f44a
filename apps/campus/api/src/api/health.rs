use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// Readiness probe: verifies the database connection actually answers.
pub async fn ready_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match database::postgres::check_health(&state.db).await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ready", "database": "connected" })),
        ),
        Err(e) => {
            tracing::error!("Readiness check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "not ready", "database": "disconnected" })),
            )
        }
    }
}
