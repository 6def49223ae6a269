//! Health check handler.

use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use crate::state::AppState;

/// GET /heartbeat
#[utoipa::path(
    get,
    path = "/heartbeat",
    tag = "health",
    responses(
        (status = 200, description = "Database reachable", body = String),
        (status = 503, description = "Database unreachable", body = String)
    )
)]
pub async fn heartbeat(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.db.health_check().await {
        Ok(true) => (StatusCode::OK, "Healthy"),
        Ok(false) => (StatusCode::SERVICE_UNAVAILABLE, "Unhealthy"),
        Err(e) => {
            warn!(error = %e, "Health check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "Unhealthy")
        }
    }
}
