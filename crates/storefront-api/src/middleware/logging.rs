//! Per-request access log.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, info, warn};

/// Path polled by load balancers; logged at debug to keep the log readable.
const HEARTBEAT_PATH: &str = "/heartbeat";

/// Logs one line per request. Server errors are logged at warn.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    let query = uri.query().unwrap_or_default();

    if status.is_server_error() {
        warn!(%method, path = uri.path(), query, status = status.as_u16(), elapsed_ms, "Request failed");
    } else if uri.path() == HEARTBEAT_PATH {
        debug!(%method, path = uri.path(), status = status.as_u16(), elapsed_ms, "Heartbeat");
    } else {
        info!(%method, path = uri.path(), query, status = status.as_u16(), elapsed_ms, "Request handled");
    }

    response
}
