use crate::state::AppState;
use axum::{http::StatusCode, routing::get, Router};

/// Create a router to serve health checks.
pub fn create_router() -> Router<AppState> {
    Router::new().route("/", get(is_alive))
}

/// Simple `is_alive` endpoint that will always return a 200 OK.
/// Used to indicate when the webserver is up and running.
#[tracing::instrument]
#[utoipa::path(
    get,
    path = "/health",
    responses((status = OK, description = "Check if service is alive"))
)]
pub async fn is_alive() -> StatusCode {
    tracing::debug!("Service is alive");
    StatusCode::OK
}
