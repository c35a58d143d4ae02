use crate::{analytics::TrackingTag, state::AppState};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use http::{header, StatusCode};
use std::sync::Arc;

pub fn create_router() -> Router<AppState> {
    Router::new().route("/tag", get(tracking_snippet))
}

/// Serve the snippet that loads the tracking tag.
/// Pages only request it once the visitor has accepted tracking.
#[tracing::instrument(skip(tag))]
#[utoipa::path(
    get,
    path = "/analytics/tag",
    responses(
        (status = OK, description = "HTML snippet loading the tracking tag", body = String, content_type = "text/html"),
        (status = NOT_FOUND, description = "No tracking tag is configured"),
    )
)]
pub async fn tracking_snippet(State(tag): State<Option<Arc<TrackingTag>>>) -> Response {
    let Some(tag) = tag else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match tag.snippet() {
        Ok(snippet) => ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], snippet).into_response(),
        Err(e) => {
            tracing::error!(error.cause_chain = ?e, error.message = %e, "Failed to render tracking snippet");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
