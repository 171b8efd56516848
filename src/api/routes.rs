//! API route configuration.

use crate::api::handlers::shorten_handler;
use crate::state::AppState;
use axum::{Router, routing::post};

/// JSON creation endpoint. Rate limited by the top-level router.
///
/// # Endpoints
///
/// - `POST /api/v1/url` - Create a short URL
pub fn create_routes() -> Router<AppState> {
    Router::new().route("/api/v1/url", post(shorten_handler))
}
