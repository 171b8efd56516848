//! Page route configuration.

use crate::state::AppState;
use crate::web::handlers::{add_handler, home_handler};
use axum::{
    Router,
    routing::{get, post},
};

/// Read-only pages.
///
/// # Endpoints
///
/// - `GET /` - Home page with the creation form
///
/// The per-code stats page (`/{code}+`) shares its path pattern with the
/// redirect and is dispatched from [`crate::api::handlers::redirect_handler`].
pub fn public_routes() -> Router<AppState> {
    Router::new().route("/", get(home_handler))
}

/// Pages that create short URLs. Rate limited by the top-level router.
///
/// # Endpoints
///
/// - `POST /add` - Form submission from the home page
pub fn form_routes() -> Router<AppState> {
    Router::new().route("/add", post(add_handler))
}
