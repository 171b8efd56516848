//! Top-level router configuration combining API and page routes.
//!
//! # Route Structure
//!
//! - `GET  /`                 - Home page with the creation form
//! - `POST /add`              - Form creation, redirects to the stats page
//! - `POST /api/v1/url`       - JSON creation
//! - `GET  /{code}`           - Short link redirect
//! - `GET  /{code}+`          - Stats page
//! - `GET  /{code}+/{what}`   - JSON statistic
//! - `GET  /health`           - Health check: store and hit queue
//! - `/static/*`              - Static assets
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on the creation routes
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler, stats_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use crate::web;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Constructs the application router with all routes and middleware.
///
/// The returned service needs `ConnectInfo<SocketAddr>` for the rate limiter;
/// see [`crate::server::run`].
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let create_routes = api::routes::create_routes()
        .merge(web::routes::form_routes())
        .layer(rate_limit::layer());

    let router = Router::new()
        .merge(web::routes::public_routes())
        .merge(create_routes)
        .route("/health", get(health_handler))
        .route("/{code}", get(redirect_handler))
        .route("/{code}/{what}", get(stats_handler))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
