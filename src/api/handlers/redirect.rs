//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use tracing::{debug, error};
use url::form_urlencoded;

use crate::state::AppState;
use crate::utils::classify::classify_request;
use crate::web::handlers::{error_page, stats_page};

use super::stats_code;

/// Placeholder in `REDIRECT_404` replaced by the requested short URL.
const SHORT_URL_PLACEHOLDER: &str = "$gosURL";

/// Redirects a short code to its destination.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// A path ending in `+` (`GET /{code}+`) renders the stats page instead.
///
/// # Request Flow
///
/// 1. Look up the code
/// 2. Classify the request (referrer host, geo country)
/// 3. Queue the hit for the background worker
/// 4. Return `301 Moved Permanently`
///
/// The hit is queued with `try_send`; a full queue drops it and the
/// redirect is served regardless.
///
/// # Unknown Codes
///
/// With `REDIRECT_404` configured the client is sent there with
/// `307 Temporary Redirect`, otherwise a 404 page is rendered.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Response {
    if let Some(id) = stats_code(&code) {
        return stats_page(&state, &headers, id).await;
    }

    let short_url = match state.link_service.get(&code).await {
        Ok(Some(short_url)) => short_url,
        Ok(None) => {
            debug!(code = %code, "Unknown short code");
            return not_found(&state, &headers, &code);
        }
        Err(e) => {
            error!(code = %code, error = %e, "Lookup failed");
            return e.into_page();
        }
    };

    let request = classify_request(&headers, &state.settings.geo_country_header, Utc::now());
    let destination = short_url.destination.clone();
    state.hit_queue.record_hit(short_url, request);

    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, destination)]).into_response()
}

fn not_found(state: &AppState, headers: &HeaderMap, code: &str) -> Response {
    match &state.settings.redirect_404 {
        Some(target) => {
            let short_url = state.settings.short_url(headers, code);
            let escaped: String = form_urlencoded::byte_serialize(short_url.as_bytes()).collect();
            Redirect::temporary(&target.replacen(SHORT_URL_PLACEHOLDER, &escaped, 1))
                .into_response()
        }
        None => error_page(
            StatusCode::NOT_FOUND,
            "No URL was found with that short code",
        ),
    }
}
