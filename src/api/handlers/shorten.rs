//! Handler for the JSON creation endpoint.

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /api/v1/url`
///
/// # Request Body
///
/// ```json
/// { "longUrl": "https://example.com" }
/// ```
///
/// # Response
///
/// ```json
/// { "id": "http://sho.rt/aB3xZ", "longUrl": "https://example.com/" }
/// ```
///
/// # Errors
///
/// - 400 `invalid_url` / `domain_restricted` for rejected destinations
/// - 503 `code_generation_exhausted` when no free code was found
/// - 500 `storage_failure`
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let short_url = state
        .link_service
        .create(&payload.long_url, &state.settings.restrict_domain)
        .await?;

    Ok(Json(ShortenResponse {
        id: state.settings.short_url(&headers, &short_url.id),
        long_url: short_url.destination,
    }))
}
