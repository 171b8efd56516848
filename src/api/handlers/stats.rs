//! Handler for per-code JSON statistics.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::stats::{SourcesResponse, WindowCountResponse};
use crate::domain::granularity::Granularity;
use crate::error::AppError;
use crate::state::AppState;

use super::stats_code;

/// Returns one statistic of a short code as JSON.
///
/// # Endpoint
///
/// `GET /{code}+/{what}`
///
/// - `hour`, `day`, `week`, `month`, `year`, `all` - hits in the current window
/// - `sources` - every source with its hit count
/// - `top` - the configured top N sources
///
/// # Errors
///
/// - 404 if the path lacks the `+` marker or the code does not exist
/// - 400 `invalid_granularity` for any other `what`
pub async fn stats_handler(
    State(state): State<AppState>,
    Path((segment, what)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let not_found = || AppError::not_found("Short code not found", json!({ "code": segment }));

    let id = stats_code(&segment).ok_or_else(not_found)?;
    let short_url = state.link_service.get(id).await?.ok_or_else(not_found)?;

    let response = match what.as_str() {
        "sources" | "top" => {
            let top_only = what == "top";
            let sources = state.source_service.sources(&short_url, top_only).await?;
            Json(SourcesResponse {
                code: short_url.id,
                top_only,
                sources,
            })
            .into_response()
        }
        name => {
            let granularity: Granularity = name.parse()?;
            let count = state.stats_service.stats(&short_url, granularity).await?;
            Json(WindowCountResponse {
                code: short_url.id,
                granularity,
                count,
            })
            .into_response()
        }
    };

    Ok(response)
}
