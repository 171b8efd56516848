//! Per-code statistics page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::application::services::{SourceCount, StatsSnapshot};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::relative_time::relative_time;

use super::error_page;

/// Template for the statistics page.
///
/// Renders `templates/stats.html` with:
/// - Destination and relative creation time
/// - All-time hits and the current hour/day/week/month/year windows
/// - Top sources
#[derive(Template, WebTemplate)]
#[template(path = "stats.html")]
pub struct StatsTemplate {
    pub id: String,
    pub short_url: String,
    pub url: String,
    pub when: String,
    pub hits: i64,
    pub windows: StatsSnapshot,
    pub sources: Vec<SourceCount>,
}

/// Renders the statistics page for `id`.
///
/// # Endpoint
///
/// `GET /{code}+`
pub async fn stats_page(state: &AppState, headers: &HeaderMap, id: &str) -> Response {
    match build_page(state, headers, id).await {
        Ok(Some(page)) => page.into_response(),
        Ok(None) => error_page(
            StatusCode::NOT_FOUND,
            "No URL was found with that short code",
        ),
        Err(e) => e.into_page(),
    }
}

async fn build_page(
    state: &AppState,
    headers: &HeaderMap,
    id: &str,
) -> Result<Option<StatsTemplate>, AppError> {
    let Some(short_url) = state.link_service.get(id).await? else {
        return Ok(None);
    };

    let windows = state.stats_service.snapshot(&short_url).await?;
    let sources = state.source_service.sources(&short_url, true).await?;

    Ok(Some(StatsTemplate {
        short_url: state.settings.short_url(headers, &short_url.id),
        when: relative_time(Utc::now() - short_url.created),
        hits: windows.all,
        windows,
        sources,
        id: short_url.id,
        url: short_url.destination,
    }))
}
