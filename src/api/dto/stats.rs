//! DTOs for per-code statistics.

use serde::Serialize;

use crate::application::services::SourceCount;
use crate::domain::granularity::Granularity;

/// Hit count of the current window of one granularity.
#[derive(Debug, Serialize)]
pub struct WindowCountResponse {
    pub code: String,
    pub granularity: Granularity,
    pub count: i64,
}

/// Hits per source, by count descending.
#[derive(Debug, Serialize)]
pub struct SourcesResponse {
    pub code: String,
    /// `true` when the list was cut to the configured top N.
    pub top_only: bool,
    pub sources: Vec<SourceCount>,
}
