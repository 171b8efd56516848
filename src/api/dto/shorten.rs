//! DTOs for the JSON creation endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a single URL.
///
/// ```json
/// { "longUrl": "https://example.com/some/page" }
/// ```
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    /// Destination to shorten. Format checks happen in the registry.
    #[serde(default)]
    #[validate(length(min = 1, message = "No URL to shorten"))]
    pub long_url: String,
}

/// A freshly created short URL.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    /// Absolute short URL, e.g. `http://sho.rt/aB3xZ`.
    pub id: String,
    /// Normalised destination.
    pub long_url: String,
}
