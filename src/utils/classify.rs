//! Classification of inbound redirect requests.

use axum::http::{HeaderMap, header};
use chrono::{DateTime, Utc};
use url::Url;

use crate::domain::entities::ClassifiedRequest;

/// Default header carrying the visitor's country, as set by CDN edge proxies.
pub const DEFAULT_GEO_COUNTRY_HEADER: &str = "CF-IPCountry";

/// Reduces request headers to a [`ClassifiedRequest`].
///
/// - `referrer_host` is the host of the `Referer` header, if it parses as an absolute URL
/// - `geo_country` is the value of `geo_header`, if present and non-empty
pub fn classify_request(
    headers: &HeaderMap,
    geo_header: &str,
    timestamp: DateTime<Utc>,
) -> ClassifiedRequest {
    ClassifiedRequest::new(
        timestamp,
        extract_referrer_host(headers),
        extract_geo_country(headers, geo_header),
    )
}

/// Extracts the host of the `Referer` header.
///
/// Returns `None` for a missing, non-UTF-8 or relative referrer.
pub fn extract_referrer_host(headers: &HeaderMap) -> Option<String> {
    let referer = headers.get(header::REFERER)?.to_str().ok()?;
    let url = Url::parse(referer.trim()).ok()?;

    url.host_str()
        .filter(|h| !h.is_empty())
        .map(str::to_ascii_lowercase)
}

fn extract_geo_country(headers: &HeaderMap, geo_header: &str) -> Option<String> {
    if geo_header.is_empty() {
        return None;
    }

    headers
        .get(geo_header)?
        .to_str()
        .ok()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Extracts the `Host` header, used to build absolute short URLs.
///
/// Falls back to `localhost` when the header is missing or not UTF-8.
pub fn request_host(headers: &HeaderMap) -> String {
    headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("localhost")
        .to_string()
}
