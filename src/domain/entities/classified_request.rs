//! Normalized description of an inbound redirect request.

use chrono::{DateTime, Utc};

/// Source key recorded when a request carries neither a referrer nor a country.
pub const DIRECT_SOURCE: &str = "direct";

/// A redirect request reduced to what the analytics engine needs.
///
/// Produced by the transport layer (see
/// [`crate::utils::classify::classify_request`]) and consumed by
/// [`crate::application::services::HitRecorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedRequest {
    pub timestamp: DateTime<Utc>,
    pub referrer_host: Option<String>,
    pub geo_country: Option<String>,
}

impl ClassifiedRequest {
    pub fn new(
        timestamp: DateTime<Utc>,
        referrer_host: Option<String>,
        geo_country: Option<String>,
    ) -> Self {
        Self {
            timestamp,
            referrer_host,
            geo_country,
        }
    }

    /// A request without referrer or country information.
    pub fn direct(timestamp: DateTime<Utc>) -> Self {
        Self::new(timestamp, None, None)
    }

    /// Returns the source bucket this request is counted under.
    ///
    /// Referrer host wins over country. Empty values and the `unknown`
    /// country are treated as absent; with nothing left the request counts
    /// as [`DIRECT_SOURCE`].
    pub fn source_key(&self) -> String {
        let referrer = self
            .referrer_host
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty());
        if let Some(host) = referrer {
            return host.to_ascii_lowercase();
        }

        let country = self
            .geo_country
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("unknown"));
        if let Some(country) = country {
            return country.to_ascii_uppercase();
        }

        DIRECT_SOURCE.to_string()
    }
}
