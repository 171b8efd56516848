//! Per-IP rate limiting for the creation endpoints.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

/// Sustained creations per second allowed per client.
const CREATE_PER_SECOND: u64 = 1;
const CREATE_BURST: u32 = 20;

/// Creates the rate limiter for `POST /add` and `POST /api/v1/url`.
///
/// # Limits
///
/// - **Rate**: 1 request per second
/// - **Burst**: 20 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`. Redirects
/// and stats reads are never limited.
///
/// # Key Extraction
///
/// Rate limits are applied per client IP address extracted from the
/// socket peer address, so the server must be started with
/// `into_make_service_with_connect_info`.
pub fn layer() -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>
{
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(CREATE_PER_SECOND)
            .burst_size(CREATE_BURST)
            .finish()
            .expect("rate limit quota must be non-zero"),
    );

    GovernorLayer::new(governor_conf)
}
