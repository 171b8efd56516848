//! Hit event model for asynchronous hit recording.

use crate::domain::entities::{ClassifiedRequest, ShortUrl};

/// A redirect that still has to be counted.
///
/// Passed from the redirect handler to the background worker through a
/// bounded channel, so the HTTP response never waits for counter writes.
///
/// # Usage Flow
///
/// 1. Created in the redirect handler once the short code resolved
/// 2. Submitted via [`crate::domain::hit_worker::HitQueue::record_hit`] (non-blocking)
/// 3. Processed by [`crate::domain::hit_worker::run_hit_worker`]
/// 4. Written by [`crate::application::services::HitRecorder::record_hit`]
#[derive(Debug, Clone)]
pub struct HitEvent {
    pub short_url: ShortUrl,
    pub request: ClassifiedRequest,
}

impl HitEvent {
    pub fn new(short_url: ShortUrl, request: ClassifiedRequest) -> Self {
        Self { short_url, request }
    }

    /// The short code this hit belongs to.
    pub fn code(&self) -> &str {
        &self.short_url.id
    }
}
