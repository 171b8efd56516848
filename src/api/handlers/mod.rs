//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod redirect;
pub mod shorten;
pub mod stats;

pub use health::health_handler;
pub use redirect::redirect_handler;
pub use shorten::shorten_handler;
pub use stats::stats_handler;

/// Strips the `+` that marks a stats path (`/{code}+`).
pub(crate) fn stats_code(segment: &str) -> Option<&str> {
    segment.strip_suffix('+').filter(|code| !code.is_empty())
}
