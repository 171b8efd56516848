//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`ShortUrl`] - A short code and the destination it redirects to
//! - [`ClassifiedRequest`] - The normalized view of an inbound redirect request
//!
//! Counters are not entities: they are derived values stored under keys
//! described by [`crate::domain::keyspace::KeySpace`].

pub mod classified_request;
pub mod short_url;

pub use classified_request::{ClassifiedRequest, DIRECT_SOURCE};
pub use short_url::{ShortUrl, StoredShortUrl};
