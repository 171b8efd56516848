//! Utility functions for code generation, URL processing, and request handling.
//!
//! - [`code_generator`] - Random short codes with bounded collision retry
//! - [`url_normalizer`] - Destination URL validation and normalization
//! - [`classify`] - Reducing redirect requests to referrer/country sources
//! - [`relative_time`] - "time ago" formatting

pub mod classify;
pub mod code_generator;
pub mod relative_time;
pub mod url_normalizer;
