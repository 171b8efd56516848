//! Infrastructure layer for external integrations.
//!
//! Implements the storage contract the registry and analytics services rely on.
//!
//! # Modules
//!
//! - [`storage`] - Key-value storage abstraction (Redis and in-memory implementations)

pub mod storage;
