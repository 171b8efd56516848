//! Domain layer containing the short-code model and hit pipeline.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures
//! - [`granularity`] - Statistics windows and calendar bucket keys
//! - [`keyspace`] - Persisted key layout
//! - [`hit_event`] - Hit tracking event model
//! - [`hit_worker`] - Bounded background worker pool for hit recording
//!
//! # Hit Processing Flow
//!
//! 1. HTTP handler resolves a short code and issues the redirect
//! 2. [`hit_event::HitEvent`] is submitted to a bounded queue (non-blocking)
//! 3. [`hit_worker::run_hit_worker`] records it with limited concurrency
//! 4. Counters are written via [`crate::infrastructure::storage::Store`]

pub mod entities;
pub mod granularity;
pub mod hit_event;
pub mod hit_worker;
pub mod keyspace;
