//! # shorty
//!
//! A URL shortener with per-link analytics, built with Axum and Redis.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Entities, time buckets, key layout and the hit worker
//! - **Application Layer** ([`application`]) - Registry and analytics services
//! - **Infrastructure Layer** ([`infrastructure`]) - Redis and in-memory stores
//! - **API Layer** ([`api`]) - JSON handlers, redirect, DTOs and middleware
//! - **Web Layer** ([`web`]) - HTML home, stats and error pages
//!
//! ## Features
//!
//! - Random, collision-checked short codes
//! - Redirects never wait on analytics: hits are recorded in the background
//! - Hit counts per hour, day, ISO week, month, year and all time
//! - Breakdown of hits by referrer host or visitor country
//!
//! ## Quick Start
//!
//! ```bash
//! export REDIS_URL="redis://localhost:6379"
//! cargo run
//!
//! # or without Redis
//! STORE=memory cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;
pub mod web;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        HitRecorder, LinkService, RetryPolicy, SourceCount, SourceService, StatsService,
        StatsSnapshot,
    };
    pub use crate::domain::entities::{ClassifiedRequest, ShortUrl};
    pub use crate::domain::granularity::Granularity;
    pub use crate::domain::keyspace::KeySpace;
    pub use crate::error::AppError;
    pub use crate::infrastructure::storage::{MemoryStore, RedisStore, Store};
    pub use crate::state::{AppState, SiteSettings};
}
