//! Application layer services implementing the registry and analytics engine.
//!
//! Services consume the [`crate::infrastructure::storage::Store`] trait and
//! provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Short code creation and lookup
//! - [`services::hit_recorder::HitRecorder`] - Counter writes for each redirect
//! - [`services::stats_service::StatsService`] - Per-window hit counts
//! - [`services::source_service::SourceService`] - Referrer/country breakdown

pub mod services;
