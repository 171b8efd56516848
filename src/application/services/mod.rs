//! Registry and analytics services for the application layer.

pub mod hit_recorder;
pub mod link_service;
pub mod source_service;
pub mod stats_service;

pub use hit_recorder::{HitRecorder, RetryPolicy};
pub use link_service::LinkService;
pub use source_service::{SourceCount, SourceService};
pub use stats_service::{StatsService, StatsSnapshot};
