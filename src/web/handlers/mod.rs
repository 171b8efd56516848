//! HTML template rendering handlers.

mod error_page;
mod home;
mod stats;

pub use error_page::{ErrorTemplate, error_page};
pub use home::{AddForm, add_handler, home_handler};
pub use stats::{StatsTemplate, stats_page};
