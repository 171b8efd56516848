//! Statistics time windows and their calendar-aligned bucket keys.
//!
//! Windows are fixed calendar buckets in UTC, not sliding windows: "hour"
//! means the current clock hour, "week" the current ISO week, and so on.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use serde_json::json;
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// A supported statistics window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Hour,
    Day,
    Week,
    Month,
    Year,
    All,
}

impl Granularity {
    /// Every granularity, finest first.
    pub const ALL: [Granularity; 6] = [
        Granularity::Hour,
        Granularity::Day,
        Granularity::Week,
        Granularity::Month,
        Granularity::Year,
        Granularity::All,
    ];

    /// The windows that are bucketed by time (everything except `All`).
    pub const BUCKETED: [Granularity; 5] = [
        Granularity::Hour,
        Granularity::Day,
        Granularity::Week,
        Granularity::Month,
        Granularity::Year,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Hour => "hour",
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
            Granularity::Year => "year",
            Granularity::All => "all",
        }
    }

    /// Identifies the window containing `at`.
    ///
    /// Returns `None` for [`Granularity::All`], which has a single unbounded window.
    pub fn bucket_key(&self, at: DateTime<Utc>) -> Option<String> {
        match self {
            Granularity::Hour => Some(at.format("%Y%m%d%H").to_string()),
            Granularity::Day => Some(at.format("%Y%m%d").to_string()),
            Granularity::Week => {
                let week = at.iso_week();
                Some(format!("{}-W{:02}", week.year(), week.week()))
            }
            Granularity::Month => Some(at.format("%Y%m").to_string()),
            Granularity::Year => Some(at.format("%Y").to_string()),
            Granularity::All => None,
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hour" => Ok(Granularity::Hour),
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            "year" => Ok(Granularity::Year),
            "all" => Ok(Granularity::All),
            other => Err(AppError::invalid_granularity(
                format!("Unknown granularity '{}'", other),
                json!({
                    "granularity": other,
                    "allowed": ["hour", "day", "week", "month", "year", "all"],
                }),
            )),
        }
    }
}
