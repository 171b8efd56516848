//! Time-bucketed hit statistics.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use crate::domain::entities::ShortUrl;
use crate::domain::granularity::Granularity;
use crate::domain::keyspace::KeySpace;
use crate::error::AppError;
use crate::infrastructure::storage::Store;

/// Hit counts of the current window for every granularity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub hour: i64,
    pub day: i64,
    pub week: i64,
    pub month: i64,
    pub year: i64,
    pub all: i64,
}

impl StatsSnapshot {
    pub fn get(&self, granularity: Granularity) -> i64 {
        match granularity {
            Granularity::Hour => self.hour,
            Granularity::Day => self.day,
            Granularity::Week => self.week,
            Granularity::Month => self.month,
            Granularity::Year => self.year,
            Granularity::All => self.all,
        }
    }

    fn set(&mut self, granularity: Granularity, count: i64) {
        let slot = match granularity {
            Granularity::Hour => &mut self.hour,
            Granularity::Day => &mut self.day,
            Granularity::Week => &mut self.week,
            Granularity::Month => &mut self.month,
            Granularity::Year => &mut self.year,
            Granularity::All => &mut self.all,
        };
        *slot = count;
    }
}

/// Answers "how many hits in window W" from the counters written by
/// [`crate::application::services::HitRecorder`].
///
/// Each query reads exactly one counter. Windows are calendar-aligned: `hour`
/// is the current clock hour in UTC, not the trailing 60 minutes.
pub struct StatsService {
    store: Arc<dyn Store>,
    keys: KeySpace,
}

impl StatsService {
    /// Creates a new statistics service.
    pub fn new(store: Arc<dyn Store>, keys: KeySpace) -> Self {
        Self { store, keys }
    }

    /// Hits in the current window of `granularity`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] on store failures.
    pub async fn stats(
        &self,
        short_url: &ShortUrl,
        granularity: Granularity,
    ) -> Result<i64, AppError> {
        self.stats_at(short_url, granularity, Utc::now()).await
    }

    /// Like [`Self::stats`] with the granularity given by name.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidGranularity`] for names other than
    /// `hour`, `day`, `week`, `month`, `year` and `all`.
    pub async fn stats_by_name(
        &self,
        short_url: &ShortUrl,
        granularity: &str,
    ) -> Result<i64, AppError> {
        let granularity: Granularity = granularity.parse()?;
        self.stats(short_url, granularity).await
    }

    /// Hits in the window of `granularity` that contains `at`.
    pub async fn stats_at(
        &self,
        short_url: &ShortUrl,
        granularity: Granularity,
        at: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        let key = self.keys.counter_key(&short_url.id, granularity, at);
        let Some(raw) = self.store.get_value(&key).await? else {
            return Ok(0);
        };

        raw.parse::<i64>().map_err(|_| {
            AppError::storage(
                "Corrupt hit counter",
                json!({ "code": short_url.id, "granularity": granularity }),
            )
        })
    }

    /// All-time hits. Always equal to `stats(short_url, Granularity::All)`.
    pub async fn hits(&self, short_url: &ShortUrl) -> Result<i64, AppError> {
        self.stats(short_url, Granularity::All).await
    }

    /// Reads every granularity for the windows containing the current time.
    pub async fn snapshot(&self, short_url: &ShortUrl) -> Result<StatsSnapshot, AppError> {
        self.snapshot_at(short_url, Utc::now()).await
    }

    pub async fn snapshot_at(
        &self,
        short_url: &ShortUrl,
        at: DateTime<Utc>,
    ) -> Result<StatsSnapshot, AppError> {
        let mut snapshot = StatsSnapshot::default();
        for granularity in Granularity::ALL {
            let count = self.stats_at(short_url, granularity, at).await?;
            snapshot.set(granularity, count);
        }
        Ok(snapshot)
    }
}
