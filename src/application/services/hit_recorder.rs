//! Hit recording: counter writes for every time bucket and source.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::warn;

use crate::domain::entities::{ClassifiedRequest, ShortUrl};
use crate::domain::granularity::Granularity;
use crate::domain::keyspace::KeySpace;
use crate::error::AppError;
use crate::infrastructure::storage::{Store, StoreResult};

/// Bounded retry for individual counter writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total tries per write, including the first.
    pub attempts: usize,
    /// Base of the exponential backoff, in milliseconds.
    pub base_delay_ms: u64,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: usize, base_delay_ms: u64) -> Self {
        Self {
            attempts: attempts.max(1),
            base_delay_ms,
            max_delay: Duration::from_secs(1),
        }
    }

    /// A single try, no retries.
    pub fn none() -> Self {
        Self::new(1, 0)
    }

    fn strategy(&self) -> impl Iterator<Item = Duration> {
        ExponentialBackoff::from_millis(self.base_delay_ms.max(1))
            .max_delay(self.max_delay)
            .map(jitter)
            .take(self.attempts - 1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, 10)
    }
}

/// Writes the counters for a single redirect.
///
/// Every increment is an independent atomic store operation; no locking is
/// done here. Concurrent hits on the same code therefore add up exactly,
/// although readers may observe a partially recorded hit.
pub struct HitRecorder {
    store: Arc<dyn Store>,
    keys: KeySpace,
    retry: RetryPolicy,
}

impl HitRecorder {
    /// Creates a new hit recorder.
    pub fn new(store: Arc<dyn Store>, keys: KeySpace, retry: RetryPolicy) -> Self {
        Self { store, keys, retry }
    }

    /// Records one hit on `short_url`.
    ///
    /// 1. Increments the all-time counter
    /// 2. Increments the hour, day, ISO week, month and year buckets containing
    ///    the request timestamp
    /// 3. Increments the request's source in the sources sorted set
    ///
    /// The all-time counter is written first and a failure there aborts the
    /// hit, so no bucket can ever exceed the total. Later failures do not stop
    /// the remaining writes.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] for the first write that failed after
    /// retries. Callers on the redirect path log and discard it.
    pub async fn record_hit(
        &self,
        short_url: &ShortUrl,
        request: &ClassifiedRequest,
    ) -> Result<(), AppError> {
        let id = short_url.id.as_str();
        let at = request.timestamp;

        let total_key = self.keys.counter_key(id, Granularity::All, at);
        self.with_retry(|| self.store.increment(&total_key, 1))
            .await?;

        let mut first_error = None;

        for granularity in Granularity::BUCKETED {
            let key = self.keys.counter_key(id, granularity, at);
            if let Err(e) = self.with_retry(|| self.store.increment(&key, 1)).await {
                warn!(code = %id, %granularity, error = %e, "Failed to increment bucket");
                first_error.get_or_insert(e);
            }
        }

        let sources_key = self.keys.sources_key(id);
        let source = request.source_key();
        if let Err(e) = self
            .with_retry(|| self.store.sorted_set_increment(&sources_key, &source, 1))
            .await
        {
            warn!(code = %id, source = %source, error = %e, "Failed to increment source");
            first_error.get_or_insert(e);
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    // A write that failed after the server applied it is retried anyway;
    // recording is best-effort and may overcount in that case.
    async fn with_retry<T, F, Fut>(&self, action: F) -> StoreResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = StoreResult<T>>,
    {
        Retry::start(self.retry.strategy(), action).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::{MemoryStore, MockStore, StoreError};
    use chrono::{TimeZone, Utc};
    use mockall::Sequence;

    fn short_url() -> ShortUrl {
        ShortUrl::new(
            "abcde".to_string(),
            "https://example.com/".to_string(),
            Utc::now(),
        )
    }

    fn fast_retry() -> RetryPolicy {
        RetryPolicy::new(3, 1)
    }

    #[tokio::test]
    async fn test_record_hit_writes_every_bucket() {
        let store = Arc::new(MemoryStore::new());
        let recorder = HitRecorder::new(store.clone(), KeySpace::new("t:"), fast_retry());
        let ts = Utc.with_ymd_and_hms(2024, 3, 7, 9, 15, 0).unwrap();
        let request = ClassifiedRequest::new(ts, Some("google.com".to_string()), None);

        recorder.record_hit(&short_url(), &request).await.unwrap();

        for key in [
            "t:hits:abcde:all",
            "t:hits:abcde:hour:2024030709",
            "t:hits:abcde:day:20240307",
            "t:hits:abcde:week:2024-W10",
            "t:hits:abcde:month:202403",
            "t:hits:abcde:year:2024",
        ] {
            assert_eq!(store.get_value(key).await.unwrap().as_deref(), Some("1"), "{}", key);
        }

        let sources = store
            .sorted_set_top_n("t:sources:abcde", None, true)
            .await
            .unwrap();
        assert_eq!(sources, vec![("google.com".to_string(), 1)]);
    }

    #[tokio::test]
    async fn test_total_failure_aborts_hit() {
        let mut mock_store = MockStore::new();
        mock_store
            .expect_increment()
            .withf(|key, _| key.ends_with(":all"))
            .times(3)
            .returning(|_, _| Err(StoreError::Connection("down".to_string())));
        mock_store.expect_sorted_set_increment().times(0);

        let recorder = HitRecorder::new(Arc::new(mock_store), KeySpace::new("t:"), fast_retry());
        let result = recorder
            .record_hit(&short_url(), &ClassifiedRequest::direct(Utc::now()))
            .await;

        assert!(matches!(result, Err(AppError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried() {
        let mut mock_store = MockStore::new();
        let mut seq = Sequence::new();

        mock_store
            .expect_increment()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Err(StoreError::Operation("busy".to_string())));
        mock_store
            .expect_increment()
            .times(6)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(1));
        mock_store
            .expect_sorted_set_increment()
            .times(1)
            .returning(|_, _, _| Ok(1));

        let recorder = HitRecorder::new(Arc::new(mock_store), KeySpace::new("t:"), fast_retry());
        let result = recorder
            .record_hit(&short_url(), &ClassifiedRequest::direct(Utc::now()))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_bucket_failure_still_writes_source() {
        let mut mock_store = MockStore::new();

        mock_store
            .expect_increment()
            .withf(|key, _| key.contains(":hour:"))
            .returning(|_, _| Err(StoreError::Operation("busy".to_string())));
        mock_store
            .expect_increment()
            .withf(|key, _| !key.contains(":hour:"))
            .times(5)
            .returning(|_, _| Ok(1));
        mock_store
            .expect_sorted_set_increment()
            .withf(|key, member, delta| key == "t:sources:abcde" && member == "direct" && *delta == 1)
            .times(1)
            .returning(|_, _, _| Ok(1));

        let recorder = HitRecorder::new(Arc::new(mock_store), KeySpace::new("t:"), RetryPolicy::none());
        let result = recorder
            .record_hit(&short_url(), &ClassifiedRequest::direct(Utc::now()))
            .await;

        assert!(matches!(result, Err(AppError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_concurrent_hits_add_up() {
        let store = Arc::new(MemoryStore::new());
        let recorder = Arc::new(HitRecorder::new(
            store.clone(),
            KeySpace::new("t:"),
            fast_retry(),
        ));
        let mut handles = Vec::new();

        for i in 0..100 {
            let recorder = recorder.clone();
            handles.push(tokio::spawn(async move {
                let referrer = if i % 2 == 0 { Some("a.com".to_string()) } else { None };
                let request = ClassifiedRequest::new(Utc::now(), referrer, None);
                recorder.record_hit(&short_url(), &request).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(
            store.get_value("t:hits:abcde:all").await.unwrap().as_deref(),
            Some("100")
        );
        let sources = store
            .sorted_set_top_n("t:sources:abcde", None, true)
            .await
            .unwrap();
        assert_eq!(
            sources,
            vec![("a.com".to_string(), 50), ("direct".to_string(), 50)]
        );
    }

    #[test]
    fn test_retry_policy_bounds() {
        assert_eq!(RetryPolicy::none().strategy().count(), 0);
        assert_eq!(RetryPolicy::new(4, 5).strategy().count(), 3);
        assert!(
            RetryPolicy::new(10, 50)
                .strategy()
                .all(|d| d <= Duration::from_secs(1))
        );
    }
}
