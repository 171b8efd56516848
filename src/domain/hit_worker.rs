//! Background hit recording.
//!
//! Redirect handlers hand hits to a [`HitQueue`] and return immediately.
//! [`run_hit_worker`] drains the queue and records each hit on a bounded
//! number of concurrent tasks, so a slow or unavailable store turns into a
//! full queue (and dropped hits) instead of an unbounded pile of tasks.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

use crate::application::services::HitRecorder;
use crate::domain::entities::{ClassifiedRequest, ShortUrl};
use crate::domain::hit_event::HitEvent;

/// Sending half of the hit queue.
///
/// Cheap to clone; every clone feeds the same worker.
#[derive(Clone)]
pub struct HitQueue {
    sender: mpsc::Sender<HitEvent>,
}

impl HitQueue {
    pub fn new(sender: mpsc::Sender<HitEvent>) -> Self {
        Self { sender }
    }

    /// Creates a queue with room for `capacity` pending hits.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<HitEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx), rx)
    }

    /// Submits a hit for background recording.
    ///
    /// Never blocks and never fails the caller: when the queue is full or the
    /// worker is gone the hit is dropped and logged.
    pub fn record_hit(&self, short_url: ShortUrl, request: ClassifiedRequest) {
        let event = HitEvent::new(short_url, request);

        match self.sender.try_send(event) {
            Ok(()) => {
                metrics::counter!("shorty_hits_enqueued_total").increment(1);
            }
            Err(mpsc::error::TrySendError::Full(event)) => {
                warn!(code = %event.code(), "Hit queue full, dropping hit");
                metrics::counter!("shorty_hits_dropped_total").increment(1);
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                error!(code = %event.code(), "Hit worker stopped, dropping hit");
                metrics::counter!("shorty_hits_dropped_total").increment(1);
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Free slots currently left in the queue.
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }

    pub fn max_capacity(&self) -> usize {
        self.sender.max_capacity()
    }
}

/// Processes queued hits until every [`HitQueue`] handle is dropped.
///
/// At most `concurrency` hits are recorded at the same time. In-flight
/// recordings are awaited before the worker returns.
pub async fn run_hit_worker(
    mut rx: mpsc::Receiver<HitEvent>,
    recorder: Arc<HitRecorder>,
    concurrency: usize,
) {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let recorder = recorder.clone();

        tasks.spawn(async move {
            let _permit = permit;

            match recorder.record_hit(&event.short_url, &event.request).await {
                Ok(()) => {
                    debug!(code = %event.code(), "Hit recorded");
                    metrics::counter!("shorty_hits_recorded_total").increment(1);
                }
                Err(e) => {
                    error!(code = %event.code(), error = %e, "Failed to record hit");
                    metrics::counter!("shorty_hits_failed_total").increment(1);
                }
            }
        });

        // Reap finished tasks so the set does not grow with uptime.
        while let Some(joined) = tasks.try_join_next() {
            report_join(joined);
        }
    }

    while let Some(joined) = tasks.join_next().await {
        report_join(joined);
    }
    info!("Hit worker stopped");
}

/// Logs a recording task that panicked. Returns `true` if it did.
fn report_join(joined: Result<(), JoinError>) -> bool {
    match joined {
        Ok(()) => false,
        Err(e) => {
            error!(error = %e, "Hit recording task panicked");
            metrics::counter!("shorty_hits_failed_total").increment(1);
            true
        }
    }
}

/// Spawns [`run_hit_worker`] on the current runtime and returns its queue.
pub fn spawn_hit_worker(
    recorder: Arc<HitRecorder>,
    capacity: usize,
    concurrency: usize,
) -> (HitQueue, JoinHandle<()>) {
    let (queue, rx) = HitQueue::channel(capacity);
    let handle = tokio::spawn(run_hit_worker(rx, recorder, concurrency));
    (queue, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::RetryPolicy;
    use crate::domain::keyspace::KeySpace;
    use crate::infrastructure::storage::{MemoryStore, MockStore, Store};
    use chrono::Utc;

    fn short_url() -> ShortUrl {
        ShortUrl::new("abcde".to_string(), "https://example.com/".to_string(), Utc::now())
    }

    #[tokio::test]
    async fn test_full_queue_drops_without_blocking() {
        let (queue, mut rx) = HitQueue::channel(1);

        queue.record_hit(short_url(), ClassifiedRequest::direct(Utc::now()));
        queue.record_hit(short_url(), ClassifiedRequest::direct(Utc::now()));

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_closed_queue_drops_silently() {
        let (queue, rx) = HitQueue::channel(4);
        drop(rx);

        assert!(queue.is_closed());
        queue.record_hit(short_url(), ClassifiedRequest::direct(Utc::now()));
    }

    #[tokio::test]
    async fn test_worker_records_all_queued_hits() {
        let store = Arc::new(MemoryStore::new());
        let keys = KeySpace::new("t:");
        let recorder = Arc::new(HitRecorder::new(
            store.clone(),
            keys.clone(),
            RetryPolicy::none(),
        ));

        let (queue, handle) = spawn_hit_worker(recorder, 100, 4);
        for _ in 0..25 {
            queue.record_hit(short_url(), ClassifiedRequest::direct(Utc::now()));
        }
        drop(queue);
        handle.await.unwrap();

        let total = store.get_value("t:hits:abcde:all").await.unwrap();
        assert_eq!(total.as_deref(), Some("25"));
    }

    #[tokio::test]
    async fn test_panicked_task_is_reported() {
        let handle = tokio::spawn(async { panic!("store driver bug") });
        let joined = handle.await;

        assert!(report_join(joined));
        assert!(!report_join(Ok(())));
    }

    #[tokio::test]
    async fn test_worker_survives_panicking_recording() {
        let mut store = MockStore::new();
        store
            .expect_increment()
            .returning(|_, _| panic!("store driver bug"));

        let recorder = Arc::new(HitRecorder::new(
            Arc::new(store),
            KeySpace::new("t:"),
            RetryPolicy::none(),
        ));

        let (queue, handle) = spawn_hit_worker(recorder, 10, 2);
        for _ in 0..3 {
            queue.record_hit(short_url(), ClassifiedRequest::direct(Utc::now()));
        }
        drop(queue);

        assert!(handle.await.is_ok());
    }
}
