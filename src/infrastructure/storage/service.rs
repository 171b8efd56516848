//! Storage trait and error types.

use async_trait::async_trait;
use std::cmp::Ordering;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage connection error: {0}")]
    Connection(String),

    #[error("Storage operation error: {0}")]
    Operation(String),
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Atomic key-value primitives used by the registry and the analytics engine.
///
/// Every operation is atomic for a single key (or a single member of a sorted
/// set). No multi-key transactions are offered or required, and there is no
/// caching layer in front of an implementation: every read is authoritative.
///
/// # Implementations
///
/// - [`crate::infrastructure::storage::RedisStore`] - Redis-backed store
/// - [`crate::infrastructure::storage::MemoryStore`] - `DashMap`-backed store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    /// Reads a plain value.
    ///
    /// Returns `Ok(None)` when the key does not exist.
    async fn get_value(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes `value` only if `key` does not exist yet.
    ///
    /// Returns `true` when this call created the key, `false` when it was
    /// already present (the stored value is left untouched).
    async fn set_if_absent(&self, key: &str, value: &str) -> StoreResult<bool>;

    /// Atomically adds `delta` to an integer counter, creating it at zero.
    ///
    /// Returns the counter value after the increment.
    async fn increment(&self, key: &str, delta: i64) -> StoreResult<i64>;

    /// Atomically adds `delta` to the score of `member` in the sorted set at `key`.
    ///
    /// Returns the member's score after the increment.
    async fn sorted_set_increment(&self, key: &str, member: &str, delta: i64)
    -> StoreResult<i64>;

    /// Reads members of a sorted set ordered by score.
    ///
    /// `limit = None` returns the whole set. Members with equal scores are
    /// ordered lexically ascending regardless of `descending`.
    async fn sorted_set_top_n(
        &self,
        key: &str,
        limit: Option<usize>,
        descending: bool,
    ) -> StoreResult<Vec<(String, i64)>>;

    /// Checks if the backend is reachable.
    async fn health_check(&self) -> bool;
}

/// Orders `(member, score)` pairs by score, breaking ties by member, then truncates.
pub fn sort_members(
    mut members: Vec<(String, i64)>,
    limit: Option<usize>,
    descending: bool,
) -> Vec<(String, i64)> {
    members.sort_by(|(a_member, a_score), (b_member, b_score)| {
        let by_score = if descending {
            b_score.cmp(a_score)
        } else {
            a_score.cmp(b_score)
        };
        match by_score {
            Ordering::Equal => a_member.cmp(b_member),
            other => other,
        }
    });

    if let Some(limit) = limit {
        members.truncate(limit);
    }

    members
}
