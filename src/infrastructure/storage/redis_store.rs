//! Redis-backed store implementation.

use super::service::{Store, StoreError, StoreResult, sort_members};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info};

/// Redis store used in production.
///
/// Uses `ConnectionManager` for connection reuse and automatic reconnects.
/// Unlike a cache, errors are propagated: the registry and the analytics
/// counters live here and nowhere else.
pub struct RedisStore {
    client: ConnectionManager,
}

impl RedisStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the URL is invalid, the connection
    /// cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str) -> StoreResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url)
            .map_err(|e| StoreError::Connection(format!("Failed to create Redis client: {}", e)))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| StoreError::Connection(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self { client: manager })
    }
}

fn op_error(command: &str, key: &str, e: redis::RedisError) -> StoreError {
    StoreError::Operation(format!("{} {} failed: {}", command, key, e))
}

fn to_counts(rows: Vec<(String, f64)>) -> Vec<(String, i64)> {
    rows.into_iter()
        .map(|(member, score)| (member, score as i64))
        .collect()
}

async fn range_with_scores(
    conn: &mut ConnectionManager,
    command: &str,
    key: &str,
    start: isize,
    stop: isize,
) -> StoreResult<Vec<(String, i64)>> {
    let rows: Vec<(String, f64)> = redis::cmd(command)
        .arg(key)
        .arg(start)
        .arg(stop)
        .arg("WITHSCORES")
        .query_async(conn)
        .await
        .map_err(|e| op_error(command, key, e))?;

    Ok(to_counts(rows))
}

/// Replaces the rows scored `boundary` in `head` with every member of that
/// score, then re-sorts and truncates to `limit`.
fn merge_boundary_band(
    head: Vec<(String, i64)>,
    band: Vec<(String, i64)>,
    boundary: i64,
    limit: usize,
    descending: bool,
) -> Vec<(String, i64)> {
    let mut members: Vec<(String, i64)> = head
        .into_iter()
        .filter(|(_, score)| *score != boundary)
        .collect();
    members.extend(band);

    sort_members(members, Some(limit), descending)
}

#[async_trait]
impl Store for RedisStore {
    async fn get_value(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.client.clone();
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|e| op_error("GET", key, e))
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> StoreResult<bool> {
        let mut conn = self.client.clone();
        let created = conn
            .set_nx::<_, _, bool>(key, value)
            .await
            .map_err(|e| op_error("SETNX", key, e))?;

        debug!("SETNX {} -> {}", key, created);
        Ok(created)
    }

    async fn increment(&self, key: &str, delta: i64) -> StoreResult<i64> {
        let mut conn = self.client.clone();
        conn.incr::<_, _, i64>(key, delta)
            .await
            .map_err(|e| op_error("INCRBY", key, e))
    }

    async fn sorted_set_increment(
        &self,
        key: &str,
        member: &str,
        delta: i64,
    ) -> StoreResult<i64> {
        let mut conn = self.client.clone();
        let score: f64 = redis::cmd("ZINCRBY")
            .arg(key)
            .arg(delta)
            .arg(member)
            .query_async(&mut conn)
            .await
            .map_err(|e| op_error("ZINCRBY", key, e))?;

        Ok(score as i64)
    }

    async fn sorted_set_top_n(
        &self,
        key: &str,
        limit: Option<usize>,
        descending: bool,
    ) -> StoreResult<Vec<(String, i64)>> {
        let mut conn = self.client.clone();
        let command = if descending { "ZREVRANGE" } else { "ZRANGE" };

        let Some(limit) = limit else {
            let rows = range_with_scores(&mut conn, command, key, 0, -1).await?;
            return Ok(sort_members(rows, None, descending));
        };
        if limit == 0 {
            return Ok(Vec::new());
        }

        let head = range_with_scores(&mut conn, command, key, 0, limit as isize - 1).await?;
        let Some(&(_, boundary)) = head.get(limit - 1) else {
            return Ok(sort_members(head, Some(limit), descending));
        };

        // Redis orders equal scores by reverse lex in ZREVRANGE, so members
        // tied with the last row may sort ahead of the ones it returned.
        let band: Vec<(String, f64)> = redis::cmd("ZRANGEBYSCORE")
            .arg(key)
            .arg(boundary)
            .arg(boundary)
            .arg("WITHSCORES")
            .query_async(&mut conn)
            .await
            .map_err(|e| op_error("ZRANGEBYSCORE", key, e))?;

        Ok(merge_boundary_band(
            head,
            to_counts(band),
            boundary,
            limit,
            descending,
        ))
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
