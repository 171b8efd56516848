//! In-process store implementation.

use super::service::{Store, StoreError, StoreResult, sort_members};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::collections::HashMap;
use tracing::debug;

/// A `DashMap`-backed store with the same per-key atomicity as Redis.
///
/// Each mutation runs under the shard lock of its key, so concurrent
/// increments and set-if-absent calls serialize exactly like their Redis
/// counterparts. State lives only as long as the process.
///
/// # Use Cases
///
/// - Unit and integration tests
/// - Local development without Redis (`STORE=memory`)
#[derive(Default)]
pub struct MemoryStore {
    values: DashMap<String, String>,
    sorted_sets: DashMap<String, HashMap<String, i64>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        debug!("Using MemoryStore (state is not persisted)");
        Self::default()
    }

    /// Number of keys currently held, plain values and sorted sets alike.
    pub fn len(&self) -> usize {
        self.values.len() + self.sorted_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.sorted_sets.is_empty()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_value(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.values.get(key).map(|v| v.clone()))
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> StoreResult<bool> {
        match self.values.entry(key.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(value.to_string());
                Ok(true)
            }
        }
    }

    async fn increment(&self, key: &str, delta: i64) -> StoreResult<i64> {
        let mut entry = self
            .values
            .entry(key.to_string())
            .or_insert_with(|| "0".to_string());

        let current: i64 = entry.parse().map_err(|_| {
            StoreError::Operation(format!("value at {} is not an integer", key))
        })?;
        let updated = current + delta;
        *entry = updated.to_string();

        Ok(updated)
    }

    async fn sorted_set_increment(
        &self,
        key: &str,
        member: &str,
        delta: i64,
    ) -> StoreResult<i64> {
        let mut set = self.sorted_sets.entry(key.to_string()).or_default();
        let score = set.entry(member.to_string()).or_insert(0);
        *score += delta;

        Ok(*score)
    }

    async fn sorted_set_top_n(
        &self,
        key: &str,
        limit: Option<usize>,
        descending: bool,
    ) -> StoreResult<Vec<(String, i64)>> {
        let members = match self.sorted_sets.get(key) {
            Some(set) => set.iter().map(|(m, s)| (m.clone(), *s)).collect(),
            None => Vec::new(),
        };

        Ok(sort_members(members, limit, descending))
    }

    async fn health_check(&self) -> bool {
        true
    }
}
