//! Key-value storage backing the registry and the analytics counters.
//!
//! Provides a [`Store`] trait with two implementations:
//! - [`RedisStore`] - Production Redis-backed store
//! - [`MemoryStore`] - In-process store for tests and local runs

mod memory_store;
mod redis_store;
mod service;

pub use memory_store::MemoryStore;
pub use redis_store::RedisStore;
pub use service::{Store, StoreError, StoreResult, sort_members};

#[cfg(test)]
pub use service::MockStore;
