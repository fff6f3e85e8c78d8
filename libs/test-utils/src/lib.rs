//! Docker-free test doubles: an in-memory store for every entity and cache
//! backends for exercising the best-effort cache paths.

pub mod entities;
pub mod failing_cache;
pub mod memory_dao;

use std::sync::Arc;

pub use failing_cache::FailingCache;
pub use memory_dao::{InMemoryDao, InMemoryEntity};
use redis_connection::{MemoryCache, SharedCache};

pub fn memory_cache() -> SharedCache { Arc::new(MemoryCache::default()) }

pub fn failing_cache() -> SharedCache { Arc::new(FailingCache) }
