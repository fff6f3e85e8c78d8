use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use redis_connection::{CacheError, CacheResult, CacheStore};

/// Cache backend whose every operation fails, as an unreachable Redis would.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingCache;

fn unreachable_backend<T>() -> CacheResult<T> {
    Err(CacheError::Backend("connection refused".into()))
}

#[async_trait]
impl CacheStore for FailingCache {
    fn kind(&self) -> &'static str { "failing" }

    async fn get(&self, _key: &str) -> CacheResult<Option<Bytes>> {
        unreachable_backend()
    }

    async fn set_with_ttl(
        &self, _key: &str, _value: Bytes, _ttl: Duration,
    ) -> CacheResult<()> {
        unreachable_backend()
    }

    async fn remove(&self, _key: &str) -> CacheResult<bool> {
        unreachable_backend()
    }
}
