use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;

use crate::core::value::CacheValue;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Cache backend error: {0}")]
    Backend(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Byte-level cache backend.
///
/// Entries expire on their own after the TTL given at write time; there is
/// no explicit eviction besides [`CacheStore::remove`].
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Short backend name reported by the health endpoint.
    fn kind(&self) -> &'static str;

    /// Get the raw value, `None` when the key is absent or expired
    async fn get(&self, key: &str) -> CacheResult<Option<Bytes>>;

    async fn set_with_ttl(
        &self, key: &str, value: Bytes, ttl: Duration,
    ) -> CacheResult<()>;

    /// Remove key from cache, returns whether it existed
    async fn remove(&self, key: &str) -> CacheResult<bool>;
}

pub type SharedCache = Arc<dyn CacheStore>;

impl dyn CacheStore {
    pub async fn get_value<V: CacheValue>(
        &self, key: &str,
    ) -> CacheResult<Option<V>> {
        match self.get(key).await? {
            Some(bytes) => V::from_bytes(&bytes).map(Some),
            None => Ok(None),
        }
    }

    pub async fn set_value_with_ttl<V: CacheValue>(
        &self, key: &str, value: &V, ttl: Duration,
    ) -> CacheResult<()> {
        let bytes = value.to_bytes()?;
        self.set_with_ttl(key, Bytes::from(bytes), ttl).await
    }
}
