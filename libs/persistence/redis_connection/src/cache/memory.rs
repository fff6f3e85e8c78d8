use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use moka::{Expiry, future::Cache};

use super::r#trait::{CacheResult, CacheStore};
use crate::config::MemoryConfig;

#[derive(Clone)]
struct CacheEntry {
    bytes: Bytes,
    ttl: Duration,
}

struct PerEntryTtl;

impl Expiry<String, CacheEntry> for PerEntryTtl {
    fn expire_after_create(
        &self, _key: &String, value: &CacheEntry, _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self, _key: &String, value: &CacheEntry, _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process cache backed by moka, used when Redis is not available.
#[derive(Clone)]
pub struct MemoryCache {
    memory: Cache<String, CacheEntry>,
}

impl MemoryCache {
    pub fn new(config: &MemoryConfig) -> Self {
        let memory = Cache::builder()
            .max_capacity(config.capacity)
            .expire_after(PerEntryTtl)
            .build();
        Self { memory }
    }
}

impl Default for MemoryCache {
    fn default() -> Self { Self::new(&MemoryConfig::default()) }
}

#[async_trait]
impl CacheStore for MemoryCache {
    fn kind(&self) -> &'static str { "memory" }

    async fn get(&self, key: &str) -> CacheResult<Option<Bytes>> {
        Ok(self.memory.get(key).await.map(|entry| entry.bytes))
    }

    async fn set_with_ttl(
        &self, key: &str, value: Bytes, ttl: Duration,
    ) -> CacheResult<()> {
        self.memory
            .insert(key.to_string(), CacheEntry { bytes: value, ttl })
            .await;
        Ok(())
    }

    async fn remove(&self, key: &str) -> CacheResult<bool> {
        Ok(self.memory.remove(key).await.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cache::SharedCache,
        core::value::Json,
    };

    #[tokio::test]
    async fn test_set_get_remove() {
        let cache = MemoryCache::default();

        cache
            .set_with_ttl("k", Bytes::from_static(b"v"), Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.get("k").await.unwrap(), Some(Bytes::from_static(b"v")));
        assert!(cache.remove("k").await.unwrap());
        assert!(!cache.remove("k").await.unwrap());
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_entry_expires_after_its_ttl() {
        let cache = MemoryCache::default();

        cache
            .set_with_ttl("short", Bytes::from_static(b"1"), Duration::from_millis(50))
            .await
            .unwrap();
        cache
            .set_with_ttl("long", Bytes::from_static(b"2"), Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(cache.get("short").await.unwrap(), None);
        assert!(cache.get("long").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_typed_values_through_shared_handle() {
        let cache: SharedCache = std::sync::Arc::new(MemoryCache::default());

        cache
            .set_value_with_ttl(
                "names",
                &Json(vec!["a".to_string(), "b".to_string()]),
                Duration::from_secs(60),
            )
            .await
            .unwrap();

        let names: Option<Json<Vec<String>>> =
            cache.get_value("names").await.unwrap();

        assert_eq!(names.unwrap().0, vec!["a", "b"]);
        assert_eq!(cache.kind(), "memory");
    }
}
