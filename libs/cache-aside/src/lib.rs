//! Cache-aside read-through over a [`GenericDao`], with invalidation of the
//! unfiltered list key on every successful write.
//!
//! Cache operations are best-effort: a failing cache backend degrades reads
//! to store reads and never fails a write.

use std::{borrow::Cow, time::Duration};

use database_traits::dao::GenericDao;
use redis_connection::{
    SharedCache,
    core::{CacheKey, Json},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, instrument, warn};

pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Cache key family for the list reads of one entity.
pub trait ListCacheKey: CacheKey {
    type Filter;

    /// Key for a filter set; absent filters render as `all`.
    fn key_for(&self, filter: &Self::Filter) -> Cow<'static, str>;

    /// The key a list read without any filter is cached under.
    fn unfiltered_key(&self) -> Cow<'static, str>;
}

pub enum Mutation<D: GenericDao> {
    Create(D::CreateRequest),
    Update(D::ID, D::UpdateRequest),
    Delete(D::ID),
}

#[derive(Clone)]
pub struct QueryGateway<D, K> {
    dao: D,
    keys: K,
    cache: SharedCache,
    ttl: Duration,
}

impl<D, K> QueryGateway<D, K>
where
    D: GenericDao + Send + Sync,
    D::Response: Serialize + DeserializeOwned,
    K: ListCacheKey<Filter = D::Filter, Value = Vec<D::Response>>
        + Send
        + Sync,
{
    pub fn new(dao: D, keys: K, cache: SharedCache) -> Self {
        Self {
            dao,
            keys,
            cache,
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn dao(&self) -> &D { &self.dao }

    pub fn ttl(&self) -> Duration { self.ttl }

    /// Read-through list query.
    ///
    /// A hit is returned as stored, without consulting the store.
    #[instrument(skip_all)]
    pub async fn fetch(
        &self, filter: &D::Filter,
    ) -> Result<Vec<D::Response>, D::Error> {
        let key = self.keys.key_for(filter);

        match self.cache.get_value::<Json<Vec<D::Response>>>(&key).await {
            Ok(Some(cached)) => {
                debug!("Cache hit for {key}");
                return Ok(cached.inner());
            }
            Ok(None) => debug!("Cache miss for {key}, fetching from DB"),
            Err(e) => warn!(cache.key = %key, error = %e, "Cache read failed"),
        }

        let rows = Json(self.dao.find(filter).await?);

        if let Err(e) =
            self.cache.set_value_with_ttl(&key, &rows, self.ttl).await
        {
            warn!(cache.key = %key, error = %e, "Cache write failed");
        }

        Ok(rows.inner())
    }

    /// Applies a write to the store, then drops the unfiltered list entry.
    ///
    /// Returns the written record for create and update, `None` for delete.
    /// A store error leaves the cache untouched.
    pub async fn mutate(
        &self, mutation: Mutation<D>,
    ) -> Result<Option<D::Response>, D::Error> {
        match mutation {
            Mutation::Create(req) => self.create(req).await.map(Some),
            Mutation::Update(id, req) => self.update(id, req).await.map(Some),
            Mutation::Delete(id) => self.delete(id).await.map(|_| None),
        }
    }

    #[instrument(skip_all)]
    pub async fn create(
        &self, req: D::CreateRequest,
    ) -> Result<D::Response, D::Error> {
        let created = self.dao.create(req).await?;
        self.invalidate().await;
        Ok(created)
    }

    #[instrument(skip_all)]
    pub async fn update(
        &self, id: D::ID, req: D::UpdateRequest,
    ) -> Result<D::Response, D::Error> {
        let updated = self.dao.update(id, req).await?;
        self.invalidate().await;
        Ok(updated)
    }

    #[instrument(skip_all)]
    pub async fn delete(&self, id: D::ID) -> Result<(), D::Error> {
        self.dao.delete(id).await?;
        self.invalidate().await;
        Ok(())
    }

    async fn invalidate(&self) {
        let key = self.keys.unfiltered_key();
        match self.cache.remove(&key).await {
            Ok(existed) => info!(cache.key = %key, existed, "Invalidated"),
            Err(e) => {
                warn!(cache.key = %key, error = %e, "Cache invalidation failed")
            }
        }
    }
}
