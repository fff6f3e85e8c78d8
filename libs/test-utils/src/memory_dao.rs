use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use database_traits::dao::GenericDao;
use tokio::sync::RwLock;
use uuid::Uuid;

/// What an entity needs to live in an [`InMemoryDao`].
pub trait InMemoryEntity: Clone + Send + Sync + 'static {
    type Response: From<Self> + Send + Sync + 'static;
    type Filter: Send + Sync + 'static;
    type CreateRequest: Send + Sync + 'static;
    type UpdateRequest: Send + Sync + 'static;
    type Error: Send + 'static;

    fn id(&self) -> Uuid;

    fn matches(&self, filter: &Self::Filter) -> bool;

    fn create(id: Uuid, req: Self::CreateRequest) -> Self;

    fn apply(&mut self, req: Self::UpdateRequest);

    fn not_found(id: Uuid) -> Self::Error;

    /// Uniqueness check against an existing record.
    fn conflicts(&self, _req: &Self::CreateRequest) -> Option<Self::Error> {
        None
    }
}

/// Vec-backed store with the same observable contract as the Postgres DAOs.
/// Records keep insertion order, which matches `ORDER BY created_at, id`.
pub struct InMemoryDao<E> {
    rows: RwLock<Vec<E>>,
    finds: AtomicUsize,
}

impl<E> Default for InMemoryDao<E> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            finds: AtomicUsize::new(0),
        }
    }
}

impl<E: InMemoryEntity> InMemoryDao<E> {
    pub fn new_shared() -> Arc<Self> { Arc::new(Self::default()) }

    /// Number of list queries that reached the store.
    pub fn find_calls(&self) -> usize { self.finds.load(Ordering::SeqCst) }

    pub async fn len(&self) -> usize { self.rows.read().await.len() }

    pub async fn is_empty(&self) -> bool { self.rows.read().await.is_empty() }

    pub async fn snapshot(&self) -> Vec<E> { self.rows.read().await.clone() }

    /// Writes a record without going through any cache invalidation.
    pub async fn insert_behind_cache(&self, req: E::CreateRequest) -> E {
        let record = E::create(Uuid::now_v7(), req);
        self.rows.write().await.push(record.clone());
        record
    }
}

#[async_trait]
impl<E: InMemoryEntity> GenericDao for InMemoryDao<E> {
    type CreateRequest = E::CreateRequest;
    type Error = E::Error;
    type Filter = E::Filter;
    type ID = Uuid;
    type Model = E;
    type Response = E::Response;
    type UpdateRequest = E::UpdateRequest;

    async fn find(
        &self, filter: &Self::Filter,
    ) -> Result<Vec<Self::Response>, Self::Error> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|row| row.matches(filter))
            .cloned()
            .map(Into::into)
            .collect())
    }

    async fn find_by_id(
        &self, id: Self::ID,
    ) -> Result<Self::Response, Self::Error> {
        let rows = self.rows.read().await;
        rows.iter()
            .find(|row| row.id() == id)
            .cloned()
            .map(Into::into)
            .ok_or_else(|| E::not_found(id))
    }

    async fn create(
        &self, req: Self::CreateRequest,
    ) -> Result<Self::Response, Self::Error> {
        let mut rows = self.rows.write().await;
        if let Some(err) = rows.iter().find_map(|row| row.conflicts(&req)) {
            return Err(err);
        }
        let record = E::create(Uuid::now_v7(), req);
        rows.push(record.clone());
        Ok(record.into())
    }

    async fn update(
        &self, id: Self::ID, req: Self::UpdateRequest,
    ) -> Result<Self::Response, Self::Error> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|row| row.id() == id)
            .ok_or_else(|| E::not_found(id))?;
        row.apply(req);
        Ok(row.clone().into())
    }

    async fn delete(&self, id: Self::ID) -> Result<(), Self::Error> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|row| row.id() != id);
        if rows.len() == before {
            return Err(E::not_found(id));
        }
        Ok(())
    }
}
