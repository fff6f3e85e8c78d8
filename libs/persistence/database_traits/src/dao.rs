use std::sync::Arc;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// Store-side contract of a single entity collection.
///
/// `find` applies only the constraints present in `Filter`; an empty filter
/// returns every record. `update` and `delete` must report a missing `ID`
/// through `Error` rather than succeeding silently.
#[async_trait]
pub trait GenericDao {
    type Model: Send + Sync + 'static;
    type Response: From<Self::Model> + Send + Sync + 'static;
    type Filter: Send + Sync + 'static;
    type CreateRequest: Send + Sync + 'static;
    type UpdateRequest: Send + Sync + 'static;
    type Error: Send + 'static;
    type ID: Serialize + DeserializeOwned + Send + Sync + 'static;

    async fn find(
        &self, filter: &Self::Filter,
    ) -> Result<Vec<Self::Response>, Self::Error>;

    async fn find_by_id(
        &self, id: Self::ID,
    ) -> Result<Self::Response, Self::Error>;

    async fn create(
        &self, req: Self::CreateRequest,
    ) -> Result<Self::Response, Self::Error>;

    async fn update(
        &self, id: Self::ID, req: Self::UpdateRequest,
    ) -> Result<Self::Response, Self::Error>;

    async fn delete(&self, id: Self::ID) -> Result<(), Self::Error>;
}

#[async_trait]
impl<T> GenericDao for Arc<T>
where
    T: GenericDao + ?Sized + Send + Sync,
{
    type CreateRequest = T::CreateRequest;
    type Error = T::Error;
    type Filter = T::Filter;
    type ID = T::ID;
    type Model = T::Model;
    type Response = T::Response;
    type UpdateRequest = T::UpdateRequest;

    async fn find(
        &self, filter: &Self::Filter,
    ) -> Result<Vec<Self::Response>, Self::Error> {
        (**self).find(filter).await
    }

    async fn find_by_id(
        &self, id: Self::ID,
    ) -> Result<Self::Response, Self::Error> {
        (**self).find_by_id(id).await
    }

    async fn create(
        &self, req: Self::CreateRequest,
    ) -> Result<Self::Response, Self::Error> {
        (**self).create(req).await
    }

    async fn update(
        &self, id: Self::ID, req: Self::UpdateRequest,
    ) -> Result<Self::Response, Self::Error> {
        (**self).update(id, req).await
    }

    async fn delete(&self, id: Self::ID) -> Result<(), Self::Error> {
        (**self).delete(id).await
    }
}
