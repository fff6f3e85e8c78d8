use cache_aside::QueryGateway;
use dao_utils::error_handling::parse_id;
use database_traits::dao::GenericDao;
use tracing::instrument;
use user_cache_keys::UserListCacheKey;
use user_dao::SharedUserStore;
use user_errors::UserError;
use user_queries::{GetUserQuery, ListUsersQuery};
use user_responses::UserResponse;

type UserGateway = QueryGateway<SharedUserStore, UserListCacheKey>;

#[derive(Clone)]
pub struct GetUserQueryHandler {
    gateway: UserGateway,
}

impl GetUserQueryHandler {
    pub fn new(gateway: UserGateway) -> Self { Self { gateway } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: GetUserQuery,
    ) -> Result<UserResponse, UserError> {
        let id = parse_id(&query.user_id).ok_or(UserError::NotFound {
            user_id: query.user_id,
        })?;

        self.gateway.dao().find_by_id(id).await
    }
}

#[derive(Clone)]
pub struct ListUsersQueryHandler {
    gateway: UserGateway,
}

impl ListUsersQueryHandler {
    pub fn new(gateway: UserGateway) -> Self { Self { gateway } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: ListUsersQuery,
    ) -> Result<Vec<UserResponse>, UserError> {
        self.gateway.fetch(&query).await
    }
}

#[cfg(test)]
mod tests {
    use test_utils::{InMemoryDao, memory_cache};
    use user_models::{NewUser, User};

    use super::*;

    #[tokio::test]
    async fn test_list_is_cached_per_filter() {
        let dao = InMemoryDao::<User>::new_shared();
        dao.insert_behind_cache(NewUser {
            name: Some("Ferris".into()),
            email: "ferris@example.com".into(),
            password_hash: "hash".into(),
        })
        .await;
        let store: SharedUserStore = dao.clone();
        let handler = ListUsersQueryHandler::new(QueryGateway::new(
            store,
            UserListCacheKey,
            memory_cache(),
        ));
        let by_email = ListUsersQuery {
            name: None,
            email: Some("ferris".into()),
        };

        let first = handler.execute(by_email.clone()).await.unwrap();
        let second = handler.execute(by_email).await.unwrap();
        handler.execute(ListUsersQuery::default()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_eq!(dao.find_calls(), 2);
    }
}
