use std::borrow::Cow;

use cache_aside::ListCacheKey;
use redis_connection::{
    cache_key,
    core::{CacheKey, filter_segment},
};
use user_queries::ListUsersQuery;
use user_responses::UserResponse;

cache_key!(UserListCacheKey::<Vec<UserResponse>> => "users:{}:{}"[name: str, email: str]);

impl ListCacheKey for UserListCacheKey {
    type Filter = ListUsersQuery;

    fn key_for(&self, filter: &ListUsersQuery) -> Cow<'static, str> {
        let name = filter_segment(filter.name.as_deref());
        let email = filter_segment(filter.email.as_deref());
        self.get_key_with_args((&*name, &*email))
    }

    fn unfiltered_key(&self) -> Cow<'static, str> {
        self.key_for(&ListUsersQuery::default())
    }
}
