use std::borrow::Cow;

use cache_aside::ListCacheKey;
use events_queries::ListEventsQuery;
use events_responses::EventResponse;
use redis_connection::{
    cache_key,
    core::{CacheKey, filter_segment},
};

cache_key!(EventListCacheKey::<Vec<EventResponse>> => "events:{}:{}"[date: str, kind: str]);

impl ListCacheKey for EventListCacheKey {
    type Filter = ListEventsQuery;

    fn key_for(&self, filter: &ListEventsQuery) -> Cow<'static, str> {
        let date = filter_segment(filter.date.as_deref());
        let kind = filter_segment(filter.kind.as_deref());
        self.get_key_with_args((&*date, &*kind))
    }

    fn unfiltered_key(&self) -> Cow<'static, str> {
        self.key_for(&ListEventsQuery::default())
    }
}
