use std::borrow::Cow;

use cache_aside::ListCacheKey;
use participants_queries::ListParticipantsQuery;
use participants_responses::ParticipantResponse;
use redis_connection::{
    cache_key,
    core::{CacheKey, filter_segment},
};

cache_key!(ParticipantListCacheKey::<Vec<ParticipantResponse>> => "participants:{}"[event_id: str]);

impl ListCacheKey for ParticipantListCacheKey {
    type Filter = ListParticipantsQuery;

    fn key_for(&self, filter: &ListParticipantsQuery) -> Cow<'static, str> {
        let event_id = filter_segment(filter.event_id.as_deref());
        self.get_key_with_args((&*event_id,))
    }

    fn unfiltered_key(&self) -> Cow<'static, str> {
        self.key_for(&ListParticipantsQuery::default())
    }
}
