use cache_aside::QueryGateway;
use dao_utils::error_handling::parse_id;
use database_traits::dao::GenericDao;
use events_cache_keys::EventListCacheKey;
use events_dao::SharedEventStore;
use events_errors::EventError;
use events_queries::{GetEventQuery, ListEventsQuery};
use events_responses::EventResponse;
use tracing::instrument;

type EventGateway = QueryGateway<SharedEventStore, EventListCacheKey>;

/// Single reads go straight to the store.
#[derive(Clone)]
pub struct GetEventQueryHandler {
    gateway: EventGateway,
}

impl GetEventQueryHandler {
    pub fn new(gateway: EventGateway) -> Self { Self { gateway } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: GetEventQuery,
    ) -> Result<EventResponse, EventError> {
        let id = parse_id(&query.event_id).ok_or(EventError::NotFound {
            event_id: query.event_id,
        })?;

        self.gateway.dao().find_by_id(id).await
    }
}

#[derive(Clone)]
pub struct ListEventsQueryHandler {
    gateway: EventGateway,
}

impl ListEventsQueryHandler {
    pub fn new(gateway: EventGateway) -> Self { Self { gateway } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: ListEventsQuery,
    ) -> Result<Vec<EventResponse>, EventError> {
        self.gateway.fetch(&query).await
    }
}

#[cfg(test)]
mod tests {
    use events_models::{Event, NewEvent};
    use test_utils::{InMemoryDao, memory_cache};

    use super::*;

    fn gateway() -> EventGateway {
        let store: SharedEventStore = InMemoryDao::<Event>::new_shared();
        QueryGateway::new(store, EventListCacheKey, memory_cache())
    }

    fn event(name: &str, date: &str, kind: &str) -> NewEvent {
        NewEvent {
            name: name.into(),
            date: date.into(),
            kind: kind.into(),
        }
    }

    #[tokio::test]
    async fn test_list_filters_by_date_and_type() {
        let gateway = gateway();
        gateway.create(event("a", "2024-12-01", "conference")).await.unwrap();
        gateway.create(event("b", "2024-12-05", "meetup")).await.unwrap();
        gateway.create(event("c", "2024-12-05", "conference")).await.unwrap();
        let handler = ListEventsQueryHandler::new(gateway);

        let all = handler.execute(ListEventsQuery::default()).await.unwrap();
        let meetups = handler
            .execute(ListEventsQuery {
                date: None,
                kind: Some("meetup".into()),
            })
            .await
            .unwrap();
        let both = handler
            .execute(ListEventsQuery {
                date: Some("2024-12-05".into()),
                kind: Some("conference".into()),
            })
            .await
            .unwrap();

        assert_eq!(all.len(), 3);
        assert_eq!(meetups.len(), 1);
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].name, "c");
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let gateway = gateway();
        let created = gateway
            .create(event("a", "2024-12-01", "conference"))
            .await
            .unwrap();
        let handler = GetEventQueryHandler::new(gateway);

        let found = handler
            .execute(GetEventQuery {
                event_id: created.id.to_string(),
            })
            .await
            .unwrap();
        let missing = handler
            .execute(GetEventQuery {
                event_id: "nope".into(),
            })
            .await;

        assert_eq!(found, created);
        assert!(matches!(missing, Err(EventError::NotFound { .. })));
    }
}
