use cache_aside::QueryGateway;
use dao_utils::error_handling::parse_id;
use database_traits::dao::GenericDao;
use participants_cache_keys::ParticipantListCacheKey;
use participants_dao::SharedParticipantStore;
use participants_errors::ParticipantError;
use participants_queries::{GetParticipantQuery, ListParticipantsQuery};
use participants_responses::ParticipantResponse;
use tracing::instrument;

type ParticipantGateway =
    QueryGateway<SharedParticipantStore, ParticipantListCacheKey>;

#[derive(Clone)]
pub struct GetParticipantQueryHandler {
    gateway: ParticipantGateway,
}

impl GetParticipantQueryHandler {
    pub fn new(gateway: ParticipantGateway) -> Self { Self { gateway } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: GetParticipantQuery,
    ) -> Result<ParticipantResponse, ParticipantError> {
        let id = parse_id(&query.participant_id).ok_or(
            ParticipantError::NotFound {
                participant_id: query.participant_id,
            },
        )?;

        self.gateway.dao().find_by_id(id).await
    }
}

#[derive(Clone)]
pub struct ListParticipantsQueryHandler {
    gateway: ParticipantGateway,
}

impl ListParticipantsQueryHandler {
    pub fn new(gateway: ParticipantGateway) -> Self { Self { gateway } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, query: ListParticipantsQuery,
    ) -> Result<Vec<ParticipantResponse>, ParticipantError> {
        self.gateway.fetch(&query).await
    }
}

#[cfg(test)]
mod tests {
    use participants_models::{NewParticipant, Participant};
    use test_utils::{InMemoryDao, memory_cache};

    use super::*;

    #[tokio::test]
    async fn test_list_by_event() {
        let dao = InMemoryDao::<Participant>::new_shared();
        for (name, event_id) in [("a", "e1"), ("b", "e2"), ("c", "e1")] {
            dao.insert_behind_cache(NewParticipant {
                name: name.into(),
                event_id: event_id.into(),
            })
            .await;
        }
        let store: SharedParticipantStore = dao.clone();
        let handler = ListParticipantsQueryHandler::new(QueryGateway::new(
            store,
            ParticipantListCacheKey,
            memory_cache(),
        ));

        let e1 = handler
            .execute(ListParticipantsQuery {
                event_id: Some("e1".into()),
            })
            .await
            .unwrap();

        assert_eq!(
            e1.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            vec!["a", "c"]
        );
    }

    #[tokio::test]
    async fn test_get_unknown_participant() {
        let store: SharedParticipantStore =
            InMemoryDao::<Participant>::new_shared();
        let handler = GetParticipantQueryHandler::new(QueryGateway::new(
            store,
            ParticipantListCacheKey,
            memory_cache(),
        ));

        let result = handler
            .execute(GetParticipantQuery {
                participant_id: uuid_string(),
            })
            .await;

        assert!(matches!(result, Err(ParticipantError::NotFound { .. })));
    }

    fn uuid_string() -> String {
        "0190a0a0-0000-7000-8000-000000000000".to_string()
    }
}
