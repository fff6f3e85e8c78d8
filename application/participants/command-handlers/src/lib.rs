use cache_aside::QueryGateway;
use dao_utils::error_handling::parse_id;
use participants_cache_keys::ParticipantListCacheKey;
use participants_commands::{
    CreateParticipantCommand, DeleteParticipantCommand,
    UpdateParticipantCommand,
};
use participants_dao::SharedParticipantStore;
use participants_errors::ParticipantError;
use participants_models::NewParticipant;
use participants_responses::ParticipantResponse;
use tracing::instrument;
use uuid::Uuid;

pub type ParticipantGateway =
    QueryGateway<SharedParticipantStore, ParticipantListCacheKey>;

fn validate(
    name: Option<String>, event_id: Option<String>,
) -> Result<NewParticipant, ParticipantError> {
    match (
        name.filter(|v| !v.trim().is_empty()),
        event_id.filter(|v| !v.trim().is_empty()),
    ) {
        (Some(name), Some(event_id)) => Ok(NewParticipant { name, event_id }),
        _ => {
            Err(ParticipantError::Validation(
                "name and event_id are required".into(),
            ))
        }
    }
}

fn parse(participant_id: String) -> Result<Uuid, ParticipantError> {
    parse_id(&participant_id)
        .ok_or(ParticipantError::NotFound { participant_id })
}

#[derive(Clone)]
pub struct CreateParticipantHandler {
    gateway: ParticipantGateway,
}

impl CreateParticipantHandler {
    pub fn new(gateway: ParticipantGateway) -> Self { Self { gateway } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, command: CreateParticipantCommand,
    ) -> Result<ParticipantResponse, ParticipantError> {
        let participant = validate(command.name, command.event_id)?;
        self.gateway.create(participant).await
    }
}

#[derive(Clone)]
pub struct UpdateParticipantHandler {
    gateway: ParticipantGateway,
}

impl UpdateParticipantHandler {
    pub fn new(gateway: ParticipantGateway) -> Self { Self { gateway } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, command: UpdateParticipantCommand,
    ) -> Result<ParticipantResponse, ParticipantError> {
        let participant = validate(command.name, command.event_id)?;
        let id = parse(command.participant_id)?;

        self.gateway.update(id, participant).await
    }
}

#[derive(Clone)]
pub struct DeleteParticipantHandler {
    gateway: ParticipantGateway,
}

impl DeleteParticipantHandler {
    pub fn new(gateway: ParticipantGateway) -> Self { Self { gateway } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, command: DeleteParticipantCommand,
    ) -> Result<(), ParticipantError> {
        let id = parse(command.participant_id)?;
        self.gateway.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use participants_models::Participant;
    use participants_queries::ListParticipantsQuery;
    use test_utils::{InMemoryDao, memory_cache};

    use super::*;

    fn gateway() -> ParticipantGateway {
        let store: SharedParticipantStore =
            InMemoryDao::<Participant>::new_shared();
        QueryGateway::new(store, ParticipantListCacheKey, memory_cache())
    }

    #[tokio::test]
    async fn test_create_requires_name_and_event() {
        let handler = CreateParticipantHandler::new(gateway());

        let missing = handler
            .execute(CreateParticipantCommand {
                name: Some("Ferris".into()),
                event_id: None,
            })
            .await;

        assert!(matches!(missing, Err(ParticipantError::Validation(_))));
    }

    #[tokio::test]
    async fn test_event_id_is_not_checked() {
        let gateway = gateway();
        let handler = CreateParticipantHandler::new(gateway.clone());

        let created = handler
            .execute(CreateParticipantCommand {
                name: Some("Ferris".into()),
                event_id: Some("no-such-event".into()),
            })
            .await
            .unwrap();

        let listed = gateway
            .fetch(&ListParticipantsQuery {
                event_id: Some("no-such-event".into()),
            })
            .await
            .unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_update_then_delete() {
        let gateway = gateway();
        let created = CreateParticipantHandler::new(gateway.clone())
            .execute(CreateParticipantCommand {
                name: Some("Ferris".into()),
                event_id: Some("e1".into()),
            })
            .await
            .unwrap();

        let updated = UpdateParticipantHandler::new(gateway.clone())
            .execute(UpdateParticipantCommand {
                participant_id: created.id.to_string(),
                name: Some("Ferris".into()),
                event_id: Some("e2".into()),
            })
            .await
            .unwrap();
        assert_eq!(updated.event_id, "e2");

        let delete = DeleteParticipantHandler::new(gateway);
        let command = DeleteParticipantCommand {
            participant_id: created.id.to_string(),
        };
        delete.execute(command.clone()).await.unwrap();

        assert!(matches!(
            delete.execute(command).await,
            Err(ParticipantError::NotFound { .. })
        ));
    }
}
