use cache_aside::QueryGateway;
use dao_utils::error_handling::parse_id;
use events_cache_keys::EventListCacheKey;
use events_commands::{
    CreateEventCommand, DeleteEventCommand, UpdateEventCommand,
};
use events_dao::SharedEventStore;
use events_errors::EventError;
use events_models::NewEvent;
use events_responses::EventResponse;
use tracing::instrument;

pub type EventGateway = QueryGateway<SharedEventStore, EventListCacheKey>;

fn required(value: Option<String>, field: &str) -> Result<String, EventError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| EventError::Validation(format!("{field} is required")))
}

fn validate(
    name: Option<String>, date: Option<String>, kind: Option<String>,
) -> Result<NewEvent, EventError> {
    Ok(NewEvent {
        name: required(name, "name")?,
        date: required(date, "date")?,
        kind: required(kind, "type")?,
    })
}

fn not_found(event_id: String) -> EventError {
    EventError::NotFound { event_id }
}

#[derive(Clone)]
pub struct CreateEventHandler {
    gateway: EventGateway,
}

impl CreateEventHandler {
    pub fn new(gateway: EventGateway) -> Self { Self { gateway } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, command: CreateEventCommand,
    ) -> Result<EventResponse, EventError> {
        let event = validate(command.name, command.date, command.kind)?;
        self.gateway.create(event).await
    }
}

#[derive(Clone)]
pub struct UpdateEventHandler {
    gateway: EventGateway,
}

impl UpdateEventHandler {
    pub fn new(gateway: EventGateway) -> Self { Self { gateway } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, command: UpdateEventCommand,
    ) -> Result<EventResponse, EventError> {
        let event = validate(command.name, command.date, command.kind)?;
        let id = parse_id(&command.event_id)
            .ok_or_else(|| not_found(command.event_id))?;

        self.gateway.update(id, event).await
    }
}

#[derive(Clone)]
pub struct DeleteEventHandler {
    gateway: EventGateway,
}

impl DeleteEventHandler {
    pub fn new(gateway: EventGateway) -> Self { Self { gateway } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, command: DeleteEventCommand,
    ) -> Result<(), EventError> {
        let id = parse_id(&command.event_id)
            .ok_or_else(|| not_found(command.event_id))?;

        self.gateway.delete(id).await
    }
}
