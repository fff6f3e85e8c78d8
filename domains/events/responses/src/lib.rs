use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EventResponse {
    pub id: Uuid,
    pub name: String,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<events_models::Event> for EventResponse {
    fn from(event: events_models::Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            date: event.date,
            kind: event.kind,
            created_at: event.created_at,
        }
    }
}
