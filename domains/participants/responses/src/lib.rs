use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ParticipantResponse {
    pub id: Uuid,
    pub name: String,
    pub event_id: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<participants_models::Participant> for ParticipantResponse {
    fn from(participant: participants_models::Participant) -> Self {
        Self {
            id: participant.id,
            name: participant.name,
            event_id: participant.event_id,
            created_at: participant.created_at,
        }
    }
}
