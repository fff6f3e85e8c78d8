use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `event_id` is also accepted as `eventId`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateParticipantCommand {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "eventId")]
    pub event_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateParticipantCommand {
    #[serde(skip)]
    pub participant_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "eventId")]
    pub event_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteParticipantCommand {
    pub participant_id: String,
}
