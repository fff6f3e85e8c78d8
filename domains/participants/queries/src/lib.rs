use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize)]
pub struct GetParticipantQuery {
    pub participant_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParticipantsQuery {
    /// Exact match on the referenced event
    #[serde(default)]
    pub event_id: Option<String>,
}
