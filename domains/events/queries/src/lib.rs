use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize)]
pub struct GetEventQuery {
    pub event_id: String,
}

/// List filters, both exact match. Absent or empty means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListEventsQuery {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}
