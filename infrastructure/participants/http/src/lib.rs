use std::time::Duration;

use axum::{
    Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json,
    routing::get,
};
use cache_aside::QueryGateway;
use common_errors::AppError;
use participants_cache_keys::ParticipantListCacheKey;
use participants_command_handlers::{
    CreateParticipantHandler, DeleteParticipantHandler,
    UpdateParticipantHandler,
};
use participants_commands::{
    CreateParticipantCommand, DeleteParticipantCommand,
    UpdateParticipantCommand,
};
use participants_dao::SharedParticipantStore;
use participants_queries::{GetParticipantQuery, ListParticipantsQuery};
use participants_query_handlers::{
    GetParticipantQueryHandler, ListParticipantsQueryHandler,
};
use participants_responses::ParticipantResponse;
use redis_connection::SharedCache;
use tracing::instrument;

#[derive(Clone)]
pub struct ParticipantServices {
    pub create_participant: CreateParticipantHandler,
    pub update_participant: UpdateParticipantHandler,
    pub delete_participant: DeleteParticipantHandler,

    pub get_participant: GetParticipantQueryHandler,
    pub list_participants: ListParticipantsQueryHandler,
}

impl ParticipantServices {
    pub fn new(
        store: SharedParticipantStore, cache: SharedCache, ttl: Duration,
    ) -> Self {
        let gateway = QueryGateway::new(store, ParticipantListCacheKey, cache)
            .with_ttl(ttl);
        Self {
            create_participant: CreateParticipantHandler::new(gateway.clone()),
            update_participant: UpdateParticipantHandler::new(gateway.clone()),
            delete_participant: DeleteParticipantHandler::new(gateway.clone()),
            get_participant: GetParticipantQueryHandler::new(gateway.clone()),
            list_participants: ListParticipantsQueryHandler::new(gateway),
        }
    }
}

pub struct ParticipantHandlers;

impl ParticipantHandlers {
    pub fn routes() -> Router<ParticipantServices> {
        Router::new()
            .route("/", get(list_participants).post(create_participant))
            .route(
                "/{id}",
                get(get_participant)
                    .put(update_participant)
                    .delete(delete_participant),
            )
    }
}

#[utoipa::path(
    get,
    path = "/participants",
    params(ListParticipantsQuery),
    responses(
        (status = 200, description = "Participants matching the filter", body = Vec<ParticipantResponse>),
        (status = 400, description = "Invalid query string", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "participants"
)]
#[instrument(skip_all)]
pub async fn list_participants(
    State(services): State<ParticipantServices>,
    query: Result<Query<ListParticipantsQuery>, QueryRejection>,
) -> Result<Json<Vec<ParticipantResponse>>, AppError> {
    let Query(query) = query?;
    let participants = services.list_participants.execute(query).await?;
    Ok(Json(participants))
}

#[utoipa::path(
    get,
    path = "/participants/{id}",
    params(
        ("id" = String, Path, description = "Participant ID")
    ),
    responses(
        (status = 200, description = "Participant found", body = ParticipantResponse),
        (status = 404, description = "Participant not found", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "participants"
)]
#[instrument(skip_all)]
pub async fn get_participant(
    State(services): State<ParticipantServices>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<ParticipantResponse>, AppError> {
    let Path(id) = path?;
    let participant = services
        .get_participant
        .execute(GetParticipantQuery { participant_id: id })
        .await?;
    Ok(Json(participant))
}

#[utoipa::path(
    post,
    path = "/participants",
    request_body = CreateParticipantCommand,
    responses(
        (status = 201, description = "Participant created successfully", body = ParticipantResponse),
        (status = 400, description = "Invalid request data", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "participants"
)]
#[instrument(skip_all)]
pub async fn create_participant(
    State(services): State<ParticipantServices>,
    payload: Result<Json<CreateParticipantCommand>, JsonRejection>,
) -> Result<(StatusCode, Json<ParticipantResponse>), AppError> {
    let Json(command) = payload?;
    let result = services.create_participant.execute(command).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

#[utoipa::path(
    put,
    path = "/participants/{id}",
    request_body = UpdateParticipantCommand,
    params(
        ("id" = String, Path, description = "Participant ID")
    ),
    responses(
        (status = 200, description = "Participant updated successfully", body = ParticipantResponse),
        (status = 400, description = "Invalid request data", body = common_errors::ApiErrorResponse),
        (status = 404, description = "Participant not found", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "participants"
)]
#[instrument(skip_all)]
pub async fn update_participant(
    State(services): State<ParticipantServices>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateParticipantCommand>, JsonRejection>,
) -> Result<Json<ParticipantResponse>, AppError> {
    let Path(id) = path?;
    let Json(mut command) = payload?;
    command.participant_id = id;
    let result = services.update_participant.execute(command).await?;
    Ok(Json(result))
}

#[utoipa::path(
    delete,
    path = "/participants/{id}",
    params(
        ("id" = String, Path, description = "Participant ID")
    ),
    responses(
        (status = 204, description = "Participant deleted successfully"),
        (status = 404, description = "Participant not found", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "participants"
)]
#[instrument(skip_all)]
pub async fn delete_participant(
    State(services): State<ParticipantServices>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    services
        .delete_participant
        .execute(DeleteParticipantCommand { participant_id: id })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use participants_models::Participant;
    use serde_json::{Value, json};
    use test_utils::{InMemoryDao, memory_cache};
    use tower::ServiceExt;

    use super::*;

    fn app(dao: &Arc<InMemoryDao<Participant>>) -> Router {
        let store: SharedParticipantStore = dao.clone();
        ParticipantHandlers::routes().with_state(ParticipantServices::new(
            store,
            memory_cache(),
            Duration::from_secs(60),
        ))
    }

    async fn send(
        app: &Router, method: &str, uri: &str, body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        let body = body.map_or_else(Body::empty, |b| Body::from(b.to_string()));
        let response =
            app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        if bytes.is_empty() {
            return (status, Value::Null);
        }
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_crud_flow() {
        let dao = InMemoryDao::<Participant>::new_shared();
        let app = app(&dao);

        let (status, created) = send(
            &app,
            "POST",
            "/",
            Some(json!({"name": "Ann", "event_id": "evt-1"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let uri = format!("/{}", created["id"].as_str().unwrap());

        let (status, fetched) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, updated) = send(
            &app,
            "PUT",
            &uri,
            Some(json!({"name": "Ann B.", "event_id": "evt-2"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["event_id"], "evt-2");

        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(dao.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_by_event() {
        let dao = InMemoryDao::<Participant>::new_shared();
        let app = app(&dao);
        for (name, event_id) in [("Ann", "evt-1"), ("Bob", "evt-2")] {
            send(
                &app,
                "POST",
                "/",
                Some(json!({"name": name, "event_id": event_id})),
            )
            .await;
        }

        let (_, all) = send(&app, "GET", "/", None).await;
        let (_, evt2) = send(&app, "GET", "/?event_id=evt-2", None).await;

        assert_eq!(all.as_array().unwrap().len(), 2);
        assert_eq!(evt2.as_array().unwrap().len(), 1);
        assert_eq!(evt2[0]["name"], "Bob");
    }

    #[tokio::test]
    async fn test_validation_and_not_found() {
        let dao = InMemoryDao::<Participant>::new_shared();
        let app = app(&dao);

        let (missing_field, body) =
            send(&app, "POST", "/", Some(json!({"name": "Ann"}))).await;
        let (unknown, not_found) = send(
            &app,
            "PUT",
            "/0190a6d8-0000-7000-8000-000000000000",
            Some(json!({"name": "Ann", "event_id": "evt-1"})),
        )
        .await;

        assert_eq!(missing_field, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(unknown, StatusCode::NOT_FOUND);
        assert_eq!(not_found["error"]["code"], "PARTICIPANT_NOT_FOUND");
        assert!(dao.is_empty().await);
    }

    #[tokio::test]
    async fn test_camel_case_event_id_in_body() {
        let dao = InMemoryDao::<Participant>::new_shared();
        let app = app(&dao);

        let (status, created) = send(
            &app,
            "POST",
            "/",
            Some(json!({"name": "Participant 1", "eventId": "evt-1"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["event_id"], "evt-1");

        let uri = format!("/{}", created["id"].as_str().unwrap());
        let (status, updated) = send(
            &app,
            "PUT",
            &uri,
            Some(json!({"name": "Participant 1", "eventId": "evt-2"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["event_id"], "evt-2");
    }

    #[tokio::test]
    async fn test_malformed_query_uses_error_body() {
        let dao = InMemoryDao::<Participant>::new_shared();
        let app = app(&dao);

        let (status, body) =
            send(&app, "GET", "/?event_id=a&event_id=b", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_QUERY");
    }
}
