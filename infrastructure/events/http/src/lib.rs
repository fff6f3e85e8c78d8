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
use events_cache_keys::EventListCacheKey;
use events_command_handlers::{
    CreateEventHandler, DeleteEventHandler, UpdateEventHandler,
};
use events_commands::{
    CreateEventCommand, DeleteEventCommand, UpdateEventCommand,
};
use events_dao::SharedEventStore;
use events_queries::{GetEventQuery, ListEventsQuery};
use events_query_handlers::{GetEventQueryHandler, ListEventsQueryHandler};
use events_responses::EventResponse;
use redis_connection::SharedCache;
use tracing::instrument;

#[derive(Clone)]
pub struct EventServices {
    pub create_event: CreateEventHandler,
    pub update_event: UpdateEventHandler,
    pub delete_event: DeleteEventHandler,

    pub get_event: GetEventQueryHandler,
    pub list_events: ListEventsQueryHandler,
}

impl EventServices {
    pub fn new(
        store: SharedEventStore, cache: SharedCache, ttl: Duration,
    ) -> Self {
        let gateway =
            QueryGateway::new(store, EventListCacheKey, cache).with_ttl(ttl);
        Self {
            create_event: CreateEventHandler::new(gateway.clone()),
            update_event: UpdateEventHandler::new(gateway.clone()),
            delete_event: DeleteEventHandler::new(gateway.clone()),
            get_event: GetEventQueryHandler::new(gateway.clone()),
            list_events: ListEventsQueryHandler::new(gateway),
        }
    }
}

pub struct EventHandlers;

impl EventHandlers {
    pub fn routes() -> Router<EventServices> {
        Router::new()
            .route("/", get(list_events).post(create_event))
            .route(
                "/{id}",
                get(get_event).put(update_event).delete(delete_event),
            )
    }
}

#[utoipa::path(
    get,
    path = "/events",
    params(ListEventsQuery),
    responses(
        (status = 200, description = "Events matching the filters", body = Vec<EventResponse>),
        (status = 400, description = "Invalid query string", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "events"
)]
#[instrument(skip_all)]
pub async fn list_events(
    State(services): State<EventServices>,
    query: Result<Query<ListEventsQuery>, QueryRejection>,
) -> Result<Json<Vec<EventResponse>>, AppError> {
    let Query(query) = query?;
    let events = services.list_events.execute(query).await?;
    Ok(Json(events))
}

#[utoipa::path(
    get,
    path = "/events/{id}",
    params(
        ("id" = String, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = EventResponse),
        (status = 404, description = "Event not found", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "events"
)]
#[instrument(skip_all)]
pub async fn get_event(
    State(services): State<EventServices>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<EventResponse>, AppError> {
    let Path(id) = path?;
    let event = services
        .get_event
        .execute(GetEventQuery { event_id: id })
        .await?;
    Ok(Json(event))
}

#[utoipa::path(
    post,
    path = "/events",
    request_body = CreateEventCommand,
    responses(
        (status = 201, description = "Event created successfully", body = EventResponse),
        (status = 400, description = "Invalid request data", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "events"
)]
#[instrument(skip_all)]
pub async fn create_event(
    State(services): State<EventServices>,
    payload: Result<Json<CreateEventCommand>, JsonRejection>,
) -> Result<(StatusCode, Json<EventResponse>), AppError> {
    let Json(command) = payload?;
    let result = services.create_event.execute(command).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

#[utoipa::path(
    put,
    path = "/events/{id}",
    request_body = UpdateEventCommand,
    params(
        ("id" = String, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event updated successfully", body = EventResponse),
        (status = 400, description = "Invalid request data", body = common_errors::ApiErrorResponse),
        (status = 404, description = "Event not found", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "events"
)]
#[instrument(skip_all)]
pub async fn update_event(
    State(services): State<EventServices>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateEventCommand>, JsonRejection>,
) -> Result<Json<EventResponse>, AppError> {
    let Path(id) = path?;
    let Json(mut command) = payload?;
    command.event_id = id;
    let result = services.update_event.execute(command).await?;
    Ok(Json(result))
}

#[utoipa::path(
    delete,
    path = "/events/{id}",
    params(
        ("id" = String, Path, description = "Event ID")
    ),
    responses(
        (status = 204, description = "Event deleted successfully"),
        (status = 404, description = "Event not found", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "events"
)]
#[instrument(skip_all)]
pub async fn delete_event(
    State(services): State<EventServices>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    services
        .delete_event
        .execute(DeleteEventCommand { event_id: id })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use events_models::Event;
    use serde_json::{Value, json};
    use test_utils::{InMemoryDao, failing_cache, memory_cache};
    use tower::ServiceExt;

    use super::*;

    fn app(dao: &Arc<InMemoryDao<Event>>, cache: SharedCache) -> Router {
        let store: SharedEventStore = dao.clone();
        EventHandlers::routes().with_state(EventServices::new(
            store,
            cache,
            Duration::from_secs(60),
        ))
    }

    async fn send(
        app: &Router, method: &str, uri: &str, body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request =
                    request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response =
            app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        }
        else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn launch() -> Value {
        json!({"name": "Launch", "date": "2026-01-01", "type": "release"})
    }

    #[tokio::test]
    async fn test_create_returns_created_with_id() {
        let dao = InMemoryDao::<Event>::new_shared();
        let app = app(&dao, memory_cache());

        let (status, body) = send(&app, "POST", "/", Some(launch())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(body["id"].is_string());
        assert_eq!(body["type"], "release");
        assert_eq!(dao.len().await, 1);
    }

    #[tokio::test]
    async fn test_create_missing_field_is_bad_request() {
        let dao = InMemoryDao::<Event>::new_shared();
        let app = app(&dao, memory_cache());

        let (status, body) = send(
            &app,
            "POST",
            "/",
            Some(json!({"name": "Launch", "date": "2026-01-01"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(dao.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_malformed_body_is_bad_request() {
        let dao = InMemoryDao::<Event>::new_shared();
        let app = app(&dao, memory_cache());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_list_filters_by_query_string() {
        let dao = InMemoryDao::<Event>::new_shared();
        let app = app(&dao, memory_cache());
        send(&app, "POST", "/", Some(launch())).await;
        send(
            &app,
            "POST",
            "/",
            Some(json!({"name": "Meetup", "date": "2026-02-01", "type": "social"})),
        )
        .await;

        let (status, all) = send(&app, "GET", "/", None).await;
        let (_, social) = send(&app, "GET", "/?type=social", None).await;
        let (_, empty_filter) = send(&app, "GET", "/?date=", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(all.as_array().unwrap().len(), 2);
        assert_eq!(social.as_array().unwrap().len(), 1);
        assert_eq!(social[0]["name"], "Meetup");
        assert_eq!(empty_filter, all);
    }

    #[tokio::test]
    async fn test_write_is_visible_to_next_unfiltered_read() {
        let dao = InMemoryDao::<Event>::new_shared();
        let app = app(&dao, memory_cache());
        let (_, created) = send(&app, "POST", "/", Some(launch())).await;
        let (_, before) = send(&app, "GET", "/", None).await;
        let uri = format!("/{}", created["id"].as_str().unwrap());

        let (status, _) = send(
            &app,
            "PUT",
            &uri,
            Some(json!({"name": "Relaunch", "date": "2026-01-02", "type": "release"})),
        )
        .await;
        let (_, after) = send(&app, "GET", "/", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(before[0]["name"], "Launch");
        assert_eq!(after[0]["name"], "Relaunch");
    }

    #[tokio::test]
    async fn test_get_update_delete_unknown_id_is_not_found() {
        let dao = InMemoryDao::<Event>::new_shared();
        let app = app(&dao, memory_cache());
        send(&app, "POST", "/", Some(launch())).await;
        let (_, before) = send(&app, "GET", "/", None).await;
        let missing = "/0190a6d8-0000-7000-8000-000000000000";

        let (get, _) = send(&app, "GET", missing, None).await;
        let (put, body) = send(&app, "PUT", missing, Some(launch())).await;
        let (del, _) = send(&app, "DELETE", missing, None).await;
        let (garbage, _) = send(&app, "DELETE", "/not-a-uuid", None).await;
        let (_, after) = send(&app, "GET", "/", None).await;

        assert_eq!(get, StatusCode::NOT_FOUND);
        assert_eq!(put, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "EVENT_NOT_FOUND");
        assert_eq!(del, StatusCode::NOT_FOUND);
        assert_eq!(garbage, StatusCode::NOT_FOUND);
        assert_eq!(before, after);
        assert_eq!(dao.len().await, 1);
    }

    #[tokio::test]
    async fn test_delete_returns_no_content() {
        let dao = InMemoryDao::<Event>::new_shared();
        let app = app(&dao, memory_cache());
        let (_, created) = send(&app, "POST", "/", Some(launch())).await;
        let uri = format!("/{}", created["id"].as_str().unwrap());

        let (status, body) = send(&app, "DELETE", &uri, None).await;
        let (_, list) = send(&app, "GET", "/", None).await;

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_null());
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn test_failing_cache_still_serves() {
        let dao = InMemoryDao::<Event>::new_shared();
        let app = app(&dao, failing_cache());

        let (created, _) = send(&app, "POST", "/", Some(launch())).await;
        let (listed, body) = send(&app, "GET", "/", None).await;

        assert_eq!(created, StatusCode::CREATED);
        assert_eq!(listed, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_query_param_is_json_bad_request() {
        let dao = InMemoryDao::<Event>::new_shared();
        let app = app(&dao, memory_cache());

        let (status, body) = send(&app, "GET", "/?date=a&date=b", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_QUERY");
        assert!(body["error"]["details"].is_string());
        assert_eq!(dao.find_calls(), 0);
    }
}
