use std::{sync::Arc, time::Duration};

use auth::JwtKeys;
use axum::{Json, Router, extract::State, routing::get};
use events_dao::{EventDao, SharedEventStore};
use events_http::{EventHandlers, EventServices};
use participants_dao::{ParticipantDao, SharedParticipantStore};
use participants_http::{ParticipantHandlers, ParticipantServices};
use redis_connection::SharedCache;
use serde::Serialize;
use sql_connection::{Migration, SqlConnect};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use user_dao::{SharedUserStore, UserDao};
use user_http::{UserHandlers, UserServices};
use utoipa::{
    Modify, OpenApi, ToSchema,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_rapidoc::RapiDoc;

/// Every schema migration the services need, in apply order.
pub fn migrations() -> Vec<Migration> {
    [
        events_dao::MIGRATIONS,
        participants_dao::MIGRATIONS,
        user_dao::MIGRATIONS,
    ]
    .concat()
}

/// Store accessors for the three services.
#[derive(Clone)]
pub struct Stores {
    pub events: SharedEventStore,
    pub participants: SharedParticipantStore,
    pub users: SharedUserStore,
}

impl Stores {
    pub fn postgres(db: SqlConnect) -> Self {
        Self {
            events: Arc::new(EventDao::new(db.clone())),
            participants: Arc::new(ParticipantDao::new(db.clone())),
            users: Arc::new(UserDao::new(db)),
        }
    }
}

#[derive(Clone)]
pub struct HealthState {
    db: SqlConnect,
    cache: SharedCache,
}

pub struct AppState {
    pub events: EventServices,
    pub participants: ParticipantServices,
    pub users: UserServices,
    pub keys: JwtKeys,
    pub health: HealthState,
}

impl AppState {
    pub fn new(
        stores: Stores, db: SqlConnect, cache: SharedCache, ttl: Duration,
        keys: JwtKeys,
    ) -> Self {
        Self {
            events: EventServices::new(stores.events, cache.clone(), ttl),
            participants: ParticipantServices::new(
                stores.participants,
                cache.clone(),
                ttl,
            ),
            users: UserServices::new(
                stores.users,
                cache.clone(),
                ttl,
                keys.clone(),
            ),
            keys,
            health: HealthState { db, cache },
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(state.health)
        .nest("/events", EventHandlers::routes().with_state(state.events))
        .nest(
            "/participants",
            ParticipantHandlers::routes().with_state(state.participants),
        )
        .nest(
            "/users",
            UserHandlers::routes(state.keys).with_state(state.users.clone()),
        )
        .merge(UserHandlers::auth_routes().with_state(state.users))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/docs"))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: PoolStatus,
    /// `redis` or `memory`
    pub cache: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PoolStatus {
    pub available: usize,
    pub size: usize,
    pub max_size: usize,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Store pool status and cache backend", body = HealthResponse)
    ),
    tag = "health"
)]
async fn health_check(
    State(health): State<HealthState>,
) -> Json<HealthResponse> {
    let (available, size, max_size) = health.db.get_pool_status();

    Json(HealthResponse {
        status: "ok",
        store: PoolStatus {
            available,
            size,
            max_size,
        },
        cache: health.cache.kind(),
    })
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        events_http::list_events,
        events_http::get_event,
        events_http::create_event,
        events_http::update_event,
        events_http::delete_event,
        participants_http::list_participants,
        participants_http::get_participant,
        participants_http::create_participant,
        participants_http::update_participant,
        participants_http::delete_participant,
        user_http::register,
        user_http::login,
        user_http::current_user,
        user_http::list_users,
        user_http::get_user,
        user_http::update_user,
        user_http::delete_user
    ),
    components(
        schemas(
            HealthResponse,
            PoolStatus,
            events_responses::EventResponse,
            events_commands::CreateEventCommand,
            events_commands::UpdateEventCommand,
            participants_responses::ParticipantResponse,
            participants_commands::CreateParticipantCommand,
            participants_commands::UpdateParticipantCommand,
            user_responses::UserResponse,
            user_responses::RegisterResponse,
            user_responses::LoginResponse,
            user_commands::RegisterUserCommand,
            user_commands::LoginCommand,
            user_commands::UpdateUserCommand,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "events", description = "Event management endpoints"),
        (name = "participants", description = "Participant management endpoints"),
        (name = "users", description = "User search and authentication endpoints")
    ),
    info(
        title = "eventdesk API",
        description = "Cached CRUD gateway for events, participants and users",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
