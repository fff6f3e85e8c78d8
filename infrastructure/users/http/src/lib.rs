use std::time::Duration;

use auth::{Claims, JwtKeys, require_bearer};
use axum::{
    Extension, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json,
    routing::{get, post},
};
use cache_aside::QueryGateway;
use common_errors::AppError;
use redis_connection::SharedCache;
use tracing::{info, instrument};
use user_cache_keys::UserListCacheKey;
use user_command_handlers::{
    DeleteUserHandler, LoginHandler, RegisterUserHandler, UpdateUserHandler,
};
use user_commands::{
    DeleteUserCommand, LoginCommand, RegisterUserCommand, UpdateUserCommand,
};
use user_dao::SharedUserStore;
use user_queries::{GetUserQuery, ListUsersQuery};
use user_query_handlers::{GetUserQueryHandler, ListUsersQueryHandler};
use user_responses::{LoginResponse, RegisterResponse, UserResponse};

#[derive(Clone)]
pub struct UserServices {
    pub register_user: RegisterUserHandler,
    pub login: LoginHandler,
    pub update_user: UpdateUserHandler,
    pub delete_user: DeleteUserHandler,

    pub get_user: GetUserQueryHandler,
    pub list_users: ListUsersQueryHandler,
}

impl UserServices {
    pub fn new(
        store: SharedUserStore, cache: SharedCache, ttl: Duration,
        keys: JwtKeys,
    ) -> Self {
        let gateway = QueryGateway::new(store.clone(), UserListCacheKey, cache)
            .with_ttl(ttl);
        Self {
            register_user: RegisterUserHandler::new(gateway.clone()),
            login: LoginHandler::new(store, keys),
            update_user: UpdateUserHandler::new(gateway.clone()),
            delete_user: DeleteUserHandler::new(gateway.clone()),
            get_user: GetUserQueryHandler::new(gateway.clone()),
            list_users: ListUsersQueryHandler::new(gateway),
        }
    }
}

pub struct UserHandlers;

impl UserHandlers {
    /// Routes mounted under `/users`. `/me` sits behind the bearer check.
    pub fn routes(keys: JwtKeys) -> Router<UserServices> {
        let protected = Router::new()
            .route("/me", get(current_user))
            .route_layer(from_fn_with_state(keys, require_bearer));

        Router::new()
            .route("/", get(list_users))
            .route("/register", post(register))
            .route("/login", post(login))
            .route("/{id}", get(get_user).put(update_user).delete(delete_user))
            .merge(protected)
    }

    /// Root-level aliases for register and login.
    pub fn auth_routes() -> Router<UserServices> {
        Router::new()
            .route("/register", post(register))
            .route("/login", post(login))
    }
}

#[utoipa::path(
    post,
    path = "/users/register",
    request_body = RegisterUserCommand,
    responses(
        (status = 201, description = "User registered successfully", body = RegisterResponse),
        (status = 400, description = "Missing fields or email already in use", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "users"
)]
#[instrument(skip_all)]
pub async fn register(
    State(services): State<UserServices>,
    payload: Result<Json<RegisterUserCommand>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let Json(command) = payload?;
    let user = services.register_user.execute(command).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user,
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/users/login",
    request_body = LoginCommand,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing fields", body = common_errors::ApiErrorResponse),
        (status = 401, description = "Invalid email or password", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "users"
)]
#[instrument(skip_all)]
pub async fn login(
    State(services): State<UserServices>,
    payload: Result<Json<LoginCommand>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(command) = payload?;
    let token = services.login.execute(command).await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
    }))
}

#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Profile of the token holder", body = UserResponse),
        (status = 401, description = "Missing bearer token", body = common_errors::ApiErrorResponse),
        (status = 403, description = "Invalid or expired token", body = common_errors::ApiErrorResponse),
        (status = 404, description = "User no longer exists", body = common_errors::ApiErrorResponse)
    ),
    security(("bearer" = [])),
    tag = "users"
)]
#[instrument(skip_all)]
pub async fn current_user(
    State(services): State<UserServices>, Extension(claims): Extension<Claims>,
) -> Result<Json<UserResponse>, AppError> {
    let user = services
        .get_user
        .execute(GetUserQuery {
            user_id: claims.sub,
        })
        .await?;
    Ok(Json(user))
}

#[utoipa::path(
    get,
    path = "/users",
    params(ListUsersQuery),
    responses(
        (status = 200, description = "Users matching the filters", body = Vec<UserResponse>),
        (status = 400, description = "Invalid query string", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "users"
)]
#[instrument(skip_all)]
pub async fn list_users(
    State(services): State<UserServices>,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let Query(query) = query?;
    let users = services.list_users.execute(query).await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "users"
)]
#[instrument(skip_all)]
pub async fn get_user(
    State(services): State<UserServices>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<UserResponse>, AppError> {
    let Path(id) = path?;
    let user = services
        .get_user
        .execute(GetUserQuery { user_id: id })
        .await?;
    Ok(Json(user))
}

#[utoipa::path(
    put,
    path = "/users/{id}",
    request_body = UpdateUserCommand,
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User updated successfully", body = UserResponse),
        (status = 400, description = "Invalid request data", body = common_errors::ApiErrorResponse),
        (status = 404, description = "User not found", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "users"
)]
#[instrument(skip_all)]
pub async fn update_user(
    State(services): State<UserServices>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateUserCommand>, JsonRejection>,
) -> Result<Json<UserResponse>, AppError> {
    let Path(id) = path?;
    let Json(mut command) = payload?;
    command.user_id = id;
    let result = services.update_user.execute(command).await?;

    info!("User updated: {}", result.id);

    Ok(Json(result))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted successfully"),
        (status = 404, description = "User not found", body = common_errors::ApiErrorResponse),
        (status = 500, description = "Internal server error", body = common_errors::ApiErrorResponse)
    ),
    tag = "users"
)]
#[instrument(skip_all)]
pub async fn delete_user(
    State(services): State<UserServices>,
    path: Result<Path<String>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = path?;
    services
        .delete_user
        .execute(DeleteUserCommand { user_id: id })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use serde_json::{Value, json};
    use test_utils::{InMemoryDao, memory_cache};
    use tower::ServiceExt;
    use user_models::User;

    use super::*;

    fn keys() -> JwtKeys {
        JwtKeys::new("test-secret", Duration::from_secs(3600))
    }

    fn app(dao: &Arc<InMemoryDao<User>>) -> Router {
        let store: SharedUserStore = dao.clone();
        let services = UserServices::new(
            store,
            memory_cache(),
            Duration::from_secs(60),
            keys(),
        );
        Router::new()
            .nest("/users", UserHandlers::routes(keys()))
            .merge(UserHandlers::auth_routes())
            .with_state(services)
    }

    async fn send(
        app: &Router, method: &str, uri: &str, body: Option<Value>,
        bearer: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = bearer {
            builder =
                builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
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

    fn credentials() -> Value {
        json!({"name": "Ferris", "email": "ferris@example.com", "password": "hunter2"})
    }

    #[tokio::test]
    async fn test_register_then_duplicate() {
        let dao = InMemoryDao::<User>::new_shared();
        let app = app(&dao);

        let (status, body) =
            send(&app, "POST", "/users/register", Some(credentials()), None)
                .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "User registered successfully");
        assert_eq!(body["user"]["email"], "ferris@example.com");
        assert!(body["user"].get("password_hash").is_none());

        let (status, body) =
            send(&app, "POST", "/register", Some(credentials()), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "EMAIL_IN_USE");
        assert_eq!(dao.len().await, 1);
    }

    #[tokio::test]
    async fn test_register_missing_fields() {
        let dao = InMemoryDao::<User>::new_shared();
        let app = app(&dao);

        let (status, _) = send(
            &app,
            "POST",
            "/users/register",
            Some(json!({"email": "ferris@example.com"})),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(dao.is_empty().await);
    }

    #[tokio::test]
    async fn test_login_and_me() {
        let dao = InMemoryDao::<User>::new_shared();
        let app = app(&dao);
        send(&app, "POST", "/users/register", Some(credentials()), None).await;

        let (status, body) = send(
            &app,
            "POST",
            "/login",
            Some(json!({"email": "ferris@example.com", "password": "hunter2"})),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Login successful");
        let token = body["token"].as_str().unwrap().to_string();

        let (status, me) =
            send(&app, "GET", "/users/me", None, Some(&token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["email"], "ferris@example.com");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let dao = InMemoryDao::<User>::new_shared();
        let app = app(&dao);
        send(&app, "POST", "/users/register", Some(credentials()), None).await;

        let (status, body) = send(
            &app,
            "POST",
            "/users/login",
            Some(json!({"email": "ferris@example.com", "password": "nope"})),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
        assert!(body.get("token").is_none());
    }

    #[tokio::test]
    async fn test_me_requires_valid_bearer() {
        let dao = InMemoryDao::<User>::new_shared();
        let app = app(&dao);
        let foreign = JwtKeys::new("other-secret", Duration::from_secs(3600))
            .issue("someone", "someone@example.com")
            .unwrap();

        let (missing, body) = send(&app, "GET", "/users/me", None, None).await;
        let (tampered, _) =
            send(&app, "GET", "/users/me", None, Some(&foreign)).await;

        assert_eq!(missing, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "MISSING_TOKEN");
        assert_eq!(tampered, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_list_filters_and_update() {
        let dao = InMemoryDao::<User>::new_shared();
        let app = app(&dao);
        let (_, registered) =
            send(&app, "POST", "/users/register", Some(credentials()), None)
                .await;
        send(
            &app,
            "POST",
            "/users/register",
            Some(json!({"email": "crab@example.org", "password": "pw"})),
            None,
        )
        .await;
        let uri = format!("/users/{}", registered["user"]["id"].as_str().unwrap());

        let (_, by_domain) =
            send(&app, "GET", "/users?email=example.org", None, None).await;
        let (_, all_before) = send(&app, "GET", "/users", None, None).await;
        let (status, updated) =
            send(&app, "PUT", &uri, Some(json!({"name": "Ferris II"})), None)
                .await;
        let (_, all_after) = send(&app, "GET", "/users", None, None).await;

        assert_eq!(by_domain.as_array().unwrap().len(), 1);
        assert_eq!(by_domain[0]["email"], "crab@example.org");
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["name"], "Ferris II");
        assert_eq!(all_before[0]["name"], "Ferris");
        assert_eq!(all_after[0]["name"], "Ferris II");
    }

    #[tokio::test]
    async fn test_delete_unknown_user() {
        let dao = InMemoryDao::<User>::new_shared();
        let app = app(&dao);

        let (status, body) = send(
            &app,
            "DELETE",
            "/users/0190a6d8-0000-7000-8000-000000000000",
            None,
            None,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "USER_NOT_FOUND");
    }
}
