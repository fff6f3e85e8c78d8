use auth::{JwtKeys, hash_password, verify_password};
use cache_aside::QueryGateway;
use dao_utils::error_handling::parse_id;
use tracing::{info, instrument};
use user_cache_keys::UserListCacheKey;
use user_commands::{
    DeleteUserCommand, LoginCommand, RegisterUserCommand, UpdateUserCommand,
};
use user_dao::{SharedUserStore, UserStore};
use user_errors::UserError;
use user_models::{NewUser, UserUpdate};
use user_responses::UserResponse;
use uuid::Uuid;

pub type UserGateway = QueryGateway<SharedUserStore, UserListCacheKey>;

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse(user_id: String) -> Result<Uuid, UserError> {
    parse_id(&user_id).ok_or(UserError::NotFound { user_id })
}

#[derive(Clone)]
pub struct RegisterUserHandler {
    gateway: UserGateway,
}

impl RegisterUserHandler {
    pub fn new(gateway: UserGateway) -> Self { Self { gateway } }

    #[instrument(skip_all)]
    pub async fn execute(
        &self, command: RegisterUserCommand,
    ) -> Result<UserResponse, UserError> {
        let (Some(email), Some(password)) =
            (non_blank(command.email), non_blank(command.password))
        else {
            return Err(UserError::Validation(
                "email and password are required".into(),
            ));
        };
        if !email.contains('@') {
            return Err(UserError::Validation("email is not valid".into()));
        }

        if self.gateway.dao().find_by_email(&email).await?.is_some() {
            return Err(UserError::EmailInUse);
        }

        let password_hash = hash_password(&password)
            .map_err(|e| UserError::InternalError(e.to_string()))?;

        let user = self
            .gateway
            .create(NewUser {
                name: non_blank(command.name),
                email,
                password_hash,
            })
            .await?;

        info!(user.id = %user.id, "User registered");

        Ok(user)
    }
}

#[derive(Clone)]
pub struct LoginHandler {
    store: SharedUserStore,
    keys: JwtKeys,
}

impl LoginHandler {
    pub fn new(store: SharedUserStore, keys: JwtKeys) -> Self {
        Self { store, keys }
    }

    /// Returns a signed token. Unknown email and wrong password fail the
    /// same way.
    #[instrument(skip_all)]
    pub async fn execute(
        &self, command: LoginCommand,
    ) -> Result<String, UserError> {
        let (Some(email), Some(password)) =
            (non_blank(command.email), non_blank(command.password))
        else {
            return Err(UserError::Validation(
                "email and password are required".into(),
            ));
        };

        let user = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        let matches = verify_password(&password, &user.password_hash)
            .map_err(|e| UserError::InternalError(e.to_string()))?;
        if !matches {
            return Err(UserError::InvalidCredentials);
        }

        self.keys
            .issue(&user.id.to_string(), &user.email)
            .map_err(|e| UserError::InternalError(e.to_string()))
    }
}

#[derive(Clone)]
pub struct UpdateUserHandler {
    gateway: UserGateway,
}

impl UpdateUserHandler {
    pub fn new(gateway: UserGateway) -> Self { Self { gateway } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, command: UpdateUserCommand,
    ) -> Result<UserResponse, UserError> {
        let name = non_blank(command.name)
            .ok_or_else(|| UserError::Validation("name is required".into()))?;
        let id = parse(command.user_id)?;

        self.gateway.update(id, UserUpdate { name }).await
    }
}

#[derive(Clone)]
pub struct DeleteUserHandler {
    gateway: UserGateway,
}

impl DeleteUserHandler {
    pub fn new(gateway: UserGateway) -> Self { Self { gateway } }

    #[instrument(skip(self))]
    pub async fn execute(
        &self, command: DeleteUserCommand,
    ) -> Result<(), UserError> {
        let id = parse(command.user_id)?;
        self.gateway.delete(id).await
    }
}
