use common_errors::AppError;
use sql_connection::{PgError, PoolError as DbPoolError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found: {user_id}")]
    NotFound { user_id: String },
    #[error("{0}")]
    Validation(String),
    #[error("Email already in use")]
    EmailInUse,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Database error: {0}")]
    Database(#[from] PgError),
    #[error("Database Pool error: {0}")]
    DatabasePool(#[from] DbPoolError),
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound { user_id } => {
                AppError::not_found(
                    "USER_NOT_FOUND",
                    &format!("User with ID {user_id} not found"),
                )
            }
            UserError::Validation(msg) => AppError::validation(&msg),
            UserError::EmailInUse => {
                AppError::bad_request("EMAIL_IN_USE", "Email already in use")
            }
            UserError::InvalidCredentials => {
                AppError::unauthorized(
                    "INVALID_CREDENTIALS",
                    "Invalid email or password",
                )
            }
            UserError::Database(db_err) => {
                AppError::internal_server_error(&format!(
                    "Database error: {db_err}"
                ))
            }
            UserError::DatabasePool(pool_err) => {
                AppError::internal_server_error(&format!(
                    "Database connection error: {pool_err}"
                ))
            }
            UserError::InternalError(msg) => {
                AppError::internal_server_error(&format!(
                    "Internal error: {msg}"
                ))
            }
        }
    }
}
