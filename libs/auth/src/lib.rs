//! Password hashing, token issuance and the bearer-token middleware used by
//! the user service.

pub mod jwt;
pub mod middleware;
pub mod password;

use common_errors::AppError;
use thiserror::Error;

pub use jwt::{Claims, JwtKeys};
pub use middleware::require_bearer;
pub use password::{hash_password, verify_password};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing or malformed Authorization header")]
    MissingCredentials,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Failed to create token: {0}")]
    TokenCreation(String),
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => {
                AppError::unauthorized("MISSING_TOKEN", &err.to_string())
            }
            AuthError::InvalidToken => {
                AppError::forbidden("INVALID_TOKEN", &err.to_string())
            }
            AuthError::TokenCreation(_) | AuthError::Hashing(_) => {
                AppError::internal_server_error(&err.to_string())
            }
        }
    }
}
