use common_errors::AppError;
use sql_connection::{PgError, PoolError as DbPoolError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParticipantError {
    #[error("Participant not found: {participant_id}")]
    NotFound { participant_id: String },
    #[error("{0}")]
    Validation(String),
    #[error("Database error: {0}")]
    Database(#[from] PgError),
    #[error("Database Pool error: {0}")]
    DatabasePool(#[from] DbPoolError),
}

impl From<ParticipantError> for AppError {
    fn from(err: ParticipantError) -> Self {
        match err {
            ParticipantError::NotFound { participant_id } => {
                AppError::not_found(
                    "PARTICIPANT_NOT_FOUND",
                    &format!("Participant with ID {participant_id} not found"),
                )
            }
            ParticipantError::Validation(msg) => AppError::validation(&msg),
            ParticipantError::Database(db_err) => {
                AppError::internal_server_error(&format!(
                    "Database error: {db_err}"
                ))
            }
            ParticipantError::DatabasePool(pool_err) => {
                AppError::internal_server_error(&format!(
                    "Database connection error: {pool_err}"
                ))
            }
        }
    }
}
