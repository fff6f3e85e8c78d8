use tokio_postgres::error::SqlState;
use uuid::Uuid;

/// True when the statement was rejected by a unique constraint.
pub fn is_unique_violation(err: &tokio_postgres::Error) -> bool {
    err.code() == Some(&SqlState::UNIQUE_VIOLATION)
}

/// Path identifiers arrive as strings; anything that is not a UUID cannot
/// name a stored record.
pub fn parse_id(raw: &str) -> Option<Uuid> { Uuid::parse_str(raw).ok() }
