use thiserror::Error;
use uuid::Uuid;

/// Errors raised by repository implementations
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Team {id} was modified concurrently")]
    Conflict { id: Uuid },

    #[error("Stored data is invalid: {0}")]
    Corrupt(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
