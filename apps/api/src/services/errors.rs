use thiserror::Error;
use uuid::Uuid;

use crate::domain::repositories::RepositoryError;

/// Errors returned by the team engine
///
/// Expected rejections (full destination, unknown student in a transfer) are
/// not errors; those operations return `Ok(false)`.
#[derive(Debug, Error)]
pub enum TeamError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl TeamError {
    pub fn team_not_found(id: Uuid) -> Self {
        TeamError::NotFound { entity: "Team", id }
    }

    pub fn student_not_found(id: Uuid) -> Self {
        TeamError::NotFound {
            entity: "Student",
            id,
        }
    }
}

pub type TeamResult<T> = Result<T, TeamError>;
