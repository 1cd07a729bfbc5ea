use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::repositories::RepositoryError;
use crate::services::TeamError;

/// API error type with HTTP status code and message
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a 409 Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<TeamError> for ApiError {
    fn from(error: TeamError) -> Self {
        let message = error.to_string();
        match error {
            TeamError::NotFound { .. } => Self::not_found(message),
            TeamError::InvalidArgument(_) => Self::bad_request(message),
            TeamError::Repository(RepositoryError::Conflict { .. }) => Self::conflict(message),
            TeamError::Repository(e) => {
                tracing::error!(error = %e, "Storage failure");
                Self::internal_server_error(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn engine_errors_map_to_status_codes() {
        let id = Uuid::new_v4();

        assert_eq!(
            ApiError::from(TeamError::team_not_found(id)).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(TeamError::InvalidArgument("bad".into())).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(TeamError::Repository(RepositoryError::Conflict { id })).status,
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(TeamError::Repository(RepositoryError::Database(
                "down".into()
            )))
            .status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
