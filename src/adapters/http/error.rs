//! Mapping of application errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::ClassroomError;

/// Error body returned by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

/// Wraps `ClassroomError` so handlers can return it with `?`.
#[derive(Debug)]
pub struct ApiError(pub ClassroomError);

impl From<ClassroomError> for ApiError {
    fn from(error: ClassroomError) -> Self {
        Self(error)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ClassroomError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            ClassroomError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            ClassroomError::NotFound { .. } => StatusCode::NOT_FOUND,
            ClassroomError::InvalidTransition(_)
            | ClassroomError::CapacityExceeded { .. }
            | ClassroomError::DuplicateResponse => StatusCode::CONFLICT,
            ClassroomError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self.0 {
            ClassroomError::Infrastructure(detail) => {
                tracing::error!(error = %detail, "request failed");
                "Internal server error".to_string()
            }
            other => other.message(),
        };

        let body = ErrorResponse {
            code: self.0.code().to_string(),
            message,
        };
        (status, Json(body)).into_response()
    }
}

/// Parses a path segment into an id, answering 400 on malformed input.
pub fn parse_id<T: std::str::FromStr>(raw: &str, field: &str) -> Result<T, ApiError> {
    raw.parse::<T>()
        .map_err(|_| ApiError(ClassroomError::validation(field, format!("Invalid {}", field))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;

    fn status_of(error: ClassroomError) -> StatusCode {
        ApiError(error).into_response().status()
    }

    #[test]
    fn error_kinds_map_to_status_codes() {
        assert_eq!(status_of(ClassroomError::validation("title", "empty")), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(ClassroomError::permission_denied("no")), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(ClassroomError::not_found("Session", SessionId::new())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status_of(ClassroomError::invalid_transition("ended")), StatusCode::CONFLICT);
        assert_eq!(status_of(ClassroomError::CapacityExceeded { max: 3 }), StatusCode::CONFLICT);
        assert_eq!(status_of(ClassroomError::DuplicateResponse), StatusCode::CONFLICT);
        assert_eq!(
            status_of(ClassroomError::infrastructure("pool timed out")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn infrastructure_detail_is_not_leaked() {
        let response = ApiError(ClassroomError::infrastructure("password=hunter2")).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ErrorResponse = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body.message, "Internal server error");
    }

    #[test]
    fn malformed_id_is_a_validation_error() {
        let result: Result<SessionId, _> = parse_id("not-a-uuid", "session_id");
        assert_eq!(result.unwrap_err().status(), StatusCode::BAD_REQUEST);
    }
}
