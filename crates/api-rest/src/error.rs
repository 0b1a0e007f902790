//! JSON error responses.
//!
//! Every failure leaves the API as `{"success": false, "message": "..."}`. Core errors, JSON
//! body rejections and path parameter rejections all convert into [`ApiError`].

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lab_core::LabError;
use serde::Serialize;
use utoipa::ToSchema;

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// Server-side failure; the message is returned to the client as is.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<LabError> for ApiError {
    fn from(err: LabError) -> Self {
        match err {
            LabError::InvalidInput(msg) => ApiError::BadRequest(msg),
            LabError::Id(e) => ApiError::BadRequest(e.to_string()),
            LabError::NotFound(msg) => ApiError::NotFound(msg),
            LabError::Conflict(msg) => ApiError::Conflict(msg),
            LabError::InvalidCredentials => {
                ApiError::BadRequest("Invalid username or password".into())
            }
            LabError::Transaction(e) => {
                tracing::error!("report write rolled back: {e}");
                ApiError::Internal(e.to_string())
            }
            other => {
                tracing::error!("request failed: {other}");
                ApiError::Internal("Server error".into())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lab_errors_map_to_status_codes() {
        let cases = [
            (LabError::InvalidInput("x".into()), StatusCode::BAD_REQUEST),
            (LabError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (LabError::Conflict("x".into()), StatusCode::CONFLICT),
            (LabError::InvalidCredentials, StatusCode::BAD_REQUEST),
            (
                LabError::InvalidConfig("x".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_server_errors_hide_details() {
        let err = ApiError::from(LabError::InvalidConfig("pool misconfigured".into()));
        assert_eq!(err.to_string(), "Server error");
    }
}
