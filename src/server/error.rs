//! API error responses

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::presign::ErrorBody;

/// Errors returned by endpoints, rendered as `{"error": ...}`
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    /// Carries the allowed method for the `Allow` header
    MethodNotAllowed(&'static str),
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) | ApiError::Internal(msg) => msg,
            ApiError::MethodNotAllowed(_) => "Method not allowed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorBody {
            error: self.message().to_string(),
        });

        match status {
            StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("API error: {} - {}", status, body.error)
            }
            _ => tracing::debug!("API error: {} - {}", status, body.error),
        }

        match self {
            ApiError::MethodNotAllowed(allow) => {
                (status, [(header::ALLOW, allow)], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}
