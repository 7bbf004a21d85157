//! HTTP mapping for service failures.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use errors::{ConfigurationError, ServiceError, UpstreamError, ValidationError};
use serde::Serialize;
use thiserror::Error;

/// Message returned in place of any upstream failure detail.
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Upstream service failed";

/// Failures that stop the server before or while it listens.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Server error: {0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, ServerError>;

/// Error response body for HTTP endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// A [`ServiceError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        Self(err.into())
    }
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match &self.0 {
            ServiceError::Validation(e @ ValidationError::EmptyText) => {
                (StatusCode::BAD_REQUEST, "EMPTY_TEXT", e.to_string())
            }
            ServiceError::Validation(e @ ValidationError::MalformedBody { .. }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "MALFORMED_BODY",
                e.to_string(),
            ),
            ServiceError::Upstream(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                e.code(),
                UPSTREAM_FAILURE_MESSAGE.to_string(),
            ),
            ServiceError::Configuration(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIGURATION_ERROR",
                "Service is not configured correctly".to_string(),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let body = ErrorResponse {
            error: message,
            code: code.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
