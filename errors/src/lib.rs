//! # Mindnote Errors
//!
//! Typed failure taxonomy shared by every Mindnote crate.
//!
//! Three kinds of failure exist and each maps to a distinct outcome:
//! - [`ValidationError`]: the caller's input breaks a stated invariant
//!   (client-error status, no external call made)
//! - [`UpstreamError`]: an external model call failed or returned an
//!   unusable result (server-error status)
//! - [`ConfigurationError`]: a required dependency or credential is not
//!   available at startup (the process refuses to serve)

use serde::Serialize;
use thiserror::Error;

/// Client-supplied input violates a stated contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Text cannot be empty")]
    EmptyText,

    #[error("Malformed request body: {reason}")]
    MalformedBody { reason: String },
}

/// An external model or service call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    #[error("Transport error calling {service}: {reason}")]
    Transport { service: String, reason: String },

    #[error("Call to {service} timed out after {timeout_ms}ms")]
    Timeout { service: String, timeout_ms: u64 },

    #[error("{service} rejected the request (status {status:?}): {reason}")]
    Rejected {
        service: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("{service} is temporarily unavailable (status {status:?}): {reason}")]
    Unavailable {
        service: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("Malformed response from {service}: {reason}")]
    MalformedResponse { service: String, reason: String },

    #[error("{service} returned an empty result")]
    EmptyResult { service: String },
}

impl UpstreamError {
    /// Name of the external service that failed.
    pub fn service(&self) -> &str {
        match self {
            Self::Transport { service, .. }
            | Self::Timeout { service, .. }
            | Self::Rejected { service, .. }
            | Self::Unavailable { service, .. }
            | Self::MalformedResponse { service, .. }
            | Self::EmptyResult { service } => service,
        }
    }

    /// Whether another attempt could plausibly succeed.
    ///
    /// Transport failures, timeouts and temporary unavailability are
    /// retryable. Rejections (bad credentials, invalid request) and unusable
    /// payloads are not: repeating them yields the same answer.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout { .. } | Self::Unavailable { .. }
        )
    }

    /// Stable code exposed to clients in place of the raw error text.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "UPSTREAM_TIMEOUT",
            _ => "UPSTREAM_ERROR",
        }
    }
}

/// A required external dependency could not be set up at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Missing required credential: {name}")]
    MissingCredential { name: String },

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Configuration file {path} could not be loaded: {reason}")]
    File { path: String, reason: String },

    #[error("Dependency {dependency} could not be initialized: {reason}")]
    DependencyUnavailable { dependency: String, reason: String },
}

/// Category of a [`ServiceError`], used for metrics labels and log fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Upstream,
    Configuration,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Upstream => "upstream",
            Self::Configuration => "configuration",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any failure raised while serving a request or starting the service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Upstream(_) => ErrorKind::Upstream,
            Self::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// Emits the error through `tracing` at a level matching its kind.
    pub fn log(&self, operation: &str) {
        match self {
            Self::Validation(e) => {
                tracing::debug!(operation, kind = %self.kind(), error = %e, "Request rejected");
            }
            Self::Upstream(e) => {
                tracing::error!(
                    operation,
                    kind = %self.kind(),
                    service = e.service(),
                    error = %e,
                    "Upstream call failed"
                );
            }
            Self::Configuration(e) => {
                tracing::error!(operation, kind = %self.kind(), error = %e, "Configuration error");
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_message() {
        assert_eq!(ValidationError::EmptyText.to_string(), "Text cannot be empty");
    }

    #[test]
    fn test_retryable_classification() {
        let transport = UpstreamError::Transport {
            service: "classifier".to_string(),
            reason: "connection reset".to_string(),
        };
        let unavailable = UpstreamError::Unavailable {
            service: "classifier".to_string(),
            status: Some(503),
            reason: "model loading".to_string(),
        };
        let rejected = UpstreamError::Rejected {
            service: "completion".to_string(),
            status: Some(401),
            reason: "invalid api key".to_string(),
        };
        let empty = UpstreamError::EmptyResult {
            service: "completion".to_string(),
        };

        assert!(transport.is_retryable());
        assert!(unavailable.is_retryable());
        assert!(!rejected.is_retryable());
        assert!(!empty.is_retryable());
    }

    #[test]
    fn test_upstream_codes() {
        let timeout = UpstreamError::Timeout {
            service: "completion".to_string(),
            timeout_ms: 500,
        };
        assert_eq!(timeout.code(), "UPSTREAM_TIMEOUT");
        assert_eq!(timeout.service(), "completion");
        assert_eq!(
            timeout.to_string(),
            "Call to completion timed out after 500ms"
        );

        let malformed = UpstreamError::MalformedResponse {
            service: "classifier".to_string(),
            reason: "missing label".to_string(),
        };
        assert_eq!(malformed.code(), "UPSTREAM_ERROR");
    }

    #[test]
    fn test_service_error_kind() {
        let err: ServiceError = ValidationError::EmptyText.into();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err: ServiceError = UpstreamError::EmptyResult {
            service: "completion".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Upstream);

        let err: ServiceError = ConfigurationError::MissingCredential {
            name: "OPENAI_API_KEY".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), "Missing required credential: OPENAI_API_KEY");
    }

    #[test]
    fn test_error_kind_serialization() {
        let json = serde_json::to_string(&ErrorKind::Upstream).unwrap();
        assert_eq!(json, "\"upstream\"");
    }
}
