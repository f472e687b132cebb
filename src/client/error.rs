//! Error types for Bento client operations

use compact_str::CompactString;
use thiserror::Error;

/// Classification of a non-success (or undecodable) API response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    RateLimited,
    ServerError,
    ServiceUnavailable,
    UnexpectedStatus,
    /// Success status, but the body did not match the expected shape
    InvalidBody,
}

impl ApiErrorKind {
    /// Map an HTTP status code onto its error kind
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ApiErrorKind::BadRequest,
            401 => ApiErrorKind::Unauthorized,
            403 => ApiErrorKind::Forbidden,
            404 => ApiErrorKind::NotFound,
            429 => ApiErrorKind::RateLimited,
            500 => ApiErrorKind::ServerError,
            503 => ApiErrorKind::ServiceUnavailable,
            _ => ApiErrorKind::UnexpectedStatus,
        }
    }
}

impl std::fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ApiErrorKind::BadRequest => "bad request",
            ApiErrorKind::Unauthorized => "unauthorized",
            ApiErrorKind::Forbidden => "forbidden",
            ApiErrorKind::NotFound => "not found",
            ApiErrorKind::RateLimited => "rate limited",
            ApiErrorKind::ServerError => "server error",
            ApiErrorKind::ServiceUnavailable => "service unavailable",
            ApiErrorKind::UnexpectedStatus => "unexpected status",
            ApiErrorKind::InvalidBody => "invalid response body",
        };
        f.write_str(s)
    }
}

/// Structured error types for Bento client operations
#[derive(Debug, Error)]
pub enum BentoError {
    /// Missing, blank or malformed client configuration
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfiguration { field: CompactString, message: String },

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid content: {0}")]
    InvalidContent(String),

    #[error("Invalid segment ID: {0}")]
    InvalidSegmentId(String),

    #[error("Invalid batch size: {0}")]
    InvalidBatchSize(String),

    #[error("Invalid tags: {0}")]
    InvalidTags(String),

    /// Generic missing field or unrecognized enum value
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Bento answered with a non-success status, or a body we could not decode
    #[error("Unexpected API response (HTTP {status}, {kind}): {message}")]
    ApiResponse {
        status: u16,
        kind: ApiErrorKind,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The request succeeded but some batch items were rejected
    #[error("Batch partially failed: {results} succeeded, {failed} failed")]
    PartialBatchFailure { results: u64, failed: u64 },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Deadline exceeded")]
    DeadlineExceeded,

    /// HTTP transport failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failure raised by a custom transport
    #[error("{0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl BentoError {
    /// Create a configuration error for a specific field
    pub fn config(field: impl Into<CompactString>, message: impl Into<String>) -> Self {
        Self::InvalidConfiguration { field: field.into(), message: message.into() }
    }

    /// Create an API error from a non-success status
    pub fn api_status(status: u16, message: impl Into<String>) -> Self {
        Self::ApiResponse {
            status,
            kind: ApiErrorKind::from_status(status),
            message: message.into(),
            source: None,
        }
    }

    /// Create an API error for a body that failed to decode
    pub fn invalid_body(
        status: u16,
        endpoint: impl std::fmt::Display,
        source: serde_json::Error,
    ) -> Self {
        Self::ApiResponse {
            status,
            kind: ApiErrorKind::InvalidBody,
            message: format!("failed to parse response from {endpoint}"),
            source: Some(source),
        }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    /// Wrap an arbitrary transport failure
    pub fn transport(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Transport(error.into())
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            BentoError::ApiResponse { status, .. } => Some(*status),
            BentoError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// API error kind, if this is an API response error
    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        match self {
            BentoError::ApiResponse { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// True for errors raised by local input validation, before any network call
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BentoError::InvalidConfiguration { .. }
                | BentoError::InvalidEmail(_)
                | BentoError::InvalidIpAddress(_)
                | BentoError::InvalidName(_)
                | BentoError::InvalidContent(_)
                | BentoError::InvalidSegmentId(_)
                | BentoError::InvalidBatchSize(_)
                | BentoError::InvalidTags(_)
                | BentoError::InvalidRequest(_)
        )
    }

    /// True if the caller's context cancelled the operation or its deadline passed
    pub fn is_cancellation(&self) -> bool {
        matches!(self, BentoError::Cancelled | BentoError::DeadlineExceeded)
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, BentoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(ApiErrorKind::from_status(400), ApiErrorKind::BadRequest);
        assert_eq!(ApiErrorKind::from_status(401), ApiErrorKind::Unauthorized);
        assert_eq!(ApiErrorKind::from_status(403), ApiErrorKind::Forbidden);
        assert_eq!(ApiErrorKind::from_status(404), ApiErrorKind::NotFound);
        assert_eq!(ApiErrorKind::from_status(429), ApiErrorKind::RateLimited);
        assert_eq!(ApiErrorKind::from_status(500), ApiErrorKind::ServerError);
        assert_eq!(ApiErrorKind::from_status(503), ApiErrorKind::ServiceUnavailable);
        assert_eq!(ApiErrorKind::from_status(418), ApiErrorKind::UnexpectedStatus);
    }

    #[test]
    fn test_api_status_error() {
        let err = BentoError::api_status(429, "slow down");
        assert_eq!(err.status(), Some(429));
        assert_eq!(err.api_kind(), Some(ApiErrorKind::RateLimited));
        assert_eq!(
            err.to_string(),
            "Unexpected API response (HTTP 429, rate limited): slow down"
        );
    }

    #[test]
    fn test_config_error() {
        let err = BentoError::config("secret_key", "cannot be empty");
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Invalid configuration for secret_key: cannot be empty");
    }

    #[test]
    fn test_cancellation_errors() {
        assert!(BentoError::Cancelled.is_cancellation());
        assert!(BentoError::DeadlineExceeded.is_cancellation());
        assert!(!BentoError::Cancelled.is_validation());
        assert!(!BentoError::InvalidEmail("x".into()).is_cancellation());
    }

    #[test]
    fn test_partial_batch_message() {
        let err = BentoError::PartialBatchFailure { results: 1, failed: 1 };
        assert_eq!(err.to_string(), "Batch partially failed: 1 succeeded, 1 failed");
        assert_eq!(err.status(), None);
    }
}
