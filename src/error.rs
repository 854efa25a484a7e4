// src/error.rs
//! Application error types.
//!
//! The variants map one-to-one onto the failure modes of the run: bad
//! credentials, transport failures, unexpected API responses, selector
//! misses, and webhook rejections. Per-tracking-code failures never surface
//! here — the tracker degrades them to `PackageStatus::Unknown` instead.

use std::fmt;
use thiserror::Error;

/// Delivery API error codes as a typed vocabulary.
///
/// The API reports failures as `{ "error": { "code": ..., "message": ... } }`;
/// parsing the code into an enum keeps recovery decisions out of
/// stringly-typed dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryErrorCode {
    /// Credentials rejected or token expired
    InvalidCredentials,
    /// The requested resource does not exist
    NotFound,
    /// Request parameters failed the API's validation
    ValidationFailed,
    /// Delivery API internal server error
    InternalError,
    /// Delivery API temporarily unavailable
    ServiceUnavailable,
    /// HTTP status fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl DeliveryErrorCode {
    /// Parse an API error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "invalid_credentials" | "unauthorized" => Self::InvalidCredentials,
            "not_found" => Self::NotFound,
            "validation_error" => Self::ValidationFailed,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    /// Whether this code means the credentials were rejected.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::InvalidCredentials | Self::HttpStatus(401 | 403))
    }
}

impl fmt::Display for DeliveryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid_credentials"),
            Self::NotFound => write!(f, "not_found"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Delivery API rejected credentials: {0}")]
    Auth(String),

    #[error("Network failure: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Delivery API returned an error ({code}): {message}")]
    ApiService {
        code: DeliveryErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("No status matched selector '{selector}' on the page for {tracking_code}")]
    TrackingParse {
        tracking_code: String,
        selector: String,
    },

    #[error("Webhook delivery failed: {0}")]
    Notify(String),

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Result type alias for convenience
#[allow(dead_code)]
pub type Result<T, E = AppError> = std::result::Result<T, E>;
