//! Error types for the zone translation layer
//!
//! This module defines all error types used throughout the workspace.

use std::fmt;
use thiserror::Error;

/// Result type alias for zonesync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Message used when a zone is absent and zone creation is disabled
pub const UNKNOWN_DOMAIN_MESSAGE: &str =
    "This zone does not exist, set create_zone to true to allow creation of a new zone";

/// Closed set of API failure kinds derived from an HTTP status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 400
    BadRequest,
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// Any other non-2xx status
    Other,
}

impl ApiErrorKind {
    /// Map an HTTP status code to its error kind
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::BadRequest => "Bad request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not found",
            Self::Other => "Request failed",
        };
        f.write_str(label)
    }
}

/// Core error type for zonesync
#[derive(Error, Debug)]
pub enum Error {
    /// Non-2xx response from the provider API
    #[error("{kind} (status {status}): {message}")]
    Api {
        /// Error kind derived from the status
        kind: ApiErrorKind,
        /// Raw HTTP status code
        status: u16,
        /// Response body or a short description
        message: String,
    },

    /// The zone does not exist on the provider side
    #[error("Unknown domain: {0}")]
    UnknownDomain(String),

    /// Dynamic record classification or shape violation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Transport failure before any status was obtained
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build an API error from a response status and body
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            kind: ApiErrorKind::from_status(status),
            status,
            message: message.into(),
        }
    }

    /// Create an unknown domain error with the standard message
    pub fn unknown_domain() -> Self {
        Self::UnknownDomain(UNKNOWN_DOMAIN_MESSAGE.to_string())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an HTTP transport error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// The API error kind, if this error came from a status code
    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        match self {
            Self::Api { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// The HTTP status code, if this error came from a response
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for 403 responses
    pub fn is_forbidden(&self) -> bool {
        self.api_kind() == Some(ApiErrorKind::Forbidden)
    }

    /// True for 404 responses
    pub fn is_not_found(&self) -> bool {
        self.api_kind() == Some(ApiErrorKind::NotFound)
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
