//! Error type for backend API calls.

use reqwest::StatusCode;
use thiserror::Error;

use crate::resilience::NotFound;

/// Errors that can occur while talking to the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, reset, timeout).
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("Request failed ({status})")]
    Status { status: u16, details: String },

    /// A 2xx response whose body is not valid JSON for the expected type.
    #[error("Invalid JSON response")]
    InvalidJson { status: u16, details: String },

    /// A 2xx response with no body where a value was required.
    #[error("Empty response ({status})")]
    EmptyBody { status: u16 },

    /// The request could not be built (bad base URL, unserializable payload).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP status carried by the error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. }
            | ApiError::InvalidJson { status, .. }
            | ApiError::EmptyBody { status } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            ApiError::InvalidRequest(_) => None,
        }
    }

    /// Raw response body, if one was received.
    pub fn details(&self) -> Option<&str> {
        match self {
            ApiError::Status { details, .. } | ApiError::InvalidJson { details, .. } => {
                Some(details.as_str())
            }
            _ => None,
        }
    }

    /// Text to surface to the user.
    ///
    /// The response body wins when it is non-empty, then the error's own
    /// message; failures without any response use `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Transport(_) | ApiError::InvalidRequest(_) => fallback.to_string(),
            other => match other.details() {
                Some(details) if !details.is_empty() => details.to_string(),
                _ => other.to_string(),
            },
        }
    }
}

impl NotFound for ApiError {
    fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND.as_u16())
            && matches!(self, ApiError::Status { .. })
    }
}
