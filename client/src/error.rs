//! Error types for the backend client

use thiserror::Error;

/// Errors that can occur when talking to the auction backend
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The HTTP client could not be built or the base URL is unusable
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    /// The request never produced a response (connection refused, DNS, TLS)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The transport timeout elapsed before a response arrived
    #[error("network timeout")]
    Timeout,

    /// A 2xx response body did not have the expected shape
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// The backend answered with a non-2xx status
    #[error("API error (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Backend {
        /// HTTP status code
        status: u16,
        /// Human-readable message extracted from the error body, if any
        message: Option<String>,
    },
}

impl ApiError {
    /// Message supplied by the backend itself, if the error carried one
    ///
    /// Callers surface this verbatim and fall back to their own generic text
    /// otherwise.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Backend {
                message: Some(message),
                ..
            } => Some(message.as_str()),
            _ => None,
        }
    }

    /// Best human-readable description: the backend message when present,
    /// otherwise the error's own display text.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.backend_message()
            .map_or_else(|| self.to_string(), str::to_owned)
    }

    /// Whether the backend was reached at all
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::RequestFailed(_) | Self::Timeout)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::ResponseParseFailed(error.to_string())
        } else if error.is_builder() {
            Self::InvalidConfig(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}
