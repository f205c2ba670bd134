use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Messages the API uses to report a missing, malformed or expired token.
/// Any of these forces a logout even when the status code is not 401.
pub const AUTH_FAILURE_MESSAGES: [&str; 3] = [
    "Authorization Token not found",
    "Token is Invalid",
    "Token is Expired",
];

#[derive(Error, Debug)]
pub enum AppError {
    #[error("API error: {0}")]
    ApiError(#[from] ApiError),

    #[error("Session error: {0}")]
    SessionError(#[from] SessionError),

    #[error("Navigation error: {0}")]
    NavigationError(#[from] NavigationError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

/// Error body returned by the server for any non-2xx response.
///
/// Only `message` is interpreted; everything else the server sends is kept
/// in `extra` so callers get the payload back as it was received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ErrorEnvelope {
    /// Parses a response body, falling back to an empty envelope when the
    /// server did not send JSON.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    pub fn is_auth_failure_message(&self) -> bool {
        self.message
            .as_deref()
            .map_or(false, |m| AUTH_FAILURE_MESSAGES.contains(&m))
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server responded with {status}: {}", .envelope.message.as_deref().unwrap_or("no message"))]
    Status {
        status: StatusCode,
        envelope: ErrorEnvelope,
    },

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Response carried no data")]
    MissingData,

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

impl ApiError {
    /// A 401, or a failure whose message names a token problem.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            ApiError::Status { status, envelope } => {
                *status == StatusCode::UNAUTHORIZED || envelope.is_auth_failure_message()
            }
            _ => false,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
            _ => None,
        }
    }

    pub fn envelope(&self) -> Option<&ErrorEnvelope> {
        match self {
            ApiError::Status { envelope, .. } => Some(envelope),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Transport(e) if e.is_timeout())
    }
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored session is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("Too many redirects while navigating to {0}")]
    RedirectLoop(String),
}
