// Client-side error types
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Failure of a single request against the notice backend.
///
/// Cloneable so that every caller waiting on a shared in-flight fetch
/// receives the same error.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    // Network/transport failure (connection refused, reset, TLS, ...)
    #[error("request failed: {0}")]
    Transport(#[source] Arc<reqwest::Error>),

    // 404 Not Found
    #[error("not found: {0}")]
    NotFound(String),

    // Any other non-2xx status
    #[error("server responded with {status}: {message}")]
    Status { status: u16, message: String },

    // Body was not the JSON we expected
    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::NotFound(_) => Some(404),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Transport failures and 5xx responses may succeed on a second attempt;
    /// client errors never do.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    /// Message suitable for showing to an operator.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Transport(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            ApiError::NotFound(_) => "The requested notice does not exist.".to_string(),
            ApiError::Status { status, message } if (400..500).contains(status) => {
                if message.is_empty() {
                    format!("The request was rejected ({})", status)
                } else {
                    format!("The request was rejected ({}): {}", status, message)
                }
            }
            ApiError::Status { status, .. } => {
                format!("The server failed to process the request ({})", status)
            }
            ApiError::Decode(_) => "The server sent an unexpected response.".to_string(),
            ApiError::InvalidUrl(url) => format!("Invalid request URL: {}", url),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(Arc::new(err))
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Startup configuration problems. Any of these stops the process.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DUTYING_API_BASE_URL is not set")]
    MissingBaseUrl,

    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("cannot resolve config directory: {0}")]
    ConfigDir(String),
}

/// Local key-value storage failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage file is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token must not be empty")]
    EmptyToken,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors surfaced by the notice query/mutation layer and its forms.
#[derive(Debug, Clone, Error)]
pub enum NoticeError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("notice id must be positive, got {0}")]
    InvalidId(i64),

    #[error("{field} is required")]
    Validation { field: &'static str },
}

impl NoticeError {
    pub fn user_message(&self) -> String {
        match self {
            NoticeError::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// Anything that can stop the client from starting up
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_classification() {
        assert!(ApiError::Status { status: 503, message: String::new() }.is_retryable());
        assert!(!ApiError::Status { status: 422, message: String::new() }.is_retryable());
        assert!(!ApiError::NotFound("/notices/1".into()).is_retryable());
        assert!(!ApiError::Decode("eof".into()).is_retryable());
    }

    #[test]
    fn test_user_message_includes_client_error_detail() {
        let err = ApiError::Status { status: 400, message: "title is blank".into() };
        assert_eq!(err.user_message(), "The request was rejected (400): title is blank");
        assert_eq!(err.status_code(), Some(400));
    }
}
