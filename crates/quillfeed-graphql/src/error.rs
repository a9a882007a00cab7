//! Error types for the GraphQL transport.

use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Connection-level error information captured from reqwest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpErrorInfo {
    /// Error message.
    pub message: String,
    /// HTTP status code (if available).
    pub status_code: Option<u16>,
    /// Whether the error was a connection failure.
    pub is_connect: bool,
    /// Whether the error was a request error.
    pub is_request: bool,
}

impl From<&reqwest::Error> for HttpErrorInfo {
    fn from(err: &reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
            status_code: err.status().map(|status| status.as_u16()),
            is_connect: err.is_connect(),
            is_request: err.is_request(),
        }
    }
}

/// Error type for GraphQL transport operations.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The request exceeded the configured timeout.
    #[error("request timed out after {timeout:?}")]
    Timeout {
        /// Configured per-request timeout.
        timeout: Duration,
    },

    /// Non-2xx HTTP response status.
    #[error("HTTP {status}: {status_text}")]
    Http {
        /// HTTP status code.
        status: StatusCode,
        /// Canonical status text.
        status_text: String,
    },

    /// GraphQL-level errors returned by the server, possibly with HTTP 200.
    #[error("GraphQL errors: {messages}")]
    Graphql {
        /// Concatenated error messages.
        messages: String,
    },

    /// Well-formed success response with neither data nor errors.
    #[error("GraphQL protocol error: {message}")]
    Protocol {
        /// Details.
        message: String,
    },

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Connection-level transport error.
    #[error("transport error: {0:?}")]
    Transport(HttpErrorInfo),
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl ClientError {
    /// Map a reqwest error, surfacing timeouts as their own kind so
    /// upstream backoff policy can distinguish them.
    #[must_use]
    pub fn from_reqwest(err: &reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout }
        } else {
            Self::Transport(HttpErrorInfo::from(err))
        }
    }

    /// Returns `true` if the error is retryable.
    ///
    /// Timeouts and connection failures are transient; HTTP errors only
    /// for 5xx/429; a malformed success response is treated as transient
    /// (the retry policy caps it at a single retry); GraphQL errors are
    /// never retryable without changing the query.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Protocol { .. } => true,
            Self::Http { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Self::Transport(info) => info.is_connect || info.is_request,
            Self::Graphql { .. } | Self::Json(_) => false,
        }
    }
}
