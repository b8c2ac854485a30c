//! Error types for the FAQ ranking service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for ranking operations
pub type Result<T> = std::result::Result<T, Error>;

/// FAQ ranking errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No ranking session exists for the question
    #[error("No active ranking session for question: {0}")]
    SessionNotFound(String),

    /// The FAQ source could not be fetched or parsed
    #[error("FAQ source unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Question-answering model failure
    #[error("Scorer error: {0}")]
    Scorer(String),

    /// Scorer call exceeded its deadline
    #[error("Scorer timed out after {0:?}")]
    ScorerTimeout(std::time::Duration),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a scorer error
    pub fn scorer(message: impl Into<String>) -> Self {
        Self::Scorer(message.into())
    }

    /// Create an upstream error
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamUnavailable(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error", msg.clone()),
            Error::SessionNotFound(question) => (
                StatusCode::BAD_REQUEST,
                "session_not_found",
                format!("No ranking in progress for '{}'. Call /ask first.", question),
            ),
            Error::UpstreamUnavailable(msg) => {
                (StatusCode::BAD_GATEWAY, "upstream_unavailable", msg.clone())
            }
            Error::Scorer(msg) => (StatusCode::SERVICE_UNAVAILABLE, "scorer_error", msg.clone()),
            Error::ScorerTimeout(_) => (
                StatusCode::GATEWAY_TIMEOUT,
                "scorer_timeout",
                self.to_string(),
            ),
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                err.to_string(),
            ),
            Error::Json(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                err.to_string(),
            ),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        if status.is_server_error() {
            tracing::error!("{} ({})", self, error_type);
        }

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
