use std::io;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

/// Custom error type for github_events operations
#[derive(Debug, thiserror::Error)]
pub enum EventsError {
    #[error("Request body is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Malformed {event} payload: {message}")]
    MalformedPayload { event: String, message: String },

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl EventsError {
    pub fn malformed(event: &str, err: impl std::fmt::Display) -> Self {
        EventsError::MalformedPayload {
            event: event.to_string(),
            message: err.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            EventsError::InvalidJson(_) => StatusCode::BAD_REQUEST,
            EventsError::MalformedPayload { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            EventsError::DatabaseError(_)
            | EventsError::ConfigError(_)
            | EventsError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for EventsError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }

        (
            status,
            Json(json!({
                "status": "error",
                "message": self.to_string()
            })),
        )
            .into_response()
    }
}

/// Helper type for Results that use EventsError
pub type Result<T> = std::result::Result<T, EventsError>;
