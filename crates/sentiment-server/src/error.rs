//! Error types for the HTTP layer

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use sentiment_core::SentimentError;
use serde_json::json;
use thiserror::Error;

/// Errors surfaced by the service
#[derive(Debug, Error)]
pub enum ServerError {
    /// Error from the sentiment pipeline
    #[error(transparent)]
    Sentiment(#[from] SentimentError),

    /// Server configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, ServerError>;

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::Sentiment(SentimentError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ServerError::Sentiment(SentimentError::InvalidRequest(detail)) => {
                json!({ "detail": detail })
            }
            other => {
                tracing::error!(error = %other, "request failed");
                json!({ "detail": "internal server error", "error": other.to_string() })
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err: ServerError = SentimentError::InvalidRequest("symbol must not be empty".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid request: symbol must not be empty");

        let err = ServerError::Config("PORT is not a number".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
