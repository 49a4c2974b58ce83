use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0} is not configured")]
    MissingEnvVar(String),

    #[error("{0}")]
    InvalidUrl(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("Could not find uploads playlist for channel {0}")]
    PlaylistNotFound(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded { retry_after_secs: u64 },

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Http(reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status and stable error code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Configuration(_) | AppError::MissingEnvVar(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
            }
            AppError::InvalidUrl(_) => (StatusCode::BAD_REQUEST, "INVALID_URL"),
            AppError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            AppError::ChannelNotFound(_) | AppError::PlaylistNotFound(_) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            }
            AppError::RateLimitExceeded { .. } => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED"),
            AppError::Upstream(_) | AppError::Http(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_ERROR")
            }
            AppError::Serialization(_)
            | AppError::Csv(_)
            | AppError::Io(_)
            | AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

/// Request URLs carry the API key as a query parameter, so they never reach
/// the error text
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Http(err.without_url())
    }
}

/// Convert AppError to HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        let error_message = match &self {
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {}", msg);
                msg.clone()
            }
            AppError::Http(e) => {
                tracing::error!("Upstream request failed: {:?}", e);
                e.to_string()
            }
            AppError::Serialization(e) => {
                tracing::error!("Serialization error: {:?}", e);
                "Data serialization error".to_string()
            }
            AppError::Csv(e) => {
                tracing::error!("CSV error: {:?}", e);
                "Failed to export videos".to_string()
            }
            AppError::Io(e) => {
                tracing::error!("I/O error: {:?}", e);
                "An internal error occurred".to_string()
            }
            AppError::Internal(_) | AppError::Configuration(_) | AppError::MissingEnvVar(_) => {
                tracing::error!("Internal error: {}", self);
                self.to_string()
            }
            AppError::RateLimitExceeded { retry_after_secs } => {
                tracing::warn!(retry_after_secs, "Rate limit exceeded");
                self.to_string()
            }
            _ => {
                tracing::debug!("Request rejected: {}", self);
                self.to_string()
            }
        };

        let body = json!({
            "error": error_message,
            "code": error_code,
        });

        let mut response = (status, Json(body)).into_response();

        if let AppError::RateLimitExceeded { retry_after_secs } = self {
            if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}

/// Result type alias for AppResult
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::InvalidUrl("bad".into()).status_and_code().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::ChannelNotFound("x".into()).status_and_code().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::PlaylistNotFound("x".into()).status_and_code().0,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::RateLimitExceeded { retry_after_secs: 3 }
                .status_and_code()
                .0,
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AppError::Upstream("quota".into()).status_and_code().0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::MissingEnvVar("YOUTUBE_API_KEY".into())
                .status_and_code()
                .1,
            "CONFIG_ERROR"
        );
    }

    #[test]
    fn test_rate_limit_response_has_retry_after() {
        let response = AppError::RateLimitExceeded { retry_after_secs: 42 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "42");
    }

    #[test]
    fn test_missing_env_var_message() {
        let err = AppError::MissingEnvVar("YOUTUBE_API_KEY".to_string());
        assert_eq!(err.to_string(), "YOUTUBE_API_KEY is not configured");
    }
}
