use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("HubSpot API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("{message}")]
    UpstreamError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found")]
    NotFound,
}

impl PortalError {
    /// Wraps a failed primary fetch with the message shown to HTTP callers.
    pub fn upstream(message: &str, source: PortalError) -> Self {
        tracing::error!("{}: {}", message, source);
        PortalError::UpstreamError {
            message: message.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            PortalError::Unauthorized => StatusCode::UNAUTHORIZED,
            PortalError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 404 from HubSpot, used by callers that treat "not found" differently.
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortalError::ApiError { status: 404, .. })
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status_code(), Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_maps_to_401() {
        let response = PortalError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let response = PortalError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_upstream_error_keeps_public_message() {
        let err = PortalError::upstream(
            "Failed to fetch posts from HubSpot",
            PortalError::ApiError {
                status: 503,
                message: "maintenance".to_string(),
            },
        );
        assert_eq!(err.to_string(), "Failed to fetch posts from HubSpot");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_is_not_found() {
        let err = PortalError::ApiError {
            status: 404,
            message: String::new(),
        };
        assert!(err.is_not_found());
        assert!(!PortalError::Unauthorized.is_not_found());
    }
}
