use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Training dataset errors
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Model training errors
    #[error("Training error: {0}")]
    Training(String),

    /// Inference errors
    #[error("Prediction error: {0}")]
    Prediction(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get HTTP status code for this error
    ///
    /// Every variant is a server-side fault; malformed request bodies never
    /// reach this type (the `Json` extractor rejects them first).
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Dataset(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Training(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Dataset(_) => "DATASET_ERROR",
            AppError::Training(_) => "TRAINING_ERROR",
            AppError::Prediction(_) => "PREDICTION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Convert AppError to HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        tracing::error!(
            error_code = error_code,
            status_code = status.as_u16(),
            message = %message,
            "Request error"
        );

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
                "status": status.as_u16(),
            }
        }));

        (status, body).into_response()
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
