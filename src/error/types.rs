use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use uuid::Uuid;

use crate::middleware::current_request_id;
use crate::models::{ErrorDetail, ErrorResponse};

pub type AppResult<T> = Result<T, AppError>;

/// Longest remote error body carried into an error message.
pub const MAX_REMOTE_DETAIL_LEN: usize = 1024;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed request: {message}")]
    MalformedRequest { message: String },

    #[error("No documents in request")]
    MissingFile,

    #[error("Too many files: {count} exceeds limit of {limit}")]
    TooManyFiles { count: usize, limit: usize },

    #[error("Upload too large: exceeds limit of {limit}MB")]
    UploadTooLarge { limit: usize },

    #[error("Unsupported file type: {file_name}")]
    UnsupportedType { file_name: String },

    #[error("Conversion of {file_name} failed: {message}")]
    ConversionFailed { file_name: String, message: String },

    #[error("Merge failed: {message}")]
    MergeFailed { message: String },

    #[error("Rate limit exceeded: maximum concurrent requests reached")]
    RateLimitExceeded,

    #[error("Processing deadline exceeded")]
    Timeout,

    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Service unavailable: {service}")]
    ServiceUnavailable { service: String },
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::MalformedRequest { .. } => "MALFORMED_REQUEST",
            AppError::MissingFile => "MISSING_FILE",
            AppError::TooManyFiles { .. } => "TOO_MANY_FILES",
            AppError::UploadTooLarge { .. } => "UPLOAD_TOO_LARGE",
            AppError::UnsupportedType { .. } => "UNSUPPORTED_TYPE",
            AppError::ConversionFailed { .. } => "CONVERSION_FAILED",
            AppError::MergeFailed { .. } => "MERGE_FAILED",
            AppError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            AppError::Timeout => "REQUEST_TIMEOUT",
            AppError::Internal { .. } => "INTERNAL_ERROR",
            AppError::ConfigError { .. } => "CONFIG_ERROR",
            AppError::ServiceUnavailable { .. } => "SERVICE_UNAVAILABLE",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MalformedRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::MissingFile => StatusCode::BAD_REQUEST,
            AppError::TooManyFiles { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::UploadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::UnsupportedType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::ConversionFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::MergeFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ConfigError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();
        // Outside the logging middleware there is no id to echo
        let request_id = current_request_id().unwrap_or_else(|| Uuid::new_v4().to_string());

        tracing::error!(
            error_code = error_code,
            status_code = %status,
            error_message = %message,
            "API error occurred"
        );

        let body = Json(ErrorResponse {
            success: false,
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                request_id,
                timestamp: chrono::Utc::now().to_rfc3339(),
            },
            data: None,
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout
    }
}

impl AppError {
    pub fn malformed(message: impl Into<String>) -> Self {
        AppError::MalformedRequest {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        AppError::ConfigError {
            message: message.into(),
        }
    }

    pub fn service_unavailable(service: impl Into<String>) -> Self {
        AppError::ServiceUnavailable {
            service: service.into(),
        }
    }

    pub fn conversion(file_name: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::ConversionFailed {
            file_name: file_name.into(),
            message: truncate_detail(message.into()),
        }
    }

    pub fn merge(message: impl Into<String>) -> Self {
        AppError::MergeFailed {
            message: truncate_detail(message.into()),
        }
    }
}

/// Caps a remote error body so a misbehaving converter cannot flood logs.
fn truncate_detail(mut detail: String) -> String {
    if detail.len() > MAX_REMOTE_DETAIL_LEN {
        let mut cut = MAX_REMOTE_DETAIL_LEN;
        while !detail.is_char_boundary(cut) {
            cut -= 1;
        }
        detail.truncate(cut);
        detail.push_str("...");
    }
    detail
}
