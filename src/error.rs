use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum PestError {
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Username already exists")]
    UsernameTaken,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Model download failed with status: {0}")]
    DownloadStatus(StatusCode),

    #[error("Model artifact unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Model load error: {0}")]
    ModelLoad(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    #[error("Image decode error: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Invalid multipart upload: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
}

impl From<figment::Error> for PestError {
    fn from(e: figment::Error) -> Self {
        PestError::Config(Box::new(e))
    }
}

/// Classifies errors that are worth another attempt under a backoff policy.
pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for PestError {
    fn is_retryable(&self) -> bool {
        match self {
            PestError::Reqwest(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            PestError::DownloadStatus(code) => {
                code.is_server_error() || *code == StatusCode::TOO_MANY_REQUESTS
            }
            PestError::Io(_) => true,
            _ => false,
        }
    }
}

impl IntoResponse for PestError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            PestError::UsernameTaken => (
                StatusCode::CONFLICT,
                ApiErrorBody {
                    code: "USERNAME_TAKEN".to_string(),
                    message: "Username already exists.".to_string(),
                },
            ),
            PestError::UnsupportedImage(reason) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                ApiErrorBody {
                    code: "UNSUPPORTED_IMAGE".to_string(),
                    message: reason,
                },
            ),
            PestError::ImageDecode(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiErrorBody {
                    code: "UNREADABLE_IMAGE".to_string(),
                    message: "The uploaded file could not be decoded as an image.".to_string(),
                },
            ),
            PestError::Multipart(e) => (
                e.status(),
                ApiErrorBody {
                    code: "BAD_UPLOAD".to_string(),
                    message: e.body_text(),
                },
            ),
            PestError::ModelUnavailable(_)
            | PestError::ModelLoad(_)
            | PestError::Reqwest(_)
            | PestError::DownloadStatus(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiErrorBody {
                    code: "MODEL_UNAVAILABLE".to_string(),
                    message: "The classification model is not available.".to_string(),
                },
            ),
            PestError::Config(_)
            | PestError::InvalidConfig(_)
            | PestError::DatabaseError(_)
            | PestError::Io(_)
            | PestError::Inference(_)
            | PestError::Template(_)
            | PestError::Join(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                },
            ),
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
