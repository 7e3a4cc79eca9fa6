use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};
use thiserror::Error;

use crate::constants::MIME_TEXT_PLAIN_UTF8;
use crate::models::HttpResponse;
use crate::storage::StorageError;

pub type AppResult<T> = std::result::Result<T, AppError>;

/// Every way a request can fail. All variants are terminal for the request.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing Content-Type header")]
    MissingContentType,
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("Invalid contents: {0}")]
    InvalidContents(String),
    #[error("File size {size} exceeds maximum allowed size {max}")]
    PayloadTooLarge { size: u64, max: u64 },
    #[error("Invalid file name: {0}")]
    InvalidFileName(String),
    #[error("Missing id parameter")]
    MissingIdentifier,
    #[error("Invalid id: {0}")]
    InvalidIdentifier(String),
    #[error("Not found")]
    NotFound,
    #[error("Forbidden")]
    Forbidden,
    #[error("Internal error: {0}")]
    Internal(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<StorageError> for AppError {
    fn from(error: StorageError) -> Self {
        AppError::Internal(error.to_string())
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingContentType
            | Self::InvalidContents(_)
            | Self::InvalidFileName(_)
            | Self::MissingIdentifier
            | Self::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) | Self::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code, used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingContentType => "missing_content_type",
            Self::UnsupportedMediaType(_) => "unsupported_media_type",
            Self::InvalidContents(_) => "invalid_contents",
            Self::PayloadTooLarge { .. } => "payload_too_large",
            Self::InvalidFileName(_) => "invalid_file_name",
            Self::MissingIdentifier => "missing_identifier",
            Self::InvalidIdentifier(_) => "invalid_identifier",
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::Internal(_) => "internal_error",
            Self::Configuration(_) => "configuration_error",
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Message shown to callers. Server-side details stay in the logs.
    pub fn public_message(&self) -> String {
        if self.is_server_error() {
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        }
    }

    pub fn into_response(self) -> HttpResponse {
        let mut response = http::Response::new(self.public_message().into_bytes());
        *response.status_mut() = self.status_code();
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(MIME_TEXT_PLAIN_UTF8));
        response
    }
}
