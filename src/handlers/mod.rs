//! # Handlers Module
//!
//! This module contains HTTP request handlers for the log hosting service.
//! Every handler returns `AppResult<HttpResponse>`; the router turns errors
//! into responses and applies CORS headers.
//!
//! ## Handlers
//!
//! - **Upload**: validate, normalize and store a new log (`POST /`)
//! - **Download**: serve a stored log with its metadata headers (`GET /?id=`)
//! - **Delete**: remove a log early with the admin token (`DELETE /?id=`)
//! - **Upload form / fallbacks**: static form, 404 and 405 responses

use http::header::{ALLOW, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use worker::Url;

use crate::config::Config;
use crate::constants::{ALLOWED_FILE_SUFFIXES, ALLOWED_METHODS, MIME_TEXT_HTML_UTF8, MIME_TEXT_PLAIN_UTF8};
use crate::errors::{AppError, AppResult};
use crate::models::{HttpRequest, HttpResponse};
use crate::pages::{render, UploadFormPage};

pub mod delete;
pub mod download;
pub mod upload;

pub use delete::delete_log;
pub use download::download_log;
pub use upload::upload_log;

/// Absolute URL of the request. The runtime always supplies one.
pub(crate) fn request_url(req: &HttpRequest) -> AppResult<Url> {
    Url::parse(&req.uri().to_string())
        .map_err(|e| AppError::Internal(format!("request URL is not absolute: {}", e)))
}

/// Header value as text, if present and visible ASCII.
pub(crate) fn header_str(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

pub(crate) fn empty_response(status: StatusCode) -> HttpResponse {
    let mut response = http::Response::new(Vec::new());
    *response.status_mut() = status;
    response
}

/// Serves the HTML upload form on `GET /`.
pub fn upload_form(config: &Config) -> AppResult<HttpResponse> {
    let html = render(&UploadFormPage {
        max_file_size: config.max_file_size,
        expiration_hours: config.expiration_ttl / 3600,
        accepted_suffixes: ALLOWED_FILE_SUFFIXES.join(", "),
    })?;
    let mut response = http::Response::new(html.into_bytes());
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(MIME_TEXT_HTML_UTF8));
    Ok(response)
}

/// Responds to methods the root path does not serve.
pub fn method_not_allowed() -> HttpResponse {
    let mut response = http::Response::new(b"Method Not Allowed".to_vec());
    *response.status_mut() = StatusCode::METHOD_NOT_ALLOWED;
    let headers = response.headers_mut();
    headers.insert(ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(MIME_TEXT_PLAIN_UTF8));
    response
}
