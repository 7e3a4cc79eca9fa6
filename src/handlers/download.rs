//! # Download Handler
//!
//! Serves a stored log by identifier. Reads are idempotent and may be
//! answered from the store's edge cache, so a record can stay visible for up
//! to [`DOWNLOAD_CACHE_TTL`] seconds after it is deleted.

use http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE, LAST_MODIFIED};
use http::{HeaderMap, HeaderValue};

use crate::constants::{
    DOWNLOAD_CACHE_TTL, MIME_OCTET_STREAM, MIME_TEXT_PLAIN, MIME_TEXT_PLAIN_UTF8, QUERY_ID,
};
use crate::errors::{AppError, AppResult};
use crate::handlers::request_url;
use crate::logging::Logger;
use crate::middleware::ValidationMiddleware;
use crate::models::{HttpRequest, HttpResponse, LogMetadata};
use crate::storage::LogStore;
use crate::utils::{content_disposition, fallback_file_name, http_date, query_param};

/// Handles `GET /?id=<uuid>`.
///
/// The optional `download` flag is accepted but has no effect: the
/// attachment disposition is always sent.
pub async fn download_log(
    req: &HttpRequest,
    store: &dyn LogStore,
    logger: &Logger,
) -> AppResult<HttpResponse> {
    let url = request_url(req)?;
    let id = ValidationMiddleware::validate_log_id(query_param(&url, QUERY_ID))?;

    let (content, metadata) = store.get_with_metadata(&id).await?;
    let Some(content) = content else {
        logger.info("Log not found", crate::log_data!("id" => id));
        return Err(AppError::NotFound);
    };
    let metadata = metadata.unwrap_or_default();

    logger.info(
        "Serving log",
        crate::log_data!("id" => id, "size" => content.len()),
    );

    let mut response = http::Response::new(content);
    *response.headers_mut() = download_headers(&id, &metadata);
    Ok(response)
}

/// Response headers for a stored log.
///
/// - `Content-Type`: the stored type, or UTF-8 text when none was stored or
///   the stored type is bare `text/plain`
/// - `Content-Disposition`: attachment named after the stored name, or `<id>.txt`
/// - `Last-Modified`: the upload time, when recorded
pub fn download_headers(id: &str, metadata: &LogMetadata) -> HeaderMap {
    let mut headers = HeaderMap::new();

    let content_type = match metadata.media_type.as_deref() {
        None | Some(MIME_TEXT_PLAIN) => HeaderValue::from_static(MIME_TEXT_PLAIN_UTF8),
        Some(stored) => HeaderValue::from_str(stored)
            .unwrap_or_else(|_| HeaderValue::from_static(MIME_OCTET_STREAM)),
    };
    headers.insert(CONTENT_TYPE, content_type);

    let file_name = metadata
        .name
        .clone()
        .unwrap_or_else(|| fallback_file_name(id));
    // Non-ASCII names are percent-encoded, so the value is always valid.
    if let Ok(value) = HeaderValue::from_str(&content_disposition(&file_name)) {
        headers.insert(CONTENT_DISPOSITION, value);
    }

    if let Some(uploaded_at) = metadata.uploaded_at {
        if let Ok(value) = HeaderValue::from_str(&http_date(&uploaded_at)) {
            headers.insert(LAST_MODIFIED, value);
        }
    }

    if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={}", DOWNLOAD_CACHE_TTL)) {
        headers.insert(CACHE_CONTROL, value);
    }

    headers
}
