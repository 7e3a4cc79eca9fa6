//! # Upload Handler
//!
//! Accepts a log as `text/plain`, `application/octet-stream` or a
//! `multipart/form-data` form, stores it for the configured TTL and answers
//! with its share URL.
//!
//! ## Validation Order
//!
//! 1. `Content-Type` present, otherwise `MissingContentType`
//! 2. Body extraction: `UnsupportedMediaType` or `InvalidContents`
//! 3. Size within `max_file_size`, otherwise `PayloadTooLarge`
//! 4. Display name (given or `<id>.txt`) on the allow-list, otherwise `InvalidFileName`
//! 5. Serialized metadata within the KV per-key limit, otherwise `InvalidFileName`
//!
//! Nothing is written to the store unless all five pass.

use chrono::Utc;
use http::header::{ACCEPT, CONTENT_TYPE, EXPIRES, LOCATION};
use http::{HeaderValue, StatusCode};

use crate::config::Config;
use crate::constants::{MIME_TEXT_HTML_UTF8, QUERY_NAME};
use crate::errors::{AppError, AppResult};
use crate::extract::extract_content;
use crate::handlers::{empty_response, header_str, request_url};
use crate::logging::Logger;
use crate::middleware::ValidationMiddleware;
use crate::models::{HttpRequest, HttpResponse, LogRecord};
use crate::negotiation::{negotiate_upload, UploadRepresentation};
use crate::pages::{render, UploadedPage};
use crate::storage::LogStore;
use crate::utils::{fallback_file_name, generate_log_id, http_date, query_param, share_url};

/// Handles `POST /`.
pub async fn upload_log(
    req: HttpRequest,
    store: &dyn LogStore,
    config: &Config,
    logger: &Logger,
) -> AppResult<HttpResponse> {
    let url = request_url(&req)?;
    let content_type =
        header_str(req.headers(), CONTENT_TYPE).ok_or(AppError::MissingContentType)?;
    let accept = header_str(req.headers(), ACCEPT);
    let query_name = query_param(&url, QUERY_NAME);

    let content = extract_content(&content_type, req.into_body(), query_name).await?;
    ValidationMiddleware::validate_file_size(content.bytes.len() as u64, config.max_file_size)?;

    let id = generate_log_id();
    let name = content.name.unwrap_or_else(|| fallback_file_name(&id));
    ValidationMiddleware::validate_file_name(&name)?;

    let record = LogRecord {
        id,
        content: content.bytes,
        name,
        media_type: content.media_type,
        uploaded_at: Utc::now(),
    };
    let metadata = record.metadata();
    ValidationMiddleware::validate_metadata_size(&metadata)?;
    store
        .put(&record.id, &record.content, config.expiration_ttl, &metadata)
        .await?;

    let expires_at = record.expires_at(config.expiration_ttl);
    logger.info(
        "Log stored",
        crate::log_data!(
            "id" => record.id,
            "name" => record.name,
            "size" => record.size(),
            "media_type" => record.media_type,
            "expires_at" => expires_at.to_rfc3339()
        ),
    );

    let representation = negotiate_upload(
        accept.as_deref(),
        share_url(&url, &record.id),
        expires_at,
    );
    upload_response(&representation, &record.name)
}

fn upload_response(
    representation: &UploadRepresentation,
    file_name: &str,
) -> AppResult<HttpResponse> {
    let location = representation.share_url().as_str();
    let expires = http_date(&representation.expires_at());

    let mut response = match representation {
        UploadRepresentation::Created { .. } => empty_response(StatusCode::CREATED),
        UploadRepresentation::Html { .. } => {
            let html = render(&UploadedPage {
                share_url: location,
                expires: &expires,
                file_name,
            })?;
            let mut response = http::Response::new(html.into_bytes());
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static(MIME_TEXT_HTML_UTF8));
            response
        }
    };

    let headers = response.headers_mut();
    headers.insert(LOCATION, header_value(location)?);
    headers.insert(EXPIRES, header_value(&expires)?);
    Ok(response)
}

fn header_value(value: &str) -> AppResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| AppError::Internal(format!("invalid header value {:?}: {}", value, e)))
}
