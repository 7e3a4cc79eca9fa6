//! # Content Extraction
//!
//! Normalizes an upload body into [`UploadedContent`]: raw bytes, an optional
//! display name and an optional media type.
//!
//! | Request `Content-Type`      | Media type stored           | Name taken from       |
//! |-----------------------------|-----------------------------|-----------------------|
//! | `text/plain`                | `text/plain; charset=utf-8` | `?name=` query        |
//! | `application/octet-stream`  | `application/octet-stream`  | `?name=` query        |
//! | `multipart/form-data`       | the `file` part's type      | the `file` part's name|
//!
//! Anything else is rejected as unsupported.

use std::convert::Infallible;

use crate::constants::{
    FORM_FILE_FIELD, MIME_MULTIPART_FORM, MIME_OCTET_STREAM, MIME_TEXT_PLAIN,
    MIME_TEXT_PLAIN_UTF8,
};
use crate::errors::{AppError, AppResult};
use crate::models::UploadedContent;

/// Lowercased media type without parameters, e.g. `text/plain` for
/// `Text/Plain; charset=UTF-8`.
pub fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Extracts the uploaded file from a request body.
///
/// # Arguments
///
/// * `content_type` - The request's `Content-Type` header value
/// * `body` - The full request body
/// * `query_name` - The `name` query parameter, used for raw uploads
///
/// # Errors
///
/// - `UnsupportedMediaType`: the content type is not one of the three above
/// - `InvalidContents`: the body (or the `file` part) is empty, or the
///   multipart body cannot be parsed
pub async fn extract_content(
    content_type: &str,
    body: Vec<u8>,
    query_name: Option<String>,
) -> AppResult<UploadedContent> {
    let content = match essence(content_type).as_str() {
        MIME_TEXT_PLAIN => UploadedContent {
            bytes: body,
            name: query_name,
            media_type: Some(MIME_TEXT_PLAIN_UTF8.to_string()),
        },
        MIME_OCTET_STREAM => UploadedContent {
            bytes: body,
            name: query_name,
            media_type: Some(MIME_OCTET_STREAM.to_string()),
        },
        MIME_MULTIPART_FORM => extract_multipart(content_type, body).await?,
        other => return Err(AppError::UnsupportedMediaType(other.to_string())),
    };

    if content.bytes.is_empty() {
        return Err(AppError::InvalidContents("empty upload".to_string()));
    }
    Ok(content)
}

async fn extract_multipart(content_type: &str, body: Vec<u8>) -> AppResult<UploadedContent> {
    let boundary = multer::parse_boundary(content_type)
        .map_err(|e| AppError::InvalidContents(format!("invalid multipart boundary: {}", e)))?;
    let stream = futures::stream::once(async move { Ok::<_, Infallible>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidContents(format!("malformed multipart body: {}", e)))?
    {
        if field.name() != Some(FORM_FILE_FIELD) {
            continue;
        }
        let name = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.is_empty());
        let media_type = field.content_type().map(|mime| mime.to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidContents(format!("unreadable file part: {}", e)))?;

        return Ok(UploadedContent {
            bytes: bytes.to_vec(),
            name,
            media_type,
        });
    }

    Err(AppError::InvalidContents(format!(
        "multipart form has no '{}' part",
        FORM_FILE_FIELD
    )))
}
