//! # Utility Functions
//!
//! This module provides utility functions used throughout the log hosting service.
//!
//! ## Core Utilities
//!
//! - **Identifiers**: Generates and validates the unguessable record identifiers
//! - **File Names**: Enforces the allow-list of log file suffixes
//! - **HTTP Helpers**: Query parameters, share URLs, HTTP dates and dispositions
//! - **CORS Headers**: Provides consistent cross-origin request support
//!
//! ## Identifier Secrecy
//!
//! Knowing an identifier is the only thing needed to read a record, so
//! identifiers are version 4 UUIDs drawn from the platform CSPRNG
//! (`crypto.getRandomValues` inside Workers).

use chrono::{DateTime, Utc};
use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_EXPOSE_HEADERS, ACCESS_CONTROL_MAX_AGE,
};
use http::{HeaderMap, HeaderValue};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use uuid::Uuid;
use worker::Url;

use crate::constants::{
    ALLOWED_FILE_SUFFIXES, CORS_ALLOW_HEADERS, CORS_ALLOW_METHODS, CORS_ALLOW_ORIGIN,
    CORS_EXPOSE_HEADERS, CORS_MAX_AGE, FALLBACK_FILE_SUFFIX, QUERY_ID,
};

/// Generates a new record identifier.
///
/// # Returns
///
/// A random (version 4) UUID in canonical lowercase 8-4-4-4-12 form.
///
/// # Example
///
/// ```ignore
/// let id = generate_log_id();
/// // Returns: "550e8400-e29b-41d4-a716-446655440000"
/// ```
pub fn generate_log_id() -> String {
    Uuid::new_v4().hyphenated().to_string()
}

/// Checks that `id` is a UUID written in canonical lowercase hyphenated form.
///
/// Braced, URN, simple and uppercase spellings are rejected: KV keys are
/// compared byte for byte, so they could never match a stored record.
pub fn is_valid_log_id(id: &str) -> bool {
    Uuid::try_parse(id)
        .map(|uuid| uuid.hyphenated().to_string() == id)
        .unwrap_or(false)
}

/// Returns whether `name` ends with one of the allowed log suffixes.
///
/// The match is case-sensitive. A bare suffix such as `.log` is accepted.
pub fn is_allowed_file_name(name: &str) -> bool {
    ALLOWED_FILE_SUFFIXES
        .iter()
        .any(|suffix| name.ends_with(suffix))
}

/// Display name used when an upload carries none.
pub fn fallback_file_name(id: &str) -> String {
    format!("{}{}", id, FALLBACK_FILE_SUFFIX)
}

/// First value of query parameter `name`, if present and non-empty.
pub fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Whether query parameter `name` appears at all, even without a value.
pub fn has_query_param(url: &Url, name: &str) -> bool {
    url.query_pairs().any(|(key, _)| key == name)
}

/// Builds the share URL for a record: the request URL with its query
/// replaced by `id=<id>` and no fragment.
pub fn share_url(request_url: &Url, id: &str) -> Url {
    let mut url = request_url.clone();
    url.set_fragment(None);
    url.set_query(None);
    url.query_pairs_mut().append_pair(QUERY_ID, id);
    url
}

/// Formats a timestamp as an IMF-fixdate, the form used by `Expires` and
/// `Last-Modified`.
pub fn http_date(at: &DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Builds an `attachment` content disposition for `file_name`.
///
/// Plain ASCII names are sent as a quoted `filename`. Other names get an
/// ASCII fallback plus an RFC 5987 `filename*` parameter.
pub fn content_disposition(file_name: &str) -> String {
    let is_plain = file_name
        .chars()
        .all(|c| c.is_ascii_graphic() || c == ' ');
    let quoted: String = file_name
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
        .collect::<String>()
        .replace('\\', "\\\\")
        .replace('"', "\\\"");

    if is_plain {
        format!("attachment; filename=\"{}\"", quoted)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            quoted,
            utf8_percent_encode(file_name, NON_ALPHANUMERIC)
        )
    }
}

/// Creates HTTP headers for Cross-Origin Resource Sharing (CORS) support.
///
/// # CORS Configuration
///
/// - **Access-Control-Allow-Origin**: `*` (uploads are anonymous)
/// - **Access-Control-Allow-Methods**: `GET, POST, DELETE, OPTIONS`
/// - **Access-Control-Allow-Headers**: `Content-Type, Authorization`
/// - **Access-Control-Expose-Headers**: `Location, Expires, Content-Disposition`
pub fn cors_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(CORS_ALLOW_ORIGIN),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(CORS_ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
    headers.insert(
        ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static(CORS_EXPOSE_HEADERS),
    );
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static(CORS_MAX_AGE));
    headers
}
