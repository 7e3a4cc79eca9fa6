//! # Application Constants
//!
//! This module defines application-wide constants used throughout the log hosting service.
//! Centralizing constants keeps the wire contract (query parameters, headers, stored
//! metadata) in one place.
//!
//! ## Environment
//!
//! Names of the Worker variables and secrets read at startup. They must match
//! `wrangler.toml` and the secrets configured with `wrangler secret put`.
//!
//! ## Limits
//!
//! Defaults and hard limits inherited from Workers KV.
//!
//! ## HTTP
//!
//! Query parameters, header values and CORS policy of the public API.

/// Default KV namespace binding holding uploaded logs
pub const DEFAULT_KV_BINDING: &str = "LOGS";

/// Variable naming the KV namespace binding
pub const ENV_KV_BINDING: &str = "KV_BINDING";

/// Variable holding the maximum upload size in bytes
pub const ENV_MAX_FILE_SIZE: &str = "MAX_FILE_SIZE";

/// Variable holding the record lifetime in seconds
pub const ENV_EXPIRATION_TTL: &str = "EXPIRATION_TTL";

/// Secret holding the administration bearer token
pub const ENV_ADMIN_TOKEN: &str = "ADMIN_TOKEN";

/// Largest value Workers KV accepts (25 MiB)
pub const KV_MAX_VALUE_SIZE: u64 = 25 * 1024 * 1024;

/// Largest serialized metadata Workers KV accepts per key
pub const KV_MAX_METADATA_SIZE: usize = 1024;

/// Shortest expiration Workers KV accepts
pub const KV_MIN_EXPIRATION_TTL: u64 = 60;

/// Default maximum upload size (25 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = KV_MAX_VALUE_SIZE;

/// Default record lifetime (7 days)
pub const DEFAULT_EXPIRATION_TTL: u64 = 7 * 24 * 60 * 60;

/// Edge cache window for downloads, also the smallest `cacheTtl` KV allows
pub const DOWNLOAD_CACHE_TTL: u64 = 60;

/// File name suffixes accepted for uploads
pub const ALLOWED_FILE_SUFFIXES: &[&str] = &[".txt", ".log", ".dmp"];

/// Suffix appended to the identifier when an upload carries no name
pub const FALLBACK_FILE_SUFFIX: &str = ".txt";

/// Query parameter carrying the record identifier
pub const QUERY_ID: &str = "id";

/// Query parameter carrying the display name for raw uploads
pub const QUERY_NAME: &str = "name";

/// Multipart form field holding the uploaded file
pub const FORM_FILE_FIELD: &str = "file";

/// Authorization scheme expected on delete requests
pub const BEARER_PREFIX: &str = "Bearer ";

pub const MIME_TEXT_PLAIN: &str = "text/plain";
pub const MIME_TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";
pub const MIME_OCTET_STREAM: &str = "application/octet-stream";
pub const MIME_MULTIPART_FORM: &str = "multipart/form-data";
pub const MIME_TEXT_HTML: &str = "text/html";
pub const MIME_TEXT_HTML_UTF8: &str = "text/html; charset=utf-8";

/// Methods served on the root path
pub const ALLOWED_METHODS: &str = "GET, POST, DELETE, OPTIONS";

/// CORS header for allowed origins
pub const CORS_ALLOW_ORIGIN: &str = "*";

/// CORS header for allowed methods
pub const CORS_ALLOW_METHODS: &str = ALLOWED_METHODS;

/// CORS header for allowed headers
pub const CORS_ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// CORS header listing response headers readable by scripts
pub const CORS_EXPOSE_HEADERS: &str = "Location, Expires, Content-Disposition";

/// CORS preflight cache lifetime in seconds
pub const CORS_MAX_AGE: &str = "86400";
