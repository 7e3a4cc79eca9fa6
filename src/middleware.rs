//! # Middleware Components
//!
//! This module provides middleware components for request/response processing
//! in the log hosting service. Middleware components handle cross-cutting
//! concerns such as CORS and request validation.
//!
//! ## Middleware Types
//!
//! - **CORS Middleware**: Handles cross-origin request support
//! - **Validation Middleware**: Validates identifiers, sizes, names and credentials
//!
//! ## Usage Examples
//!
//! ```ignore
//! // Handle CORS preflight
//! if req.method() == Method::OPTIONS {
//!     return CorsMiddleware::handle_preflight();
//! }
//!
//! // Validate the record identifier
//! let id = ValidationMiddleware::validate_log_id(query_param(&url, QUERY_ID))?;
//! ```

use constant_time_eq::constant_time_eq;
use http::header::AUTHORIZATION;
use http::{HeaderMap, StatusCode};

use crate::constants::{BEARER_PREFIX, KV_MAX_METADATA_SIZE};
use crate::errors::{AppError, AppResult};
use crate::models::{HttpResponse, LogMetadata};
use crate::utils::{cors_headers, is_allowed_file_name, is_valid_log_id};

/// Middleware for handling Cross-Origin Resource Sharing (CORS) requests.
///
/// Uploads and downloads are anonymous, so every origin is allowed. Deletes
/// still need the bearer token whatever the origin.
pub struct CorsMiddleware;

impl CorsMiddleware {
    /// Applies CORS headers to an existing response.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let response = CorsMiddleware::apply_headers(error.into_response());
    /// ```
    pub fn apply_headers(mut response: HttpResponse) -> HttpResponse {
        response.headers_mut().extend(cors_headers());
        response
    }

    /// Handles CORS preflight requests (OPTIONS method).
    ///
    /// Returns an empty 204 response advertising the allowed methods and
    /// headers.
    ///
    /// # Browser Behavior
    ///
    /// Browsers send preflight requests for:
    /// - `DELETE` requests
    /// - Requests carrying an `Authorization` header
    /// - Uploads with a non-simple content type such as `application/octet-stream`
    pub fn handle_preflight() -> HttpResponse {
        let mut response = http::Response::new(Vec::new());
        *response.status_mut() = StatusCode::NO_CONTENT;
        Self::apply_headers(response)
    }
}

/// Middleware for validating request parameters and headers.
///
/// All validation functions return `AppResult<T>` so handlers can chain
/// them with `?`.
pub struct ValidationMiddleware;

impl ValidationMiddleware {
    /// Validates the `id` query parameter.
    ///
    /// # Errors
    ///
    /// - `MissingIdentifier`: the parameter is absent or empty
    /// - `InvalidIdentifier`: the value is not a canonical lowercase UUID
    pub fn validate_log_id(id: Option<String>) -> AppResult<String> {
        let id = id.ok_or(AppError::MissingIdentifier)?;
        if !is_valid_log_id(&id) {
            return Err(AppError::InvalidIdentifier(id));
        }
        Ok(id)
    }

    /// Validates that an upload is within the configured size limit.
    ///
    /// # Errors
    ///
    /// - `PayloadTooLarge`: `size` exceeds `max_size`
    pub fn validate_file_size(size: u64, max_size: u64) -> AppResult<()> {
        if size > max_size {
            return Err(AppError::PayloadTooLarge {
                size,
                max: max_size,
            });
        }
        Ok(())
    }

    /// Validates a display name against the suffix allow-list.
    ///
    /// # Errors
    ///
    /// - `InvalidFileName`: the name does not end in `.txt`, `.log` or `.dmp`
    pub fn validate_file_name(name: &str) -> AppResult<()> {
        if !is_allowed_file_name(name) {
            return Err(AppError::InvalidFileName(name.to_string()));
        }
        Ok(())
    }

    /// Validates that a record's metadata fits the store's per-key limit.
    ///
    /// Only the display name has unbounded length, so an oversized record is
    /// reported against it.
    ///
    /// # Errors
    ///
    /// - `InvalidFileName`: the serialized metadata exceeds the limit
    pub fn validate_metadata_size(metadata: &LogMetadata) -> AppResult<()> {
        let encoded = serde_json::to_vec(metadata)
            .map_err(|e| AppError::Internal(format!("metadata serialization failed: {}", e)))?;
        if encoded.len() > KV_MAX_METADATA_SIZE {
            let name = metadata.name.clone().unwrap_or_default();
            return Err(AppError::InvalidFileName(name));
        }
        Ok(())
    }

    /// Checks the `Authorization` header against the administration token.
    ///
    /// The header must be exactly `Bearer <token>`. The comparison runs in
    /// constant time. With no token configured every request is refused.
    ///
    /// # Errors
    ///
    /// - `Forbidden`: header missing, malformed or not matching
    pub fn authorize_admin(headers: &HeaderMap, admin_token: Option<&str>) -> AppResult<()> {
        let token = admin_token.ok_or(AppError::Forbidden)?;
        let provided = headers
            .get(AUTHORIZATION)
            .map(|value| value.as_bytes())
            .ok_or(AppError::Forbidden)?;
        let expected = format!("{}{}", BEARER_PREFIX, token);

        if constant_time_eq(provided, expected.as_bytes()) {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}
