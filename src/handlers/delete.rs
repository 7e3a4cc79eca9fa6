//! # Delete Handler
//!
//! Removes a log before it expires. Only callers presenting the
//! administration token may delete, and deleting an unknown or already
//! deleted identifier still answers `204 No Content`.

use http::StatusCode;

use crate::config::Config;
use crate::constants::QUERY_ID;
use crate::errors::AppResult;
use crate::handlers::{empty_response, request_url};
use crate::logging::Logger;
use crate::middleware::ValidationMiddleware;
use crate::models::{HttpRequest, HttpResponse};
use crate::storage::LogStore;
use crate::utils::query_param;

/// Handles `DELETE /?id=<uuid>` with `Authorization: Bearer <token>`.
pub async fn delete_log(
    req: &HttpRequest,
    store: &dyn LogStore,
    config: &Config,
    logger: &Logger,
) -> AppResult<HttpResponse> {
    let url = request_url(req)?;
    let id = ValidationMiddleware::validate_log_id(query_param(&url, QUERY_ID))?;

    if let Err(e) =
        ValidationMiddleware::authorize_admin(req.headers(), config.admin_token.as_deref())
    {
        logger.warn("Delete refused", crate::log_data!("id" => id));
        return Err(e);
    }

    store.delete(&id).await?;
    logger.info("Log deleted", crate::log_data!("id" => id));

    Ok(empty_response(StatusCode::NO_CONTENT))
}
