//! # logdrop - Cloudflare Workers
//!
//! Anonymous, ephemeral log file hosting built with Rust and Cloudflare Workers.
//! Clients upload a text or binary log and receive an unguessable share URL;
//! anyone holding the URL can download the file until it expires. Holders of
//! the administration token may delete a file early.
//!
//! ## Architecture
//!
//! - **Router**: Dispatches requests by method and `id` presence
//! - **Middleware**: CORS, identifier/size/name validation, admin authorization
//! - **Handlers**: Upload, download and delete logic
//! - **Extract**: Normalizes text, binary and multipart bodies
//! - **Storage**: The `LogStore` contract, backed by Workers KV in production
//!
//! The router and handlers only see `http` types and a `LogStore`, so they run
//! natively in tests against `MemoryLogStore`. This file converts between the
//! Workers runtime types and those.
//!
//! ## API
//!
//! ```text
//! GET    /                       - Upload form
//! POST   /[?name=<file>]         - Upload a log (201 + Location)
//! GET    /?id=<uuid>             - Download a log
//! DELETE /?id=<uuid>             - Delete a log (Authorization: Bearer <token>)
//! OPTIONS *                      - CORS preflight
//! ```

use ::http::HeaderMap;
use std::sync::{Arc, OnceLock};
use worker::*;

pub mod config;
pub mod constants;
pub mod errors;
pub mod extract;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod negotiation;
pub mod pages;
pub mod router;
pub mod storage;
pub mod utils;

use config::Config;
use errors::{AppError, AppResult};
use logging::Logger;
use middleware::CorsMiddleware;
use models::{HttpRequest, HttpResponse};
use storage::KvLogStore;

static CONFIG_CACHE: OnceLock<Arc<Config>> = OnceLock::new();

/// Main entry point for the Cloudflare Worker.
///
/// 1. Sets up panic handling for better debugging
/// 2. Loads configuration from the environment (once per isolate)
/// 3. Opens the KV namespace holding logs
/// 4. Converts the request, routes it, and converts the response back
///
/// Configuration and binding problems are answered with a plain 500; the
/// details only go to the log.
#[event(fetch)]
pub async fn main(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    console_error_panic_hook::set_once();

    let config = match load_config(&env) {
        Ok(config) => config,
        Err(e) => return startup_failure(e),
    };
    let kv = match env.kv(&config.kv_binding) {
        Ok(kv) => kv,
        Err(e) => {
            return startup_failure(AppError::Configuration(format!(
                "KV binding {} unavailable: {}",
                config.kv_binding, e
            )))
        }
    };
    let store = KvLogStore::new(kv);

    let request = into_http_request(req).await?;
    let response = router::handle_request(request, &store, &config).await;
    into_worker_response(response)
}

fn load_config(env: &Env) -> AppResult<Arc<Config>> {
    if let Some(config) = CONFIG_CACHE.get() {
        return Ok(config.clone());
    }

    let config = Arc::new(Config::from_env(env)?);
    let _ = CONFIG_CACHE.set(config.clone());
    Ok(config)
}

fn startup_failure(error: AppError) -> Result<Response> {
    Logger::for_request().error(
        "Worker misconfigured",
        crate::log_data!("code" => error.code(), "error" => error.to_string()),
    );
    into_worker_response(CorsMiddleware::apply_headers(error.into_response()))
}

async fn into_http_request(mut req: Request) -> Result<HttpRequest> {
    let method = req.method();
    let url = req.url()?;

    let mut builder = ::http::Request::builder()
        .method(method.to_string().as_str())
        .uri(url.as_str());
    for (name, value) in req.headers().entries() {
        builder = builder.header(name, value);
    }

    let body = match method {
        Method::Post | Method::Put | Method::Patch | Method::Delete => req.bytes().await?,
        _ => Vec::new(),
    };

    builder
        .body(body)
        .map_err(|e| Error::RustError(format!("invalid request: {}", e)))
}

fn into_worker_response(response: HttpResponse) -> Result<Response> {
    let (parts, body) = response.into_parts();

    let headers = Headers::new();
    for (name, value) in transferable_headers(&parts.headers, &Logger::for_request()) {
        headers.append(name, value)?;
    }

    // Null-body statuses such as 204 must not carry a body at all.
    let response = if body.is_empty() {
        Response::empty()?
    } else {
        Response::from_bytes(body)?
    };
    Ok(response
        .with_status(parts.status.as_u16())
        .with_headers(headers))
}

/// Header pairs the Workers `Headers` API can carry. Values that are not
/// visible ASCII are dropped with a warning.
fn transferable_headers<'a>(headers: &'a HeaderMap, logger: &Logger) -> Vec<(&'a str, &'a str)> {
    headers
        .iter()
        .filter_map(|(name, value)| match value.to_str() {
            Ok(value) => Some((name.as_str(), value)),
            Err(_) => {
                logger.warn(
                    "Dropping response header with non-ASCII value",
                    crate::log_data!("header" => name.as_str()),
                );
                None
            }
        })
        .collect()
}
