//! # Request Routing and Dispatch
//!
//! This module handles HTTP request routing for the log hosting service.
//! Everything is served from the root path; the handler is picked from the
//! HTTP method and whether an `id` query parameter is present.
//!
//! ## Supported Routes
//!
//! - `OPTIONS *` - CORS preflight
//! - `GET /` - Upload form
//! - `GET /?id=<uuid>` - Download a log
//! - `POST /[?name=<file>]` - Upload a log
//! - `DELETE /?id=<uuid>` - Delete a log (admin token required)
//!
//! Other paths answer 404, other methods on `/` answer 405.

use http::Method;

use crate::config::Config;
use crate::constants::QUERY_ID;
use crate::errors::{AppError, AppResult};
use crate::handlers::{
    delete_log, download_log, method_not_allowed, request_url, upload_form, upload_log,
};
use crate::logging::Logger;
use crate::middleware::CorsMiddleware;
use crate::models::{HttpRequest, HttpResponse};
use crate::storage::LogStore;
use crate::utils::has_query_param;

/// Handles an incoming HTTP request and routes it to the matching handler.
///
/// Never fails: handler errors are logged and rendered as their fixed
/// status code with a short text body. Every response carries CORS headers.
///
/// # Example Request Flow
///
/// ```text
/// POST /?name=boot.log
/// ↓
/// handle_request()
/// ↓
/// upload_log() → LogStore::put
/// ↓
/// 201 Created, Location: https://host/?id=<uuid>
/// ```
pub async fn handle_request(
    req: HttpRequest,
    store: &dyn LogStore,
    config: &Config,
) -> HttpResponse {
    let logger = Logger::for_request();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    logger.info(
        "Routing request",
        crate::log_data!("method" => method.as_str(), "path" => path),
    );

    if method == Method::OPTIONS {
        return CorsMiddleware::handle_preflight();
    }

    let response = match dispatch(req, store, config, &logger).await {
        Ok(response) => response,
        Err(error) => {
            let data = crate::log_data!(
                "code" => error.code(),
                "status" => error.status_code().as_u16(),
                "error" => error.to_string()
            );
            if error.is_server_error() {
                logger.error("Request failed", data);
            } else {
                logger.warn("Request rejected", data);
            }
            error.into_response()
        }
    };

    logger.info(
        "Request completed",
        crate::log_data!("status" => response.status().as_u16()),
    );
    CorsMiddleware::apply_headers(response)
}

async fn dispatch(
    req: HttpRequest,
    store: &dyn LogStore,
    config: &Config,
    logger: &Logger,
) -> AppResult<HttpResponse> {
    if req.uri().path() != "/" {
        return Err(AppError::NotFound);
    }
    let has_id = has_query_param(&request_url(&req)?, QUERY_ID);
    let method = req.method().clone();

    match method {
        Method::GET if has_id => download_log(&req, store, logger).await,
        Method::GET => upload_form(config),
        Method::POST => upload_log(req, store, config, logger).await,
        Method::DELETE => delete_log(&req, store, config, logger).await,
        _ => Ok(method_not_allowed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::tests::{multipart_body, multipart_content_type};
    use crate::models::LogMetadata;
    use crate::storage::MemoryLogStore;
    use crate::utils::{http_date, is_valid_log_id, query_param};
    use chrono::{DateTime, Duration, Utc};
    use futures::executor::block_on;
    use http::header::{
        ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW, CONTENT_DISPOSITION, CONTENT_TYPE, EXPIRES,
        LAST_MODIFIED, LOCATION,
    };
    use http::StatusCode;
    use worker::Url;

    const BASE: &str = "https://logs.example.com/";
    const TOKEN: &str = "s3cret";

    fn config() -> Config {
        Config {
            max_file_size: 16,
            expiration_ttl: 3600,
            admin_token: Some(TOKEN.to_string()),
            ..Config::default()
        }
    }

    fn request(method: Method, uri: &str, headers: &[(&str, &str)], body: &[u8]) -> HttpRequest {
        let mut builder = http::Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(body.to_vec()).unwrap()
    }

    fn send(store: &MemoryLogStore, req: HttpRequest) -> HttpResponse {
        block_on(handle_request(req, store, &config()))
    }

    fn upload_text(store: &MemoryLogStore, query: &str, body: &[u8]) -> HttpResponse {
        send(
            store,
            request(
                Method::POST,
                &format!("{BASE}{query}"),
                &[("content-type", "text/plain")],
                body,
            ),
        )
    }

    fn location_id(response: &HttpResponse) -> String {
        let location = response.headers()[LOCATION].to_str().unwrap();
        let url = Url::parse(location).unwrap();
        query_param(&url, "id").unwrap()
    }

    fn get(store: &MemoryLogStore, id: &str) -> HttpResponse {
        send(store, request(Method::GET, &format!("{BASE}?id={id}"), &[], b""))
    }

    fn delete(store: &MemoryLogStore, id: &str, auth: Option<&str>) -> HttpResponse {
        let headers: Vec<(&str, &str)> = auth.map(|a| ("authorization", a)).into_iter().collect();
        send(
            store,
            request(Method::DELETE, &format!("{BASE}?id={id}"), &headers, b""),
        )
    }

    #[test]
    fn text_upload_round_trips_with_name() {
        let store = MemoryLogStore::new();
        let response = upload_text(&store, "?name=test.log", b"hello");
        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response.body().is_empty());

        let location = response.headers()[LOCATION].to_str().unwrap().to_string();
        let id = location_id(&response);
        assert!(is_valid_log_id(&id));
        assert_eq!(location, format!("{BASE}?id={id}"));

        let download = send(&store, request(Method::GET, &location, &[], b""));
        assert_eq!(download.status(), StatusCode::OK);
        assert_eq!(
            download.headers()[CONTENT_DISPOSITION],
            "attachment; filename=\"test.log\""
        );
        assert!(download.headers()[CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
        let uploaded_at =
            DateTime::parse_from_rfc2822(download.headers()[LAST_MODIFIED].to_str().unwrap())
                .unwrap()
                .with_timezone(&Utc);
        assert_eq!(
            response.headers()[EXPIRES].to_str().unwrap(),
            http_date(&(uploaded_at + Duration::seconds(3600)))
        );
        assert_eq!(download.into_body(), b"hello".to_vec());
    }

    #[test]
    fn multipart_upload_round_trips() {
        let store = MemoryLogStore::new();
        let content_type = multipart_content_type();
        let response = send(
            &store,
            request(
                Method::POST,
                BASE,
                &[("content-type", content_type.as_str())],
                &multipart_body("file", "a.log", Some("text/plain"), "line 1\nline 2"),
            ),
        );
        assert_eq!(response.status(), StatusCode::CREATED);

        let download = get(&store, &location_id(&response));
        assert_eq!(download.status(), StatusCode::OK);
        assert_eq!(download.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
        assert!(download.headers()[CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("a.log"));
        assert_eq!(download.into_body(), b"line 1\nline 2".to_vec());
    }

    #[test]
    fn binary_upload_keeps_bytes_and_type() {
        let store = MemoryLogStore::new();
        let bytes = [0u8, 255, 1, 254, 0];
        let response = send(
            &store,
            request(
                Method::POST,
                &format!("{BASE}?name=core.dmp"),
                &[("content-type", "application/octet-stream")],
                &bytes,
            ),
        );
        assert_eq!(response.status(), StatusCode::CREATED);

        let download = get(&store, &location_id(&response));
        assert_eq!(download.headers()[CONTENT_TYPE], "application/octet-stream");
        assert_eq!(download.into_body(), bytes.to_vec());
    }

    #[test]
    fn unnamed_upload_is_named_after_its_id() {
        let store = MemoryLogStore::new();
        let response = upload_text(&store, "", b"hello");
        let id = location_id(&response);
        let download = get(&store, &id);
        assert_eq!(
            download.headers()[CONTENT_DISPOSITION].to_str().unwrap(),
            format!("attachment; filename=\"{id}.txt\"")
        );
    }

    #[test]
    fn oversized_upload_is_rejected_and_not_stored() {
        let store = MemoryLogStore::new();
        let response = upload_text(&store, "?name=big.log", &[b'x'; 17]);
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(store.is_empty());

        let at_limit = upload_text(&store, "?name=ok.log", &[b'x'; 16]);
        assert_eq!(at_limit.status(), StatusCode::CREATED);
    }

    #[test]
    fn upload_failures_map_to_fixed_statuses() {
        let store = MemoryLogStore::new();

        let json = send(
            &store,
            request(Method::POST, BASE, &[("content-type", "application/json")], b"{}"),
        );
        assert_eq!(json.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let untyped = send(&store, request(Method::POST, BASE, &[], b"hello"));
        assert_eq!(untyped.status(), StatusCode::BAD_REQUEST);
        assert_eq!(untyped.into_body(), b"Missing Content-Type header".to_vec());

        let empty = upload_text(&store, "?name=a.log", b"");
        assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

        let bad_name = upload_text(&store, "?name=payload.exe", b"hello");
        assert_eq!(bad_name.status(), StatusCode::BAD_REQUEST);

        let long_name = format!("?name={}.log", "a".repeat(1000));
        let too_long = upload_text(&store, &long_name, b"hello");
        assert_eq!(too_long.status(), StatusCode::BAD_REQUEST);

        assert!(store.is_empty());
    }

    #[test]
    fn browsers_get_a_confirmation_page() {
        let store = MemoryLogStore::new();
        let response = send(
            &store,
            request(
                Method::POST,
                &format!("{BASE}?name=test.log"),
                &[
                    ("content-type", "text/plain"),
                    ("accept", "text/html,application/xhtml+xml,*/*;q=0.8"),
                ],
                b"hello",
            ),
        );
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        let id = location_id(&response);
        let html = String::from_utf8(response.into_body()).unwrap();
        assert!(html.contains(&id));
        assert!(html.contains("test.log"));
    }

    #[test]
    fn machine_clients_get_created() {
        let store = MemoryLogStore::new();
        let response = send(
            &store,
            request(
                Method::POST,
                BASE,
                &[("content-type", "text/plain"), ("accept", "*/*")],
                b"hello",
            ),
        );
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[test]
    fn download_rejects_missing_malformed_and_unknown_ids() {
        let store = MemoryLogStore::new();

        let missing = send(&store, request(Method::GET, &format!("{BASE}?id="), &[], b""));
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

        let malformed = get(&store, "../../etc/passwd");
        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);

        let unknown = get(&store, "550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
        assert_eq!(unknown.into_body(), b"Not found".to_vec());
    }

    #[test]
    fn expired_logs_are_not_found() {
        let store = MemoryLogStore::new();
        let id = location_id(&upload_text(&store, "?name=a.log", b"hello"));
        store.advance(Duration::seconds(3599));
        assert_eq!(get(&store, &id).status(), StatusCode::OK);
        store.advance(Duration::seconds(2));
        assert_eq!(get(&store, &id).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn legacy_records_without_metadata_still_download() {
        let store = MemoryLogStore::new();
        let id = "550e8400-e29b-41d4-a716-446655440000";
        block_on(store.put(id, b"old", 60, &LogMetadata::default())).unwrap();

        let download = get(&store, id);
        assert_eq!(download.status(), StatusCode::OK);
        assert_eq!(download.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(
            download.headers()[CONTENT_DISPOSITION].to_str().unwrap(),
            format!("attachment; filename=\"{id}.txt\"")
        );
    }

    #[test]
    fn delete_requires_the_admin_token() {
        let store = MemoryLogStore::new();
        let id = location_id(&upload_text(&store, "?name=a.log", b"hello"));

        assert_eq!(delete(&store, &id, None).status(), StatusCode::FORBIDDEN);
        assert_eq!(
            delete(&store, &id, Some("Bearer wrong")).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(get(&store, &id).status(), StatusCode::OK);

        let deleted = delete(&store, &id, Some("Bearer s3cret"));
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
        assert!(deleted.body().is_empty());
        assert_eq!(get(&store, &id).status(), StatusCode::NOT_FOUND);

        let again = delete(&store, &id, Some("Bearer s3cret"));
        assert_eq!(again.status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn delete_validates_the_id_first() {
        let store = MemoryLogStore::new();
        let missing = send(
            &store,
            request(Method::DELETE, BASE, &[("authorization", "Bearer s3cret")], b""),
        );
        assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            delete(&store, "nope", Some("Bearer s3cret")).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn storage_failures_are_internal_errors() {
        let store = MemoryLogStore::new();
        let id = location_id(&upload_text(&store, "?name=a.log", b"hello"));
        store.fail_writes(true);

        let upload = upload_text(&store, "?name=b.log", b"hello");
        assert_eq!(upload.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(upload.into_body(), b"Internal Server Error".to_vec());

        let failed_delete = delete(&store, &id, Some("Bearer s3cret"));
        assert_eq!(failed_delete.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(get(&store, &id).status(), StatusCode::OK);
    }

    #[test]
    fn root_get_serves_upload_form() {
        let store = MemoryLogStore::new();
        let response = send(&store, request(Method::GET, BASE, &[], b""));
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));
        let html = String::from_utf8(response.into_body()).unwrap();
        assert!(html.contains("<form"));
    }

    #[test]
    fn preflight_and_fallbacks() {
        let store = MemoryLogStore::new();

        let options = send(&store, request(Method::OPTIONS, BASE, &[], b""));
        assert_eq!(options.status(), StatusCode::NO_CONTENT);
        assert!(options
            .headers()
            .get("access-control-allow-methods")
            .unwrap()
            .to_str()
            .unwrap()
            .contains("DELETE"));

        let other_path = send(
            &store,
            request(Method::GET, "https://logs.example.com/admin", &[], b""),
        );
        assert_eq!(other_path.status(), StatusCode::NOT_FOUND);

        let put = send(&store, request(Method::PUT, BASE, &[], b"x"));
        assert_eq!(put.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(put.headers()[ALLOW], "GET, POST, DELETE, OPTIONS");
    }

    #[test]
    fn every_response_carries_cors_headers() {
        let store = MemoryLogStore::new();
        let ok = upload_text(&store, "?name=a.log", b"hello");
        let err = get(&store, "bad");
        for response in [ok, err] {
            assert_eq!(response.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        }
    }
}
