//! tiny_http server adapter
//!
//! Handles routing, body parsing, and response conversion for
//! tiny_http. The server loop blocks the calling thread; the scan
//! workers run on their own pool.

use std::io::Cursor;
#[allow(unused_imports)]
use std::io::Read as _;
use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::api::{self, ApiError, ApiResponse, AppState, WebhookPayload};

/// Bind and serve until the process exits
pub fn serve(bind: &str, state: &Arc<AppState>) -> anyhow::Result<()> {
    let server =
        Server::http(bind).map_err(|e| anyhow::anyhow!("Could not bind to {bind}: {e}"))?;
    log::info!("Listening on http://{bind}");

    for mut request in server.incoming_requests() {
        let response = handle_request(state, &mut request);
        if let Err(e) = request.respond(response) {
            log::warn!("Failed to send response: {e}");
        }
    }
    Ok(())
}

/// Handle one request and return a response
///
/// This is the main routing function mapping URL paths to handlers.
pub fn handle_request(state: &AppState, request: &mut Request) -> Response<Cursor<Vec<u8>>> {
    let path = request.url().to_string();
    let method = request.method().clone();

    // Query strings only matter for the history endpoint
    let (path, query) = path.split_once('?').map_or((path.as_str(), ""), |(p, q)| (p, q));

    // Accept both /api/v1/... (versioned) and /api/... (legacy)
    let api_path = path
        .strip_prefix("/api/v1")
        .or_else(|| path.strip_prefix("/api"))
        .unwrap_or(path);

    match (&method, api_path) {
        // POST /webhook - inbound pull-request events
        (&Method::Post, "/webhook") => match read_json_body::<WebhookPayload>(request) {
            Ok(payload) => handle_result(api::receive_webhook(state, &payload)),
            Err(e) => error_response(&e),
        },

        // GET /dashboard - aggregates across every repository
        (&Method::Get, "/dashboard") => handle_result(api::get_dashboard(state)),

        // GET /licenses - the policy in force
        (&Method::Get, "/licenses") => handle_result(api::list_licenses(state)),

        // License detail: GET /licenses/{spdx}
        _ if method == Method::Get && api_path.starts_with("/licenses/") => {
            let id = api_path.strip_prefix("/licenses/").unwrap_or("");
            handle_result(api::get_license(state, id))
        },

        // Repository dashboard: GET /dashboard/{owner}/{name}
        _ if method == Method::Get && api_path.starts_with("/dashboard/") => {
            let rest = api_path.strip_prefix("/dashboard/").unwrap_or("");
            match rest.split_once('/') {
                Some((owner, name)) if !owner.is_empty() && !name.is_empty() => {
                    handle_result(api::get_repository_dashboard(state, owner, name))
                },
                _ => not_found_response(&format!("API endpoint not found: {method} {api_path}")),
            }
        },

        // Job detail: GET /jobs/{id}
        _ if method == Method::Get && api_path.starts_with("/jobs/") => {
            let id = api_path.strip_prefix("/jobs/").unwrap_or("");
            handle_result(api::get_job(state, id))
        },

        // Result detail: GET /results/{job_id}
        _ if method == Method::Get && api_path.starts_with("/results/") => {
            let id = api_path.strip_prefix("/results/").unwrap_or("");
            handle_result(api::get_result(state, id))
        },

        // History: GET /history/{owner}/{name}?page=N
        _ if method == Method::Get && api_path.starts_with("/history/") => {
            let rest = api_path.strip_prefix("/history/").unwrap_or("");
            match rest.split_once('/') {
                Some((owner, name)) if !owner.is_empty() && !name.is_empty() => {
                    let page = parse_page(query);
                    handle_result(api::get_history(state, owner, name, page))
                },
                _ => not_found_response(&format!("API endpoint not found: {method} {api_path}")),
            }
        },

        // 404 for unknown routes
        _ => not_found_response(&format!("API endpoint not found: {method} {api_path}")),
    }
}

/// Extract `page=N` from a query string, defaulting to 1
fn parse_page(query: &str) -> usize {
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("page="))
        .and_then(|v| v.parse().ok())
        .unwrap_or(1)
}

/// Read and parse JSON body from request
fn read_json_body<T: DeserializeOwned>(request: &mut Request) -> Result<T, ApiError> {
    let mut body = String::new();
    request
        .as_reader()
        .read_to_string(&mut body)
        .map_err(|e| ApiError::bad_request(format!("Failed to read request body: {e}")))?;

    serde_json::from_str(&body).map_err(|e| ApiError::bad_request(format!("Invalid JSON: {e}")))
}

/// Convert a handler result to an HTTP response
fn handle_result<T: Serialize>(result: Result<T, ApiError>) -> Response<Cursor<Vec<u8>>> {
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_response(&e),
    }
}

/// Create a successful JSON response
fn success_response<T: Serialize>(data: T) -> Response<Cursor<Vec<u8>>> {
    let response = ApiResponse::success(data);
    json_response(&response, 200)
}

/// Create an error JSON response with appropriate status code
fn error_response(error: &ApiError) -> Response<Cursor<Vec<u8>>> {
    let response = ApiResponse::<()>::error(error.code.as_str(), &error.message);
    json_response(&response, error.status_code())
}

/// Create a 404 not found response
fn not_found_response(message: &str) -> Response<Cursor<Vec<u8>>> {
    let response = ApiResponse::<()>::error("NOT_FOUND", message);
    json_response(&response, 404)
}

/// Serialize data to a JSON response with status code
fn json_response<T: Serialize>(data: &T, status: u16) -> Response<Cursor<Vec<u8>>> {
    let json = serde_json::to_string(data).unwrap_or_else(|_| r#"{"success":false}"#.to_string());
    Response::from_data(json.into_bytes())
        .with_header(Header::from_bytes("Content-Type", "application/json").unwrap())
        .with_status_code(StatusCode(status))
}
