// crates/sort-verify-providers/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Local HTTP servers and record builders for fetcher tests.
// Purpose: Provide deterministic network fixtures without external services.
// Dependencies: serde_json, tiny_http
// ============================================================================

//! ## Overview
//! [`spawn_server`] starts a `tiny_http` server on an ephemeral port that
//! answers a fixed number of requests through a handler closure and hands the
//! observed requests back when joined.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::thread;
use std::thread::JoinHandle;

use serde_json::Value;
use serde_json::json;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Local Server
// ============================================================================

/// Request observed by a local test server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Path and query string.
    pub url: String,
    /// Header name and value pairs as received.
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    /// Returns the first header value matching `name`, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Starts a server answering exactly `requests` requests via `handler`.
///
/// Returns the base URL (with trailing `/`) and a handle yielding the
/// recorded requests once the server has answered them all.
pub fn spawn_server<F>(requests: usize, handler: F) -> (String, JoinHandle<Vec<RecordedRequest>>)
where
    F: Fn(&str) -> (u16, String) + Send + 'static,
{
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for _ in 0 .. requests {
            let Ok(request) = server.recv() else {
                break;
            };
            let url = request.url().to_string();
            let headers = request
                .headers()
                .iter()
                .map(|header| (header.field.as_str().to_string(), header.value.to_string()))
                .collect();
            let (status, body) = handler(&url);
            let response =
                Response::from_string(body).with_status_code(status).with_header(json_header());
            let _ = request.respond(response);
            seen.push(RecordedRequest {
                url,
                headers,
            });
        }
        seen
    });
    (format!("http://{addr}/"), handle)
}

/// Starts a server answering from a fixed route table; unknown paths get 404.
pub fn spawn_routed_server(
    requests: usize,
    routes: BTreeMap<String, Value>,
) -> (String, JoinHandle<Vec<RecordedRequest>>) {
    spawn_server(requests, move |url| match routes.get(url) {
        Some(body) => (200, body.to_string()),
        None => (404, json!({ "message": "not found" }).to_string()),
    })
}

/// Returns a `Content-Type: application/json` header.
fn json_header() -> Header {
    Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap()
}

// ============================================================================
// SECTION: Record Builders
// ============================================================================

/// Builds `{id, name}` records.
#[must_use]
pub fn people(rows: &[(i64, Option<&str>)]) -> Vec<Value> {
    rows.iter().map(|(id, name)| json!({ "id": id, "name": name })).collect()
}
