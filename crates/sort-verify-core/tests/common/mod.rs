// crates/sort-verify-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared fetch doubles, audit capture, and record builders.
// Purpose: Provide reusable infrastructure for deterministic verifier tests.
// Dependencies: sort-verify-core, serde_json
// ============================================================================

//! ## Overview
//! [`RoutedFetcher`] answers requests from an in-memory route table and
//! remembers every URI it was asked for. [`CapturingAuditSink`] keeps every
//! audit event so tests can assert on emitted records.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde_json::Value;
use serde_json::json;
use sort_verify_core::AuthContext;
use sort_verify_core::FetchError;
use sort_verify_core::ListEndpoint;
use sort_verify_core::ListFetcher;
use sort_verify_core::ListResponse;
use sort_verify_core::SortCheckAuditEvent;
use sort_verify_core::SortCheckAuditSink;
use sort_verify_core::SortSpec;

// ============================================================================
// SECTION: Fetch Double
// ============================================================================

/// Route-table fetcher that records requested URIs and auth contexts.
#[derive(Default)]
pub struct RoutedFetcher {
    /// URI to response table.
    routes: BTreeMap<String, ListResponse>,
    /// URIs that must fail at the transport level.
    failing: BTreeMap<String, String>,
    /// Requests observed, in order.
    requests: Mutex<Vec<(String, AuthContext)>>,
}

impl RoutedFetcher {
    /// Creates an empty fetcher; every request answers 404.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a route.
    #[must_use]
    pub fn route(mut self, uri: impl Into<String>, response: ListResponse) -> Self {
        self.routes.insert(uri.into(), response);
        self
    }

    /// Adds a route that fails with a transport error.
    #[must_use]
    pub fn failing(mut self, uri: impl Into<String>, message: impl Into<String>) -> Self {
        self.failing.insert(uri.into(), message.into());
        self
    }

    /// Serves `records` under `order_by` and their reverse under its flipped form.
    ///
    /// Records are wrapped in a `results` envelope.
    #[must_use]
    pub fn sorted(self, endpoint: &ListEndpoint, order_by: &str, records: Vec<Value>) -> Self {
        let spec = SortSpec::parse(order_by).unwrap();
        let mut reversed = records.clone();
        reversed.reverse();
        self.route(endpoint.request_uri(&spec), ListResponse::ok(json!({ "results": records })))
            .route(
                endpoint.request_uri(&spec.flipped()),
                ListResponse::ok(json!({ "results": reversed })),
            )
    }

    /// Returns the requested URIs in order.
    #[must_use]
    pub fn requested_uris(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().map(|(uri, _)| uri.clone()).collect()
    }

    /// Returns the auth contexts sent with each request.
    #[must_use]
    pub fn requested_auth(&self) -> Vec<AuthContext> {
        self.requests.lock().unwrap().iter().map(|(_, auth)| auth.clone()).collect()
    }
}

impl ListFetcher for RoutedFetcher {
    fn fetch(&self, uri: &str, auth: &AuthContext) -> Result<ListResponse, FetchError> {
        self.requests.lock().unwrap().push((uri.to_string(), auth.clone()));
        if let Some(message) = self.failing.get(uri) {
            return Err(FetchError::Request(message.clone()));
        }
        Ok(self.routes.get(uri).cloned().unwrap_or(ListResponse {
            status: 404,
            body: json!({ "message": "not found" }),
        }))
    }
}

// ============================================================================
// SECTION: Audit Capture
// ============================================================================

/// Audit sink that stores events in memory.
#[derive(Default)]
pub struct CapturingAuditSink {
    /// Captured events.
    events: Mutex<Vec<SortCheckAuditEvent>>,
}

impl CapturingAuditSink {
    /// Returns a snapshot of captured events.
    #[must_use]
    pub fn events(&self) -> Vec<SortCheckAuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl SortCheckAuditSink for CapturingAuditSink {
    fn record(&self, event: &SortCheckAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

// ============================================================================
// SECTION: Record Builders
// ============================================================================

/// Default endpoint used by verifier tests: `api/test-order-by`, `results` envelope.
#[must_use]
pub fn test_endpoint(expected_count: usize) -> ListEndpoint {
    ListEndpoint::new("api/test-order-by", expected_count)
        .with_envelope(sort_verify_core::KeyPath::parse("results").unwrap())
}

/// Builds `{id, name}` records; `None` becomes JSON `null`.
#[must_use]
pub fn people(rows: &[(Option<i64>, Option<&str>)]) -> Vec<Value> {
    rows.iter().map(|(id, name)| json!({ "id": id, "name": name })).collect()
}

/// Builds `{id, contact: {name}}` records.
#[must_use]
pub fn contacts(rows: &[(i64, Option<&str>)]) -> Vec<Value> {
    rows.iter().map(|(id, name)| json!({ "id": id, "contact": { "name": name } })).collect()
}

/// Builds records holding a single `value` field.
#[must_use]
pub fn values(items: &[Value]) -> Vec<Value> {
    items.iter().map(|value| json!({ "value": value })).collect()
}
