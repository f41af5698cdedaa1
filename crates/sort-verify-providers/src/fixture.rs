// crates/sort-verify-providers/src/fixture.rs
// ============================================================================
// Module: Static List Fetcher
// Description: In-memory route table implementing the list fetcher interface.
// Purpose: Serve canned list responses for tests and offline verification.
// Dependencies: sort-verify-core, serde_json
// ============================================================================

//! ## Overview
//! [`StaticListFetcher`] maps exact request URIs to prepared responses. It is
//! the offline counterpart of [`HttpListFetcher`](crate::HttpListFetcher):
//! build the routes a list API would answer, then point a verifier at it.
//! Unknown URIs answer `404`, and routes can demand auth headers so that
//! credential forwarding is exercised too.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Map;
use serde_json::Value;
use serde_json::json;
use sort_verify_core::AuthContext;
use sort_verify_core::FetchError;
use sort_verify_core::KeyPath;
use sort_verify_core::ListEndpoint;
use sort_verify_core::ListFetcher;
use sort_verify_core::ListResponse;
use sort_verify_core::SortSpec;

// ============================================================================
// SECTION: Static Fetcher
// ============================================================================

/// Route-table list fetcher.
#[derive(Debug, Clone, Default)]
pub struct StaticListFetcher {
    /// Exact URI to response table.
    routes: BTreeMap<String, ListResponse>,
    /// Headers every request must carry; `None` disables the check.
    required_auth: Option<AuthContext>,
}

impl StaticListFetcher {
    /// Creates an empty fetcher; every request answers `404`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the response for `uri`.
    #[must_use]
    pub fn with_route(mut self, uri: impl Into<String>, response: ListResponse) -> Self {
        self.routes.insert(uri.into(), response);
        self
    }

    /// Requires every request to carry the given headers, answering `401`
    /// otherwise.
    #[must_use]
    pub fn require_auth(mut self, auth: AuthContext) -> Self {
        self.required_auth = Some(auth);
        self
    }

    /// Serves `records` for `order_by` and their reverse for the flipped
    /// order, both wrapped in the endpoint's envelope.
    ///
    /// `records` must already be in the order the API would return for the
    /// ascending request.
    #[must_use]
    pub fn sorted_fixture(
        self,
        endpoint: &ListEndpoint,
        order_by: &SortSpec,
        records: Vec<Value>,
    ) -> Self {
        let mut reversed = records.clone();
        reversed.reverse();
        let envelope = endpoint.envelope_key.as_ref();
        self.with_route(
            endpoint.request_uri(order_by),
            ListResponse::ok(wrap_in_envelope(records, envelope)),
        )
        .with_route(
            endpoint.request_uri(&order_by.flipped()),
            ListResponse::ok(wrap_in_envelope(reversed, envelope)),
        )
    }

    /// Returns the number of configured routes.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Returns true when `auth` carries every required header.
    fn authorized(&self, auth: &AuthContext) -> bool {
        self.required_auth.as_ref().is_none_or(|required| {
            required.headers.iter().all(|(name, value)| {
                auth.headers.iter().any(|(sent, sent_value)| {
                    sent.eq_ignore_ascii_case(name) && sent_value == value
                })
            })
        })
    }
}

impl ListFetcher for StaticListFetcher {
    fn fetch(&self, uri: &str, auth: &AuthContext) -> Result<ListResponse, FetchError> {
        if !self.authorized(auth) {
            return Ok(ListResponse {
                status: 401,
                body: json!({ "message": "unauthenticated" }),
            });
        }
        Ok(self.routes.get(uri).cloned().unwrap_or_else(|| ListResponse {
            status: 404,
            body: json!({ "message": format!("no route for {uri}") }),
        }))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Nests `records` under each envelope segment; a bare array without one.
#[must_use]
pub fn wrap_in_envelope(records: Vec<Value>, envelope: Option<&KeyPath>) -> Value {
    let Some(envelope) = envelope else {
        return Value::Array(records);
    };
    envelope.segments().iter().rev().fold(Value::Array(records), |inner, segment| {
        let mut object = Map::new();
        object.insert(segment.clone(), inner);
        Value::Object(object)
    })
}
