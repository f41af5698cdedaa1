// crates/sort-verify-providers/tests/end_to_end.rs
// ============================================================================
// Module: End-to-End Verification Tests
// Description: Verifier runs against a local HTTP list API.
// Purpose: Ensure the HTTP fetcher and verifier cooperate over the wire.
// Dependencies: sort-verify-providers, sort-verify-core, tiny_http
// ============================================================================

//! ## Overview
//! Serves sorted and unsorted record sets from a `tiny_http` route table and
//! runs [`SortingVerifier`] through [`HttpListFetcher`].

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::collections::BTreeMap;

use serde_json::Value;
use serde_json::json;
use sort_verify_core::AuthContext;
use sort_verify_core::KeyPath;
use sort_verify_core::ListEndpoint;
use sort_verify_core::SortCheckError;
use sort_verify_core::SortingVerifier;
use sort_verify_core::ViolationKind;
use sort_verify_providers::HttpFetcherConfig;
use sort_verify_providers::HttpListFetcher;

use crate::common::spawn_routed_server;

/// Builds `{id, contact: {name}}` records.
fn with_contacts(rows: &[(i64, Option<&str>)]) -> Vec<Value> {
    rows.iter().map(|(id, name)| json!({ "id": id, "contact": { "name": name } })).collect()
}

/// Registers `records` and their reverse under both `order_by` directions.
fn add_sorted(routes: &mut BTreeMap<String, Value>, order_by: &str, records: &[Value]) {
    let reversed: Vec<Value> = records.iter().rev().cloned().collect();
    routes.insert(
        format!("/api/users?order_by={order_by}&per_page=3"),
        json!({ "results": records }),
    );
    routes.insert(
        format!("/api/users?order_by=-{order_by}&per_page=3"),
        json!({ "results": reversed }),
    );
}

/// Creates a fetcher for the local server.
fn fetcher(base_url: String) -> HttpListFetcher {
    HttpListFetcher::new(HttpFetcherConfig {
        base_url: Some(base_url),
        allow_http: true,
        ..HttpFetcherConfig::default()
    })
    .unwrap()
}

/// Returns the endpoint under test.
fn users() -> ListEndpoint {
    ListEndpoint::new("api/users", 3)
        .with_envelope(KeyPath::parse("results").unwrap())
        .with_auth(AuthContext::bearer("e2e"))
}

/// Verifies nested singularized keys pass over HTTP.
#[test]
fn verifier_passes_against_sorted_http_api() {
    let mut routes = BTreeMap::new();
    add_sorted(
        &mut routes,
        "id",
        &with_contacts(&[(1, Some("Chuck")), (2, None), (3, Some("Alex"))]),
    );
    add_sorted(
        &mut routes,
        "contacts.name",
        &with_contacts(&[(2, None), (3, Some("Alex")), (1, Some("Chuck"))]),
    );
    let (base_url, server) = spawn_routed_server(4, routes);

    let verifier = SortingVerifier::new(fetcher(base_url));
    verifier.assert_sorting_works(&users(), &["id", "contacts.name"]).unwrap();

    let requests = server.join().unwrap();
    let urls: Vec<&str> = requests.iter().map(|request| request.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            "/api/users?order_by=id&per_page=3",
            "/api/users?order_by=-id&per_page=3",
            "/api/users?order_by=contacts.name&per_page=3",
            "/api/users?order_by=-contacts.name&per_page=3",
        ]
    );
    assert!(requests.iter().all(|request| request.header("authorization") == Some("Bearer e2e")));
}

/// Verifies an unsorted HTTP list fails with the offending positions.
#[test]
fn verifier_reports_unsorted_http_api() {
    let mut routes = BTreeMap::new();
    add_sorted(&mut routes, "id", &with_contacts(&[(1, None), (3, None), (2, None)]));
    let (base_url, server) = spawn_routed_server(2, routes);

    let verifier = SortingVerifier::new(fetcher(base_url));
    let err = verifier.assert_sorting_works(&users(), &["id"]).unwrap_err();
    let SortCheckError::Sorting {
        order_by,
        violation,
    } = err
    else {
        panic!("expected a sorting violation");
    };
    assert_eq!(order_by, "id");
    assert_eq!(violation.kind, ViolationKind::Ordering);
    assert_eq!(violation.positions, (1, 2));
    assert_eq!(server.join().unwrap().len(), 2);
}

/// Verifies a missing route surfaces as a status failure.
#[test]
fn verifier_reports_missing_http_route() {
    let (base_url, server) = spawn_routed_server(1, BTreeMap::new());
    let verifier = SortingVerifier::new(fetcher(base_url));
    let err = verifier.assert_sorting_works(&users(), &["id"]).unwrap_err();
    assert_eq!(err.failure_kind(), "status");
    server.join().unwrap();
}
