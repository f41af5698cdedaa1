// crates/sort-verify-core/tests/audit.rs
// ============================================================================
// Module: Audit Sink Tests
// Description: JSON-line audit output for sort checks.
// Purpose: Ensure file sinks append one parseable event per check.
// Dependencies: sort-verify-core, serde_json, tempfile
// ============================================================================
//! ## Overview
//! Validates audit event serialization and the append-only file sink.

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

use std::sync::Arc;

use serde_json::Value;
use sort_verify_core::CheckMode;
use sort_verify_core::CheckOutcome;
use sort_verify_core::FileAuditSink;
use sort_verify_core::SortCheckAuditEvent;
use sort_verify_core::SortCheckAuditEventParams;
use sort_verify_core::SortCheckAuditSink;
use sort_verify_core::SortingVerifier;

use crate::common::RoutedFetcher;
use crate::common::people;
use crate::common::test_endpoint;

/// Verifies the serialized event shape.
#[test]
fn audit_event_serializes_with_stable_labels() {
    let event = SortCheckAuditEvent::new(SortCheckAuditEventParams {
        endpoint: "api/users".to_string(),
        mode: CheckMode::Compound,
        order_by: "id,name".to_string(),
        fields: vec!["id".to_string(), "name".to_string()],
        outcome: CheckOutcome::Fail,
        failure_kind: Some("null_contiguity"),
        message: Some("boom".to_string()),
        record_count: Some(4),
    });
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["event"], "sort_check");
    assert_eq!(value["mode"], "compound");
    assert_eq!(value["outcome"], "fail");
    assert_eq!(value["failure_kind"], "null_contiguity");
    assert_eq!(value["record_count"], 4);
    assert!(value["timestamp_ms"].as_u64().unwrap() > 0);
}

/// Verifies the file sink appends one JSON line per check.
#[test]
fn file_sink_appends_json_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    let sink = Arc::new(FileAuditSink::new(&path).unwrap());

    let endpoint = test_endpoint(2);
    let records = people(&[(Some(1), Some("Alex")), (Some(2), Some("Bill"))]);
    let fetcher = RoutedFetcher::new()
        .sorted(&endpoint, "id", records.clone())
        .sorted(&endpoint, "name", records);
    let verifier = SortingVerifier::new(fetcher).with_audit_sink(sink.clone());
    verifier.assert_sorting_works(&endpoint, &["id", "name"]).unwrap();
    verifier.assert_sorting_works(&endpoint, &["missing_routes"]).unwrap_err();

    let contents = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<Value> =
        contents.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["order_by"], "id");
    assert_eq!(lines[1]["order_by"], "name");
    assert_eq!(lines[2]["outcome"], "fail");
    assert_eq!(lines[2]["failure_kind"], "status");
    assert!(lines[2]["record_count"].is_null());

    let reopened = FileAuditSink::new(&path).unwrap();
    reopened.record(&SortCheckAuditEvent::new(SortCheckAuditEventParams {
        endpoint: "api/users".to_string(),
        mode: CheckMode::Single,
        order_by: "id".to_string(),
        fields: vec!["id".to_string()],
        outcome: CheckOutcome::Pass,
        failure_kind: None,
        message: None,
        record_count: Some(2),
    }));
    assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 4);
}
