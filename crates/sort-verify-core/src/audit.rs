// crates/sort-verify-core/src/audit.rs
// ============================================================================
// Module: Sort Verify Audit Logging
// Description: Structured audit events for sort verification checks.
// Purpose: Emit JSON-line check records without hard logging dependencies.
// Dependencies: crate::{interfaces, runtime}, serde, serde_json
// ============================================================================

//! ## Overview
//! Every verified field (single sort) or field combination (compound sort)
//! produces one [`SortCheckAuditEvent`], whether it passed or failed. Sinks
//! serialize events as JSON lines so test runs can be correlated with the
//! requests that produced them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::interfaces::SortCheckAuditSink;
use crate::runtime::CheckMode;
use crate::runtime::CheckOutcome;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Sort check audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct SortCheckAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Endpoint path under test.
    pub endpoint: String,
    /// Single or compound check.
    pub mode: CheckMode,
    /// Ascending `order_by` value that was requested.
    pub order_by: String,
    /// Record-level field paths that were validated.
    pub fields: Vec<String>,
    /// Check outcome.
    pub outcome: CheckOutcome,
    /// Normalized failure label when the check failed.
    pub failure_kind: Option<&'static str>,
    /// Failure message when the check failed.
    pub message: Option<String>,
    /// Number of records in the ascending response, when one was parsed.
    pub record_count: Option<usize>,
}

/// Inputs required to construct a sort check audit event.
pub struct SortCheckAuditEventParams {
    /// Endpoint path under test.
    pub endpoint: String,
    /// Single or compound check.
    pub mode: CheckMode,
    /// Ascending `order_by` value that was requested.
    pub order_by: String,
    /// Record-level field paths that were validated.
    pub fields: Vec<String>,
    /// Check outcome.
    pub outcome: CheckOutcome,
    /// Normalized failure label when the check failed.
    pub failure_kind: Option<&'static str>,
    /// Failure message when the check failed.
    pub message: Option<String>,
    /// Number of records in the ascending response.
    pub record_count: Option<usize>,
}

impl SortCheckAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: SortCheckAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "sort_check",
            timestamp_ms,
            endpoint: params.endpoint,
            mode: params.mode,
            order_by: params.order_by,
            fields: params.fields,
            outcome: params.outcome,
            failure_kind: params.failure_kind,
            message: params.message,
            record_count: params.record_count,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl SortCheckAuditSink for StderrAuditSink {
    fn record(&self, event: &SortCheckAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl SortCheckAuditSink for FileAuditSink {
    fn record(&self, event: &SortCheckAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl SortCheckAuditSink for NoopAuditSink {
    fn record(&self, _event: &SortCheckAuditEvent) {}
}
