// crates/sort-verify-core/src/interfaces/mod.rs
// ============================================================================
// Module: Sort Verify Interfaces
// Description: Backend-agnostic interfaces for fetching lists and auditing checks.
// Purpose: Define the contract surfaces the verification facade depends on.
// Dependencies: crate::audit, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The engine verifies data it is handed; it never issues requests itself.
//! [`ListFetcher`] is the seam through which an HTTP client, an in-process
//! router, or a canned fixture supplies list responses. [`SortCheckAuditSink`]
//! receives one structured event per verified field or field combination.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::audit::SortCheckAuditEvent;

// ============================================================================
// SECTION: Auth Context
// ============================================================================

/// Opaque authentication material forwarded to the fetcher with each request.
///
/// The engine never inspects the context; fetchers decide how to apply it.
/// HTTP fetchers send every entry as a request header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Header name to value pairs.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl AuthContext {
    /// Returns an empty context (anonymous requests).
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            headers: BTreeMap::new(),
        }
    }

    /// Returns a context carrying an `Authorization: Bearer` header.
    #[must_use]
    pub fn bearer(token: &str) -> Self {
        Self::anonymous().with_header("Authorization", format!("Bearer {token}"))
    }

    /// Adds or replaces a header entry.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Returns true when no headers are present.
    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        self.headers.is_empty()
    }
}

// ============================================================================
// SECTION: List Fetcher
// ============================================================================

/// Parsed response returned by a [`ListFetcher`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse {
    /// HTTP-style status code.
    pub status: u16,
    /// Parsed JSON body.
    pub body: Value,
}

impl ListResponse {
    /// Creates a `200 OK` response with the given body.
    #[must_use]
    pub const fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body,
        }
    }

    /// Returns true for 2xx status codes.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Fetch collaborator errors.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be built or sent.
    #[error("fetch request error: {0}")]
    Request(String),
    /// The response could not be read or parsed.
    #[error("fetch response error: {0}")]
    Response(String),
    /// The fetcher refused the target by policy.
    #[error("fetch policy error: {0}")]
    Policy(String),
}

/// Backend-agnostic list fetcher.
///
/// Implementations block until the response is complete. Timeouts and
/// transport policy are the fetcher's responsibility; the engine performs no
/// retries.
pub trait ListFetcher {
    /// Fetches `uri` (a path or URL already carrying `order_by` and
    /// `per_page`) with the given auth context.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when no response could be obtained.
    fn fetch(&self, uri: &str, auth: &AuthContext) -> Result<ListResponse, FetchError>;
}

impl<T: ListFetcher + ?Sized> ListFetcher for &T {
    fn fetch(&self, uri: &str, auth: &AuthContext) -> Result<ListResponse, FetchError> {
        (**self).fetch(uri, auth)
    }
}

impl<T: ListFetcher + ?Sized> ListFetcher for Box<T> {
    fn fetch(&self, uri: &str, auth: &AuthContext) -> Result<ListResponse, FetchError> {
        (**self).fetch(uri, auth)
    }
}

// ============================================================================
// SECTION: Audit Sink
// ============================================================================

/// Audit sink for sort check events.
pub trait SortCheckAuditSink: Send + Sync {
    /// Records one check event.
    fn record(&self, event: &SortCheckAuditEvent);
}
