// crates/sort-verify-providers/src/lib.rs
// ============================================================================
// Module: Sort Verify Providers
// Description: Built-in list fetchers for the Sort Verify engine.
// Purpose: Supply list responses over HTTP or from in-memory fixtures.
// Dependencies: sort-verify-core, reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! This crate ships the [`ListFetcher`](sort_verify_core::ListFetcher)
//! implementations used in practice: [`HttpListFetcher`] for live APIs and
//! [`StaticListFetcher`] for canned responses in tests.
//! Invariants:
//! - HTTP responses are size limited and redirects are never followed.
//! - Unknown fixture routes answer `404` instead of failing the transport.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod fixture;
pub mod http;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use fixture::StaticListFetcher;
pub use fixture::wrap_in_envelope;
pub use http::HttpFetcherConfig;
pub use http::HttpListFetcher;
