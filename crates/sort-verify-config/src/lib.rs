// crates/sort-verify-config/src/lib.rs
// ============================================================================
// Module: Sort Verify Config Library
// Description: Config model and validation for sort verification runs.
// Purpose: Single source of truth for sort-verify.toml semantics.
// Dependencies: sort-verify-core, sort-verify-providers, serde, toml
// ============================================================================

//! ## Overview
//! `sort-verify-config` loads `sort-verify.toml`, validates it strictly, and
//! turns it into the runtime pieces a verification run needs: an HTTP
//! fetcher, an auth context, an audit sink, and one
//! [`EndpointCheck`](sort_verify_core::EndpointCheck) per configured endpoint.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
