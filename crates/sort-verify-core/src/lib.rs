// crates/sort-verify-core/src/lib.rs
// ============================================================================
// Module: Sort Verify Core Library
// Description: Public API surface for the Sort Verify engine.
// Purpose: Expose core types, interfaces, audit sinks, and runtime validators.
// Dependencies: crate::{audit, core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Sort Verify checks that a paginated JSON list API honors its `order_by`
//! contract. It normalizes request-level sort keys to record-level key paths,
//! extracts field values from nested records, and validates monotonicity,
//! null placement, direction reversal, and compound (multi-field) ordering.
//! The engine never fetches data itself; responses are obtained through the
//! [`ListFetcher`] interface.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::SortCheckAuditEvent;
pub use audit::SortCheckAuditEventParams;
pub use audit::StderrAuditSink;
pub use interfaces::AuthContext;
pub use interfaces::FetchError;
pub use interfaces::ListFetcher;
pub use interfaces::ListResponse;
pub use interfaces::SortCheckAuditSink;
pub use runtime::CheckMode;
pub use runtime::CheckOutcome;
pub use runtime::CheckReport;
pub use runtime::EndpointCheck;
pub use runtime::EnvelopeError;
pub use runtime::FieldValue;
pub use runtime::ListEndpoint;
pub use runtime::MultiSortMode;
pub use runtime::SortCheckError;
pub use runtime::SortingVerifier;
pub use runtime::compare_values;
pub use runtime::extract_field;
pub use runtime::extract_results;
pub use runtime::validate_compound;
pub use runtime::validate_monotonic;
pub use runtime::validate_reversal;
