// crates/sort-verify-core/src/runtime/mod.rs
// ============================================================================
// Module: Sort Verify Runtime
// Description: Validators and the verification facade.
// Purpose: Check fetched list responses against sort contracts.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Leaves first: value extraction, the ordering comparator, the monotonic,
//! reversal and compound validators, then the [`SortingVerifier`] facade and
//! the suite runner built on top of it. Every validator is a pure function
//! over borrowed JSON records.

pub mod comparator;
pub mod compound;
pub mod extract;
pub mod monotonic;
pub mod reversal;
pub mod suite;
pub mod verifier;

pub use comparator::compare_values;
pub use comparator::is_in_order;
pub use comparator::numeric_value;
pub use compound::group_runs;
pub use compound::validate_compound;
pub use extract::EnvelopeError;
pub use extract::FieldValue;
pub use extract::extract_field;
pub use extract::extract_results;
pub use extract::pluck;
pub use monotonic::validate_monotonic;
pub use reversal::validate_reversal;
pub use suite::CheckReport;
pub use suite::EndpointCheck;
pub use suite::MultiSortMode;
pub use verifier::CheckMode;
pub use verifier::CheckOutcome;
pub use verifier::ListEndpoint;
pub use verifier::SortCheckError;
pub use verifier::SortingVerifier;
