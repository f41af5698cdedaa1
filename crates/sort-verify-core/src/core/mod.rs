// crates/sort-verify-core/src/core/mod.rs
// ============================================================================
// Module: Sort Verify Core Types
// Description: Key paths, sort specifications, inflection, and violations.
// Purpose: Provide stable value types shared by validators and the facade.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Core types describe what is being verified: which field (a [`KeyPath`]),
//! in which direction (a [`SortSpec`]), how request-level keys map to
//! record-level keys (a [`Singularizer`]), and how failures are reported
//! ([`SortingViolation`], [`ReversalMismatch`]). All types are immutable
//! values constructed per verification call.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod inflection;
pub mod key_path;
pub mod sort_spec;
pub mod violation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use inflection::EnglishSingularizer;
pub use inflection::IdentitySingularizer;
pub use inflection::PathNormalizer;
pub use inflection::Singularizer;
pub use key_path::KeyPath;
pub use key_path::KeyPathError;
pub use sort_spec::SortDirection;
pub use sort_spec::SortKey;
pub use sort_spec::SortSpec;
pub use sort_spec::SortSpecError;
pub use violation::ObservedValue;
pub use violation::ReversalMismatch;
pub use violation::SortingViolation;
pub use violation::ViolationKind;
