// crates/sort-verify-core/src/core/violation.rs
// ============================================================================
// Module: Sort Verify Violations
// Description: Structured failures raised by the sequence validators.
// Purpose: Pinpoint the offending field, positions, and values of a failure.
// Dependencies: crate::core::{key_path, sort_spec}, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Validators never return a bare boolean. A failed check produces either a
//! [`SortingViolation`] (ordering or null placement within one result set)
//! or a [`ReversalMismatch`] (ascending and descending sets disagree). Both
//! carry enough context to locate the problem without re-running the check.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::key_path::KeyPath;
use crate::core::sort_spec::SortDirection;

// ============================================================================
// SECTION: Observed Values
// ============================================================================

/// Owned snapshot of a field value as observed in a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum ObservedValue {
    /// The path did not resolve inside the record.
    Absent,
    /// The path resolved to an explicit JSON `null`.
    Null,
    /// The path resolved to a value.
    Present(Value),
}

impl ObservedValue {
    /// Returns true when the value can take part in ordering comparisons.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }
}

impl fmt::Display for ObservedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("<absent>"),
            Self::Null => f.write_str("null"),
            Self::Present(value) => write!(f, "{value}"),
        }
    }
}

// ============================================================================
// SECTION: Sorting Violation
// ============================================================================

/// Cause of a [`SortingViolation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Two adjacent present values are out of order.
    Ordering,
    /// Null or absent values split the run of present values.
    NullContiguity,
}

impl ViolationKind {
    /// Returns a stable label for audit events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ordering => "ordering",
            Self::NullContiguity => "null_contiguity",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A result set is not monotonic for a field, or its nulls are interleaved.
///
/// # Invariants
/// - `positions.0 < positions.1`, both indexes into the full result set.
/// - `values` are the observed values at `positions`.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error(
    "{kind} violation on `{path}` ({direction}) between positions {} and {}: {} then {}",
    .positions.0,
    .positions.1,
    .values.0,
    .values.1
)]
pub struct SortingViolation {
    /// Cause of the violation.
    pub kind: ViolationKind,
    /// Record-level field path that was checked.
    pub path: KeyPath,
    /// Direction the sequence was expected to follow.
    pub direction: SortDirection,
    /// Offending positions in the result set.
    pub positions: (usize, usize),
    /// Values observed at the offending positions.
    pub values: (ObservedValue, ObservedValue),
}

// ============================================================================
// SECTION: Reversal Mismatch
// ============================================================================

/// The descending result set is not the exact reverse of the ascending one.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error(
    "reversal mismatch on `{path}` at position {position}: expected {expected}, found {actual}"
)]
pub struct ReversalMismatch {
    /// Record-level field path that was compared.
    pub path: KeyPath,
    /// First mismatching position in the descending result set.
    pub position: usize,
    /// Value expected from the reversed ascending set.
    pub expected: ObservedValue,
    /// Value observed in the descending set.
    pub actual: ObservedValue,
}
