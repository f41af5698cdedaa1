// crates/sort-verify-core/src/runtime/reversal.rs
// ============================================================================
// Module: Sort Verify Reversal Validator
// Description: Ascending versus descending consistency check.
// Purpose: Ensure flipping the sort direction reverses the result set.
// Dependencies: crate::core, crate::runtime::{comparator, extract}
// ============================================================================

//! ## Overview
//! The descending result set must be the exact element-wise reverse of the
//! ascending one, compared by field value. Null and absent values are
//! interchangeable here; present values match when the comparator reports
//! them equal, so `"10"` and `10` are the same value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;

use serde_json::Value;

use crate::core::KeyPath;
use crate::core::ObservedValue;
use crate::core::ReversalMismatch;
use crate::runtime::comparator::compare_values;
use crate::runtime::extract::FieldValue;
use crate::runtime::extract::pluck;

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Validates that `descending` is the reverse of `ascending` at `path`.
///
/// # Errors
///
/// Returns [`ReversalMismatch`] at the first differing position of the
/// descending set. When the sets differ in length and agree on their common
/// prefix, the mismatch is reported one past the shorter side with the
/// missing value observed as absent.
pub fn validate_reversal(
    ascending: &[Value],
    descending: &[Value],
    path: &KeyPath,
) -> Result<(), ReversalMismatch> {
    let mut expected = pluck(ascending, path);
    expected.reverse();
    let actual = pluck(descending, path);

    for (position, (want, got)) in expected.iter().zip(&actual).enumerate() {
        if !values_match(*want, *got) {
            return Err(mismatch(path, position, want.to_observed(), got.to_observed()));
        }
    }
    if expected.len() == actual.len() {
        return Ok(());
    }
    let position = expected.len().min(actual.len());
    let observe = |values: &[FieldValue<'_>]| {
        values.get(position).map_or(ObservedValue::Absent, |value| value.to_observed())
    };
    Err(mismatch(path, position, observe(&expected), observe(&actual)))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when two plucked values are equal for reversal purposes.
fn values_match(left: FieldValue<'_>, right: FieldValue<'_>) -> bool {
    match (left.as_present(), right.as_present()) {
        (None, None) => true,
        (Some(left), Some(right)) => compare_values(left, right) == Ordering::Equal,
        _ => false,
    }
}

/// Builds a mismatch record.
fn mismatch(
    path: &KeyPath,
    position: usize,
    expected: ObservedValue,
    actual: ObservedValue,
) -> ReversalMismatch {
    ReversalMismatch {
        path: path.clone(),
        position,
        expected,
        actual,
    }
}
