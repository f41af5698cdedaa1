// crates/sort-verify-core/src/runtime/monotonic.rs
// ============================================================================
// Module: Sort Verify Monotonic Validator
// Description: Ordering and null-placement checks over one result set.
// Purpose: Reject result sets that are not sorted by a single field.
// Dependencies: crate::core, crate::runtime::{comparator, extract}
// ============================================================================

//! ## Overview
//! A result set sorted by a field keeps its null (or absent) values together
//! at one end and orders the remaining values monotonically. Contiguity is
//! checked first. Ordering is then checked for every pair inside the present
//! block, not only neighbours: mixed numeric and text values do not compare
//! transitively, so adjacent steps alone can hide an inversion.
//!
//! Security posture: inputs are untrusted response bodies; validation is a
//! pure walk and never panics on malformed records.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::core::KeyPath;
use crate::core::SortDirection;
use crate::core::SortingViolation;
use crate::core::ViolationKind;
use crate::runtime::comparator::is_in_order;
use crate::runtime::extract::FieldValue;
use crate::runtime::extract::pluck;

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Validates that `records` are sorted by `path` in `direction`.
///
/// # Errors
///
/// Returns [`SortingViolation`] with kind [`ViolationKind::NullContiguity`]
/// when null values are interleaved with present ones, or
/// [`ViolationKind::Ordering`] when two present values are out of order.
/// For each later position the adjacent pair is reported before any earlier
/// one.
pub fn validate_monotonic(
    records: &[Value],
    path: &KeyPath,
    direction: SortDirection,
) -> Result<(), SortingViolation> {
    validate_window(records, 0, path, direction)
}

/// Validates a sub-slice of a result set, reporting positions shifted by `offset`.
pub(crate) fn validate_window(
    records: &[Value],
    offset: usize,
    path: &KeyPath,
    direction: SortDirection,
) -> Result<(), SortingViolation> {
    let values = pluck(records, path);
    let Some(block) = present_block(&values) else {
        return Ok(());
    };
    if let Some((left, right)) = contiguity_breach(&values, block) {
        return Err(violation(
            ViolationKind::NullContiguity,
            &values,
            (left, right),
            offset,
            path,
            direction,
        ));
    }
    if let Some(pair) = ordering_breach(&values, block, direction) {
        return Err(violation(ViolationKind::Ordering, &values, pair, offset, path, direction));
    }
    Ok(())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the first and last present positions, if any.
fn present_block(values: &[FieldValue<'_>]) -> Option<(usize, usize)> {
    let first = values.iter().position(|value| value.is_present())?;
    let last = values.iter().rposition(|value| value.is_present())?;
    Some((first, last))
}

/// Finds the positions bounding the first misplaced null region.
///
/// A gap between present values is reported by the present values on either
/// side. A present block that touches neither end is reported by the null
/// positions just outside it.
fn contiguity_breach(values: &[FieldValue<'_>], block: (usize, usize)) -> Option<(usize, usize)> {
    let (first, last) = block;
    if let Some(gap) = (first ..= last).find(|index| !values[*index].is_present()) {
        let next = (gap ..= last).find(|index| values[*index].is_present())?;
        return Some((gap - 1, next));
    }
    if first > 0 && last + 1 < values.len() {
        return Some((first - 1, last + 1));
    }
    None
}

/// Finds the first out-of-order pair inside the present block.
///
/// Positions are scanned left to right; for each position its neighbour is
/// checked first, then every earlier present value.
fn ordering_breach(
    values: &[FieldValue<'_>],
    block: (usize, usize),
    direction: SortDirection,
) -> Option<(usize, usize)> {
    let (first, last) = block;
    for later in first + 1 ..= last {
        let Some(next) = values[later].as_present() else {
            continue;
        };
        let earlier = (first .. later).rev().filter_map(|index| {
            values[index].as_present().map(|prev| (index, prev))
        });
        for (index, prev) in earlier {
            if !is_in_order(prev, next, direction) {
                return Some((index, later));
            }
        }
    }
    None
}

/// Builds a violation for two local positions.
fn violation(
    kind: ViolationKind,
    values: &[FieldValue<'_>],
    positions: (usize, usize),
    offset: usize,
    path: &KeyPath,
    direction: SortDirection,
) -> SortingViolation {
    SortingViolation {
        kind,
        path: path.clone(),
        direction,
        positions: (positions.0 + offset, positions.1 + offset),
        values: (values[positions.0].to_observed(), values[positions.1].to_observed()),
    }
}
