// crates/sort-verify-core/src/runtime/compound.rs
// ============================================================================
// Module: Sort Verify Compound Validator
// Description: Multi-key sort validation via primary-value runs.
// Purpose: Check secondary keys only where the primary key ties.
// Dependencies: crate::core, crate::runtime::{comparator, extract, monotonic}
// ============================================================================

//! ## Overview
//! A compound sort `[a, b]` holds when `a` is globally monotonic and `b` is
//! monotonic inside every maximal run of records sharing the same `a`.
//! Secondary keys need not be sorted across runs. Records whose primary value
//! is null or absent form their own run. Longer key lists refine the runs one
//! key at a time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::ops::Range;

use serde_json::Value;

use crate::core::KeyPath;
use crate::core::SortKey;
use crate::core::SortingViolation;
use crate::runtime::comparator::compare_values;
use crate::runtime::extract::FieldValue;
use crate::runtime::extract::pluck;
use crate::runtime::monotonic::validate_window;

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Validates that `records` are sorted by the compound `keys`.
///
/// The first key is checked across the whole set. Each later key is checked
/// inside every maximal run of records that tie on all earlier keys, so for
/// `[a, b]` the secondary `b` is checked within runs of equal `a`. An empty
/// key list passes.
///
/// # Errors
///
/// Returns the first [`SortingViolation`] found. Positions always index the
/// full result set.
pub fn validate_compound(records: &[Value], keys: &[SortKey]) -> Result<(), SortingViolation> {
    let mut runs = vec![0 .. records.len()];
    for key in keys {
        let mut refined = Vec::new();
        for run in runs {
            if run.len() < 2 {
                continue;
            }
            let window = &records[run.clone()];
            validate_window(window, run.start, &key.field, key.direction)?;
            refined.extend(
                group_runs(window, &key.field)
                    .into_iter()
                    .map(|inner| inner.start + run.start .. inner.end + run.start),
            );
        }
        runs = refined;
    }
    Ok(())
}

/// Partitions `records` into maximal contiguous runs of equal value at `path`.
///
/// Consecutive null or absent values share a run; a present value never
/// shares a run with a missing one.
#[must_use]
pub fn group_runs(records: &[Value], path: &KeyPath) -> Vec<Range<usize>> {
    let values = pluck(records, path);
    let mut runs = Vec::new();
    let mut start = 0;
    for index in 1 ..= values.len() {
        let boundary = index == values.len() || !same_run(values[index - 1], values[index]);
        if boundary && index > start {
            runs.push(start .. index);
            start = index;
        }
    }
    runs
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when two adjacent values belong to the same run.
fn same_run(left: FieldValue<'_>, right: FieldValue<'_>) -> bool {
    match (left.as_present(), right.as_present()) {
        (None, None) => true,
        (Some(left), Some(right)) => compare_values(left, right) == Ordering::Equal,
        _ => false,
    }
}
