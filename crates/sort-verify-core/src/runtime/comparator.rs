// crates/sort-verify-core/src/runtime/comparator.rs
// ============================================================================
// Module: Sort Verify Ordering Comparator
// Description: Total order over extracted field values.
// Purpose: Compare API values numerically when possible, textually otherwise.
// Dependencies: crate::core, serde_json
// ============================================================================

//! ## Overview
//! List APIs often carry numbers as strings, so the comparator is an explicit
//! two-branch strategy. When both sides are numeric (a JSON number, or a
//! string that parses fully as a decimal number) they are compared as `f64`.
//! Otherwise both sides are compared by their natural string form, code point
//! by code point. The order is total; null and absent values are filtered
//! out by callers before comparison.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::borrow::Cow;
use std::cmp::Ordering;

use serde_json::Value;

use crate::core::SortDirection;

// ============================================================================
// SECTION: Comparator
// ============================================================================

/// Compares two non-null field values.
#[must_use]
pub fn compare_values(left: &Value, right: &Value) -> Ordering {
    if let (Some(left), Some(right)) = (numeric_value(left), numeric_value(right)) {
        return left.partial_cmp(&right).unwrap_or_else(|| left.total_cmp(&right));
    }
    natural_string(left).cmp(&natural_string(right))
}

/// Returns true when `next` may follow `prev` in a sequence sorted by `direction`.
#[must_use]
pub fn is_in_order(prev: &Value, next: &Value, direction: SortDirection) -> bool {
    let ordering = compare_values(prev, next);
    match direction {
        SortDirection::Ascending => ordering != Ordering::Greater,
        SortDirection::Descending => ordering != Ordering::Less,
    }
}

/// Returns the numeric interpretation of a value, if it has one.
///
/// JSON numbers are always numeric. Strings are numeric when, after trimming
/// ASCII whitespace, they consist of an optional sign, digits with an
/// optional fraction (at least one digit overall), and an optional exponent.
#[must_use]
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_decimal(text),
        _ => None,
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses a full decimal literal; rejects `inf`, `NaN`, hex, and partial input.
fn parse_decimal(text: &str) -> Option<f64> {
    let trimmed = text.trim_ascii();
    if !is_decimal_literal(trimmed.as_bytes()) {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Checks the `[+-]? digits [. digits] [(e|E) [+-]? digits]` grammar.
fn is_decimal_literal(bytes: &[u8]) -> bool {
    let mut index = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        index += 1;
    }
    let int_digits = count_digits(&bytes[index ..]);
    index += int_digits;
    let mut frac_digits = 0;
    if bytes.get(index) == Some(&b'.') {
        index += 1;
        frac_digits = count_digits(&bytes[index ..]);
        index += frac_digits;
    }
    if int_digits + frac_digits == 0 {
        return false;
    }
    if matches!(bytes.get(index), Some(b'e' | b'E')) {
        index += 1;
        if matches!(bytes.get(index), Some(b'+' | b'-')) {
            index += 1;
        }
        let exp_digits = count_digits(&bytes[index ..]);
        if exp_digits == 0 {
            return false;
        }
        index += exp_digits;
    }
    index == bytes.len()
}

/// Counts leading ASCII digits.
fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|byte| byte.is_ascii_digit()).count()
}

/// Returns the string form used for textual comparison.
fn natural_string(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(text) => Cow::Borrowed(text.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
