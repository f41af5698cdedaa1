// crates/sort-verify-core/src/runtime/extract.rs
// ============================================================================
// Module: Sort Verify Value Extraction
// Description: Key path resolution against nested JSON records.
// Purpose: Resolve field values and result envelopes without runtime errors.
// Dependencies: crate::core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Extraction is a pure walk over [`serde_json::Value`]. Each path segment
//! descends into an object; a missing key or a non-object intermediate
//! yields [`FieldValue::Absent`], which is distinct from an explicit JSON
//! `null` but equally unsortable downstream.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

use crate::core::KeyPath;
use crate::core::ObservedValue;

// ============================================================================
// SECTION: Field Values
// ============================================================================

/// Borrowed result of resolving a key path inside one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// The path did not resolve.
    Absent,
    /// The path resolved to an explicit `null`.
    Null,
    /// The path resolved to a non-null value.
    Present(&'a Value),
}

impl<'a> FieldValue<'a> {
    /// Returns the value when it can take part in ordering comparisons.
    #[must_use]
    pub const fn as_present(self) -> Option<&'a Value> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent | Self::Null => None,
        }
    }

    /// Returns true for non-null, non-absent values.
    #[must_use]
    pub const fn is_present(self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Returns an owned snapshot for error reporting.
    #[must_use]
    pub fn to_observed(self) -> ObservedValue {
        match self {
            Self::Absent => ObservedValue::Absent,
            Self::Null => ObservedValue::Null,
            Self::Present(value) => ObservedValue::Present(value.clone()),
        }
    }
}

/// Resolves `path` inside `record`.
#[must_use]
pub fn extract_field<'a>(record: &'a Value, path: &KeyPath) -> FieldValue<'a> {
    let mut current = record;
    for segment in path.segments() {
        let Value::Object(map) = current else {
            return FieldValue::Absent;
        };
        let Some(next) = map.get(segment) else {
            return FieldValue::Absent;
        };
        current = next;
    }
    match current {
        Value::Null => FieldValue::Null,
        value => FieldValue::Present(value),
    }
}

/// Resolves `path` in every record, preserving order.
#[must_use]
pub fn pluck<'a>(records: &'a [Value], path: &KeyPath) -> Vec<FieldValue<'a>> {
    records.iter().map(|record| extract_field(record, path)).collect()
}

// ============================================================================
// SECTION: Envelopes
// ============================================================================

/// Errors raised while locating the result array in a response body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// The envelope key did not resolve.
    #[error("envelope `{envelope}` not found in response body")]
    Missing {
        /// Envelope key that was looked up.
        envelope: String,
    },
    /// The resolved value is not an array.
    #[error("expected result array at {location}, found {found}")]
    NotAnArray {
        /// Envelope key, or `response root`.
        location: String,
        /// JSON type that was found instead.
        found: &'static str,
    },
}

/// Returns the result array held at `envelope` (or the body root).
///
/// # Errors
///
/// Returns [`EnvelopeError`] when the envelope is missing or not an array.
pub fn extract_results<'a>(
    body: &'a Value,
    envelope: Option<&KeyPath>,
) -> Result<&'a [Value], EnvelopeError> {
    let (target, location) = match envelope {
        Some(path) => match extract_field(body, path) {
            FieldValue::Present(value) => (value, format!("envelope `{path}`")),
            FieldValue::Null => {
                return Err(EnvelopeError::NotAnArray {
                    location: format!("envelope `{path}`"),
                    found: "null",
                });
            }
            FieldValue::Absent => {
                return Err(EnvelopeError::Missing {
                    envelope: path.to_string(),
                });
            }
        },
        None => (body, "response root".to_string()),
    };
    match target {
        Value::Array(items) => Ok(items.as_slice()),
        other => Err(EnvelopeError::NotAnArray {
            location,
            found: json_type_name(other),
        }),
    }
}

/// Returns a short JSON type label for diagnostics.
const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
