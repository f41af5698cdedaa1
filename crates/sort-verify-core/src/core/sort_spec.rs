// crates/sort-verify-core/src/core/sort_spec.rs
// ============================================================================
// Module: Sort Verify Sort Specifications
// Description: Sort keys, directions, and the `order_by` query form.
// Purpose: Parse and render the sorting contract exchanged with list APIs.
// Dependencies: crate::core::key_path, serde, thiserror
// ============================================================================

//! ## Overview
//! A [`SortSpec`] is the ordered list of `(field, direction)` pairs a list
//! endpoint is asked to sort by. Its query form is the comma-separated key
//! list used in `order_by`, with a leading `-` marking a descending key:
//! `companies.contacts.name,-id`.
//!
//! # Invariants
//! - A spec has at least one key; the first key is the primary key.
//! - Field names never contain whitespace or query delimiters, so the query
//!   form can be embedded in a URL without escaping.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::key_path::KeyPath;
use crate::core::key_path::KeyPathError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix marking a descending key in `order_by`.
pub const DESCENDING_PREFIX: char = '-';

/// Separator between keys of a compound `order_by` value.
pub const KEY_SEPARATOR: char = ',';

/// Characters that may not appear inside a sort field name.
const FORBIDDEN_FIELD_CHARS: &[char] = &[',', '&', '=', '?', '#', '+', '%'];

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while building or parsing a sort specification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortSpecError {
    /// No sort keys were supplied.
    #[error("sort spec requires at least one key")]
    Empty,
    /// A field name cannot be embedded in an `order_by` query.
    #[error("invalid sort field `{field}`: {reason}")]
    InvalidField {
        /// Offending field text.
        field: String,
        /// Why the field was rejected.
        reason: &'static str,
    },
    /// The field is not a valid dotted key path.
    #[error(transparent)]
    KeyPath(#[from] KeyPathError),
}

// ============================================================================
// SECTION: Direction
// ============================================================================

/// Sort direction requested for a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest value first.
    #[default]
    Ascending,
    /// Largest value first.
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Returns a stable label for messages and audit events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Sort Key
// ============================================================================

/// One `(field, direction)` pair of a sort specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortKey {
    /// Field path as written in the request.
    pub field: KeyPath,
    /// Requested direction.
    pub direction: SortDirection,
}

impl SortKey {
    /// Creates an ascending key.
    #[must_use]
    pub const fn ascending(field: KeyPath) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    /// Creates a descending key.
    #[must_use]
    pub const fn descending(field: KeyPath) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }

    /// Parses one `order_by` key such as `name` or `-contacts.name`.
    ///
    /// # Errors
    ///
    /// Returns [`SortSpecError`] when the field cannot be used in a query.
    pub fn parse(raw: &str) -> Result<Self, SortSpecError> {
        let (direction, field) = match raw.strip_prefix(DESCENDING_PREFIX) {
            Some(rest) => (SortDirection::Descending, rest),
            None => (SortDirection::Ascending, raw),
        };
        validate_field_text(field)?;
        Ok(Self {
            field: KeyPath::parse(field)?,
            direction,
        })
    }

    /// Returns the key with its direction reversed.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            field: self.field.clone(),
            direction: self.direction.flipped(),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.direction == SortDirection::Descending {
            write!(f, "{DESCENDING_PREFIX}")?;
        }
        write!(f, "{}", self.field)
    }
}

// ============================================================================
// SECTION: Sort Spec
// ============================================================================

/// Ordered sort keys; the first key is primary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SortSpec {
    /// Sort keys in priority order.
    keys: Vec<SortKey>,
}

impl SortSpec {
    /// Creates a spec from keys in priority order.
    ///
    /// # Errors
    ///
    /// Returns [`SortSpecError::Empty`] when `keys` is empty.
    pub fn new(keys: Vec<SortKey>) -> Result<Self, SortSpecError> {
        if keys.is_empty() {
            return Err(SortSpecError::Empty);
        }
        Ok(Self {
            keys,
        })
    }

    /// Creates a single-key spec.
    #[must_use]
    pub fn single(key: SortKey) -> Self {
        Self {
            keys: vec![key],
        }
    }

    /// Parses a full `order_by` value such as `name,-id`.
    ///
    /// # Errors
    ///
    /// Returns [`SortSpecError`] when the value is empty or a key is invalid.
    pub fn parse(raw: &str) -> Result<Self, SortSpecError> {
        if raw.is_empty() {
            return Err(SortSpecError::Empty);
        }
        let keys = raw.split(KEY_SEPARATOR).map(SortKey::parse).collect::<Result<Vec<_>, _>>()?;
        Self::new(keys)
    }

    /// Returns the keys in priority order.
    #[must_use]
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Returns the primary key.
    #[must_use]
    pub fn primary(&self) -> &SortKey {
        // `new` and `single` reject empty key lists.
        &self.keys[0]
    }

    /// Returns the secondary keys (possibly empty).
    #[must_use]
    pub fn secondaries(&self) -> &[SortKey] {
        &self.keys[1 ..]
    }

    /// Returns the spec with every key direction reversed.
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            keys: self.keys.iter().map(SortKey::flipped).collect(),
        }
    }

    /// Renders the `order_by` query value.
    #[must_use]
    pub fn to_query(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, key) in self.keys.iter().enumerate() {
            if index > 0 {
                write!(f, "{KEY_SEPARATOR}")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for SortSpec {
    type Error = SortSpecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SortSpec> for String {
    fn from(value: SortSpec) -> Self {
        value.to_query()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Rejects field text that cannot be embedded verbatim in a query string.
fn validate_field_text(field: &str) -> Result<(), SortSpecError> {
    if field.is_empty() {
        return Err(SortSpecError::InvalidField {
            field: field.to_string(),
            reason: "field name is empty",
        });
    }
    if field.starts_with(DESCENDING_PREFIX) {
        return Err(SortSpecError::InvalidField {
            field: field.to_string(),
            reason: "field name has more than one direction prefix",
        });
    }
    if field.chars().any(char::is_whitespace) {
        return Err(SortSpecError::InvalidField {
            field: field.to_string(),
            reason: "field name contains whitespace",
        });
    }
    if field.contains(FORBIDDEN_FIELD_CHARS) {
        return Err(SortSpecError::InvalidField {
            field: field.to_string(),
            reason: "field name contains a query delimiter",
        });
    }
    Ok(())
}
