// crates/sort-verify-core/src/core/key_path.rs
// ============================================================================
// Module: Sort Verify Key Paths
// Description: Dotted field paths addressing nested record values.
// Purpose: Provide an immutable, validated path type with a stable string form.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`KeyPath`] is the ordered list of segments produced by splitting a
//! dotted string such as `company.contact.name`. Paths are validated once at
//! construction and never change afterwards.
//!
//! # Invariants
//! - A path has at least one segment.
//! - No segment is empty.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while parsing a dotted key path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyPathError {
    /// The input string was empty.
    #[error("key path must be non-empty")]
    Empty,
    /// A segment between two dots (or at either end) was empty.
    #[error("key path `{path}` has an empty segment at index {index}")]
    EmptySegment {
        /// Raw path text.
        path: String,
        /// Index of the empty segment.
        index: usize,
    },
}

// ============================================================================
// SECTION: Key Path
// ============================================================================

/// Dotted address of a (possibly nested) record field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct KeyPath {
    /// Path segments, outermost first.
    segments: Vec<String>,
}

impl KeyPath {
    /// Parses a dotted path such as `companies.contacts.name`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyPathError`] when the path or any segment is empty.
    pub fn parse(path: &str) -> Result<Self, KeyPathError> {
        if path.is_empty() {
            return Err(KeyPathError::Empty);
        }
        let mut segments = Vec::new();
        for (index, segment) in path.split('.').enumerate() {
            if segment.is_empty() {
                return Err(KeyPathError::EmptySegment {
                    path: path.to_string(),
                    index,
                });
            }
            segments.push(segment.to_string());
        }
        Ok(Self {
            segments,
        })
    }

    /// Builds a path from pre-split segments.
    ///
    /// # Errors
    ///
    /// Returns [`KeyPathError`] when no segments are given or one is empty.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, KeyPathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(KeyPathError::Empty);
        }
        if let Some(index) = segments.iter().position(String::is_empty) {
            return Err(KeyPathError::EmptySegment {
                path: segments.join("."),
                index,
            });
        }
        Ok(Self {
            segments,
        })
    }

    /// Returns the path segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the number of segments (always at least one).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true when the path has no segments (never for a parsed path).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns a new path with `f` applied to every segment.
    ///
    /// Segments mapped to an empty string keep their original text so the
    /// non-empty invariant holds.
    #[must_use]
    pub fn map_segments<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&str) -> String,
    {
        let segments = self
            .segments
            .iter()
            .map(|segment| {
                let mapped = f(segment);
                if mapped.is_empty() { segment.clone() } else { mapped }
            })
            .collect();
        Self {
            segments,
        }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl FromStr for KeyPath {
    type Err = KeyPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for KeyPath {
    type Error = KeyPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for KeyPath {
    type Error = KeyPathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<KeyPath> for String {
    fn from(value: KeyPath) -> Self {
        value.to_string()
    }
}
