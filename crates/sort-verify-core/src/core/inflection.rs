// crates/sort-verify-core/src/core/inflection.rs
// ============================================================================
// Module: Sort Verify Inflection
// Description: Pluggable singularization and key path normalization.
// Purpose: Map list-level (plural) sort keys onto record-level (singular) paths.
// Dependencies: crate::core::key_path
// ============================================================================

//! ## Overview
//! List endpoints commonly name nested sort keys in plural form
//! (`companies.contacts.name`) while each record nests singular objects
//! (`company.contact.name`). A [`PathNormalizer`] bridges the two by applying
//! a [`Singularizer`] to every segment independently.
//!
//! [`EnglishSingularizer`] is the default rule set. It is deterministic and
//! every output is a fixed point, so normalization is idempotent.
//!
//! # Invariants
//! - `normalize(normalize(p)) == normalize(p)` for the built-in singularizers.
//! - Segments are transformed independently of their neighbours.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::key_path::KeyPath;

// ============================================================================
// SECTION: Word Tables
// ============================================================================

/// Words that have no distinct singular form.
const UNCOUNTABLE: &[&str] = &[
    "data",
    "deer",
    "equipment",
    "feedback",
    "fish",
    "furniture",
    "hardware",
    "information",
    "kudos",
    "luggage",
    "media",
    "metadata",
    "money",
    "moose",
    "news",
    "police",
    "rice",
    "series",
    "sheep",
    "software",
    "species",
    "traffic",
];

/// Irregular `(plural, singular)` pairs.
const IRREGULAR: &[(&str, &str)] = &[
    ("aliases", "alias"),
    ("alumni", "alumnus"),
    ("analyses", "analysis"),
    ("appendices", "appendix"),
    ("axes", "axis"),
    ("bonuses", "bonus"),
    ("buses", "bus"),
    ("caches", "cache"),
    ("cacti", "cactus"),
    ("calves", "calf"),
    ("campuses", "campus"),
    ("children", "child"),
    ("cookies", "cookie"),
    ("crises", "crisis"),
    ("criteria", "criterion"),
    ("diagnoses", "diagnosis"),
    ("echoes", "echo"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("halves", "half"),
    ("heroes", "hero"),
    ("indices", "index"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("lives", "life"),
    ("loaves", "loaf"),
    ("matrices", "matrix"),
    ("men", "man"),
    ("mice", "mouse"),
    ("movies", "movie"),
    ("octopi", "octopus"),
    ("oxen", "ox"),
    ("parentheses", "parenthesis"),
    ("people", "person"),
    ("phenomena", "phenomenon"),
    ("pies", "pie"),
    ("potatoes", "potato"),
    ("quizzes", "quiz"),
    ("radii", "radius"),
    ("selves", "self"),
    ("shelves", "shelf"),
    ("statuses", "status"),
    ("synopses", "synopsis"),
    ("teeth", "tooth"),
    ("theses", "thesis"),
    ("thieves", "thief"),
    ("ties", "tie"),
    ("tomatoes", "tomato"),
    ("vertices", "vertex"),
    ("viruses", "virus"),
    ("wives", "wife"),
    ("wolves", "wolf"),
    ("women", "woman"),
    ("zombies", "zombie"),
];

/// Singular words ending in `s` that the suffix rules would otherwise trim.
const SINGULAR_ENDING_IN_S: &[&str] =
    &["atlas", "bias", "canvas", "chaos", "cosmos", "ethos", "gas", "lens", "pathos"];

/// Suffix rewrites applied in order; the first match wins.
const SUFFIX_RULES: &[(&str, &str)] =
    &[("ies", "y"), ("sses", "ss"), ("shes", "sh"), ("ches", "ch"), ("xes", "x")];

/// Endings that already denote a singular word.
const SINGULAR_ENDINGS: &[&str] = &["ss", "us", "is"];

// ============================================================================
// SECTION: Singularizer Interface
// ============================================================================

/// Converts one word from plural to singular form.
///
/// Implementations must be deterministic. Returning an empty string leaves
/// the segment unchanged during path normalization.
pub trait Singularizer {
    /// Returns the singular form of `word`.
    fn singularize(&self, word: &str) -> String;
}

impl<F> Singularizer for F
where
    F: Fn(&str) -> String,
{
    fn singularize(&self, word: &str) -> String {
        self(word)
    }
}

/// Singularizer that returns every word unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentitySingularizer;

impl Singularizer for IdentitySingularizer {
    fn singularize(&self, word: &str) -> String {
        word.to_string()
    }
}

/// Rule-based English singularizer.
///
/// Only the last word of a compound segment is inflected, where words are
/// delimited by `_`, `-`, or a lower-to-upper camel-case boundary:
/// `phone_numbers` → `phone_number`, `homeAddresses` → `homeAddress`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishSingularizer;

impl Singularizer for EnglishSingularizer {
    fn singularize(&self, word: &str) -> String {
        let split = last_word_start(word);
        let (head, tail) = word.split_at(split);
        let mut out = String::with_capacity(word.len());
        out.push_str(head);
        out.push_str(&singularize_word(tail));
        out
    }
}

// ============================================================================
// SECTION: Path Normalizer
// ============================================================================

/// Maps request-level key paths to record-level key paths.
#[derive(Debug, Clone, Default)]
pub struct PathNormalizer<S = EnglishSingularizer> {
    /// Singularizer applied to each segment.
    singularizer: S,
}

impl<S: Singularizer> PathNormalizer<S> {
    /// Creates a normalizer around the given singularizer.
    #[must_use]
    pub const fn new(singularizer: S) -> Self {
        Self {
            singularizer,
        }
    }

    /// Singularizes every segment of `path` independently.
    #[must_use]
    pub fn normalize(&self, path: &KeyPath) -> KeyPath {
        path.map_segments(|segment| self.singularizer.singularize(segment))
    }

    /// Returns the wrapped singularizer.
    #[must_use]
    pub const fn singularizer(&self) -> &S {
        &self.singularizer
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the byte index where the last word of a compound segment starts.
fn last_word_start(word: &str) -> usize {
    let mut start = 0;
    let mut prev: Option<char> = None;
    for (index, ch) in word.char_indices() {
        if ch == '_' || ch == '-' {
            start = index + ch.len_utf8();
        } else if ch.is_uppercase()
            && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit())
        {
            start = index;
        }
        prev = Some(ch);
    }
    start
}

/// Singularizes a single word without separators or inner camel boundaries.
fn singularize_word(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    let lower = word.to_ascii_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str())
        || SINGULAR_ENDING_IN_S.contains(&lower.as_str())
        || IRREGULAR.iter().any(|(_, singular)| *singular == lower)
    {
        return word.to_string();
    }
    if let Some(singular) = irregular_singular(&lower) {
        return match_case(word, singular);
    }

    let candidate = apply_suffix_rules(word);
    match irregular_singular(&candidate.to_ascii_lowercase()) {
        Some(singular) => match_case(&candidate, singular),
        None => candidate,
    }
}

/// Applies suffix rewrites, preserving the untouched stem verbatim.
fn apply_suffix_rules(word: &str) -> String {
    for (suffix, replacement) in SUFFIX_RULES {
        if let Some(stem) = strip_suffix_ignore_case(word, suffix) {
            return join_stem(stem, word, replacement);
        }
    }
    if SINGULAR_ENDINGS.iter().any(|ending| strip_suffix_ignore_case(word, ending).is_some()) {
        return word.to_string();
    }
    match strip_suffix_ignore_case(word, "s") {
        Some(stem) => stem.to_string(),
        None => word.to_string(),
    }
}

/// Strips an ASCII suffix case-insensitively, requiring a non-empty stem.
fn strip_suffix_ignore_case<'a>(word: &'a str, suffix: &str) -> Option<&'a str> {
    if word.len() <= suffix.len() {
        return None;
    }
    let split = word.len() - suffix.len();
    let tail = word.as_bytes().get(split ..)?;
    if tail.eq_ignore_ascii_case(suffix.as_bytes()) { word.get(.. split) } else { None }
}

/// Appends a replacement suffix, upper-casing it when the removed suffix was.
fn join_stem(stem: &str, original: &str, replacement: &str) -> String {
    let upper = original.chars().last().is_some_and(char::is_uppercase);
    let mut out = String::with_capacity(stem.len() + replacement.len());
    out.push_str(stem);
    if upper {
        out.push_str(&replacement.to_ascii_uppercase());
    } else {
        out.push_str(replacement);
    }
    out
}

/// Looks up the singular form of an irregular plural.
fn irregular_singular(lower: &str) -> Option<&'static str> {
    IRREGULAR.iter().find(|(plural, _)| *plural == lower).map(|(_, singular)| *singular)
}

/// Re-applies the capitalization style of `original` to a lower-case word.
fn match_case(original: &str, lower: &str) -> String {
    let has_lower = original.chars().any(char::is_lowercase);
    let has_upper = original.chars().any(char::is_uppercase);
    if has_upper && !has_lower {
        return lower.to_ascii_uppercase();
    }
    if original.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = lower.chars();
        return chars.next().map_or_else(String::new, |first| {
            first.to_ascii_uppercase().to_string() + chars.as_str()
        });
    }
    lower.to_string()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_word_start_splits_on_separators_and_camel_case() {
        assert_eq!(last_word_start("companies"), 0);
        assert_eq!(last_word_start("phone_numbers"), 6);
        assert_eq!(last_word_start("home-addresses"), 5);
        assert_eq!(last_word_start("homeAddresses"), 4);
        assert_eq!(last_word_start("IDS"), 0);
        assert_eq!(last_word_start("userIDs"), 4);
    }

    #[test]
    fn strip_suffix_requires_non_empty_stem() {
        assert_eq!(strip_suffix_ignore_case("ies", "ies"), None);
        assert_eq!(strip_suffix_ignore_case("CITIES", "ies"), Some("CIT"));
    }

    #[test]
    fn match_case_follows_original_style() {
        assert_eq!(match_case("PEOPLE", "person"), "PERSON");
        assert_eq!(match_case("People", "person"), "Person");
        assert_eq!(match_case("people", "person"), "person");
    }
}
