// crates/sort-verify-core/tests/inflection.rs
// ============================================================================
// Module: Inflection Tests
// Description: Singularizer rules and key path normalization.
// Purpose: Ensure list-level keys map onto record-level keys.
// Dependencies: sort-verify-core
// ============================================================================
//! ## Overview
//! Validates the English singularizer word rules, compound segment handling,
//! case preservation, and pluggable singularizers.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use sort_verify_core::EnglishSingularizer;
use sort_verify_core::IdentitySingularizer;
use sort_verify_core::KeyPath;
use sort_verify_core::PathNormalizer;
use sort_verify_core::Singularizer;

fn normalize(raw: &str) -> String {
    PathNormalizer::new(EnglishSingularizer).normalize(&KeyPath::parse(raw).unwrap()).to_string()
}

// ============================================================================
// SECTION: Word Rules
// ============================================================================

/// Verifies regular and irregular plurals.
#[test]
fn english_singularizer_word_rules() {
    let cases = [
        ("contacts", "contact"),
        ("companies", "company"),
        ("addresses", "address"),
        ("boxes", "box"),
        ("branches", "branch"),
        ("wishes", "wish"),
        ("ids", "id"),
        ("people", "person"),
        ("children", "child"),
        ("statuses", "status"),
        ("analyses", "analysis"),
        ("movies", "movie"),
    ];
    for (plural, singular) in cases {
        assert_eq!(EnglishSingularizer.singularize(plural), singular, "{plural}");
    }
}

/// Verifies singular and uncountable words are left alone.
#[test]
fn english_singularizer_keeps_singular_words() {
    for word in ["name", "status", "address", "class", "bus", "data", "news", "series", "gas"] {
        assert_eq!(EnglishSingularizer.singularize(word), word, "{word}");
    }
}

/// Verifies only the last word of a compound segment is inflected.
#[test]
fn english_singularizer_compound_segments() {
    assert_eq!(EnglishSingularizer.singularize("phone_numbers"), "phone_number");
    assert_eq!(EnglishSingularizer.singularize("billing-addresses"), "billing-address");
    assert_eq!(EnglishSingularizer.singularize("homeAddresses"), "homeAddress");
    assert_eq!(EnglishSingularizer.singularize("userIDs"), "userID");
    assert_eq!(EnglishSingularizer.singularize("news_items"), "news_item");
}

/// Verifies the original letter case is preserved.
#[test]
fn english_singularizer_preserves_case() {
    assert_eq!(EnglishSingularizer.singularize("CITIES"), "CITY");
    assert_eq!(EnglishSingularizer.singularize("People"), "Person");
    assert_eq!(EnglishSingularizer.singularize("Contacts"), "Contact");
}

// ============================================================================
// SECTION: Path Normalization
// ============================================================================

/// Verifies each segment is singularized independently.
#[test]
fn normalizer_maps_list_keys_to_record_keys() {
    assert_eq!(normalize("companies.contacts.name"), "company.contact.name");
    assert_eq!(normalize("contacts.name"), "contact.name");
    assert_eq!(normalize("name"), "name");
    assert_eq!(normalize("created_at"), "created_at");
}

/// Verifies normalizing twice equals normalizing once.
#[test]
fn normalizer_is_idempotent() {
    for raw in ["companies.contacts.name", "statuses", "addresses.cities", "people.children"] {
        let once = normalize(raw);
        assert_eq!(normalize(&once), once, "{raw}");
    }
}

/// Verifies identity and closure singularizers plug into the normalizer.
#[test]
fn normalizer_accepts_custom_singularizers() {
    let path = KeyPath::parse("companies.contacts.name").unwrap();
    let identity = PathNormalizer::new(IdentitySingularizer);
    assert_eq!(identity.normalize(&path), path);

    let strip_s = PathNormalizer::new(|word: &str| {
        word.strip_suffix('s').unwrap_or(word).to_string()
    });
    assert_eq!(strip_s.normalize(&path).to_string(), "companie.contact.name");
}

/// Verifies a singularizer returning empty output leaves the segment intact.
#[test]
fn normalizer_ignores_empty_singular_forms() {
    let path = KeyPath::parse("contacts.name").unwrap();
    let empty = PathNormalizer::new(|_: &str| String::new());
    assert_eq!(empty.normalize(&path), path);
}
