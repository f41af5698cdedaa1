// crates/sort-verify-core/tests/proptest_ordering.rs
// ============================================================================
// Module: Ordering Property-Based Tests
// Description: Property tests for comparator, validators, and normalization.
// Purpose: Detect ordering inconsistencies across wide input ranges.
// ============================================================================

//! Property-based tests for sort verification invariants.

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
    reason = "Test-only assertions and helpers are permitted."
)]

use std::cmp::Ordering;

use proptest::prelude::*;
use serde_json::Value;
use serde_json::json;
use sort_verify_core::EnglishSingularizer;
use sort_verify_core::KeyPath;
use sort_verify_core::PathNormalizer;
use sort_verify_core::SortDirection;
use sort_verify_core::SortKey;
use sort_verify_core::compare_values;
use sort_verify_core::validate_compound;
use sort_verify_core::validate_monotonic;
use sort_verify_core::validate_reversal;

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<i32>().prop_map(|v| json!(v)),
        any::<i32>().prop_map(|v| json!(v.to_string())),
        (-1.0e6 .. 1.0e6f64).prop_map(|v| json!(v)),
        "[a-zA-Z0-9 ]{0,6}".prop_map(Value::String),
        any::<bool>().prop_map(Value::Bool),
    ]
}

fn optional_scalar_strategy() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![1 => Just(None), 4 => scalar_strategy().prop_map(Some)]
}

fn records_for(values: &[Option<Value>]) -> Vec<Value> {
    values
        .iter()
        .map(|value| match value {
            Some(value) => json!({ "value": value }),
            None => json!({ "value": null }),
        })
        .collect()
}

fn value_path() -> KeyPath {
    KeyPath::parse("value").unwrap()
}

proptest! {
    #[test]
    fn comparator_is_antisymmetric(a in scalar_strategy(), b in scalar_strategy()) {
        prop_assert_eq!(compare_values(&a, &b), compare_values(&b, &a).reverse());
    }

    #[test]
    fn comparator_is_reflexive(a in scalar_strategy()) {
        prop_assert_eq!(compare_values(&a, &a), Ordering::Equal);
    }

    #[test]
    fn integers_and_numeric_strings_agree(a in any::<i32>(), b in any::<i32>()) {
        let expected = a.cmp(&b);
        prop_assert_eq!(compare_values(&json!(a), &json!(b)), expected);
        prop_assert_eq!(compare_values(&json!(a.to_string()), &json!(b.to_string())), expected);
        prop_assert_eq!(compare_values(&json!(a), &json!(b.to_string())), expected);
    }

    #[test]
    fn sorted_numbers_with_null_prefix_pass(
        mut numbers in prop::collection::vec(any::<i32>(), 0 .. 12),
        nulls in 0usize .. 4,
    ) {
        numbers.sort_unstable();
        let mut values: Vec<Option<Value>> = vec![None; nulls];
        values.extend(numbers.iter().map(|n| Some(json!(n))));
        let ascending = records_for(&values);
        let path = value_path();
        prop_assert!(validate_monotonic(&ascending, &path, SortDirection::Ascending).is_ok());

        let mut descending = ascending.clone();
        descending.reverse();
        prop_assert!(validate_monotonic(&descending, &path, SortDirection::Descending).is_ok());
        prop_assert!(validate_reversal(&ascending, &descending, &path).is_ok());
    }

    #[test]
    fn validators_never_panic(
        values in prop::collection::vec(optional_scalar_strategy(), 0 .. 10),
    ) {
        let records = records_for(&values);
        let path = value_path();
        let _ = validate_monotonic(&records, &path, SortDirection::Ascending);
        let _ = validate_monotonic(&records, &path, SortDirection::Descending);
        let _ = validate_reversal(&records, &records, &path);
        let keys = [SortKey::ascending(path.clone()), SortKey::descending(path)];
        let _ = validate_compound(&records, &keys);
    }

    #[test]
    fn accepted_sequences_are_pairwise_ordered(
        values in prop::collection::vec(scalar_strategy(), 0 .. 8),
    ) {
        let records = records_for(&values.iter().cloned().map(Some).collect::<Vec<_>>());
        if validate_monotonic(&records, &value_path(), SortDirection::Ascending).is_ok() {
            for earlier in 0 .. values.len() {
                for later in earlier + 1 .. values.len() {
                    prop_assert_ne!(
                        compare_values(&values[earlier], &values[later]),
                        Ordering::Greater
                    );
                }
            }
        }
    }

    #[test]
    fn compound_law_holds_for_sorted_pairs(
        mut rows in prop::collection::vec((0i32 .. 4, 0i32 .. 4), 0 .. 12),
    ) {
        rows.sort_unstable();
        let records: Vec<Value> = rows.iter().map(|(a, b)| json!({ "a": a, "b": b })).collect();
        let keys = [
            SortKey::ascending(KeyPath::parse("a").unwrap()),
            SortKey::ascending(KeyPath::parse("b").unwrap()),
        ];
        prop_assert!(validate_compound(&records, &keys).is_ok());
    }

    #[test]
    fn normalization_is_idempotent(segments in prop::collection::vec("[a-zA-Z_]{1,12}", 1 .. 4)) {
        let path = KeyPath::from_segments(segments).unwrap();
        let normalizer = PathNormalizer::new(EnglishSingularizer);
        let once = normalizer.normalize(&path);
        prop_assert_eq!(normalizer.normalize(&once), once);
    }
}
