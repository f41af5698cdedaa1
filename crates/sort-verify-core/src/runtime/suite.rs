// crates/sort-verify-core/src/runtime/suite.rs
// ============================================================================
// Module: Sort Verify Suite Runner
// Description: Declarative per-endpoint checks and batch execution.
// Purpose: Run configured sort checks across many endpoints in one pass.
// Dependencies: crate::{interfaces, runtime}, rand
// ============================================================================

//! ## Overview
//! An [`EndpointCheck`] bundles an endpoint with the fields it sorts by and
//! the compound mode to exercise. [`SortingVerifier::run_suite`] executes
//! every check and keeps going after failures, returning one
//! [`CheckReport`] per endpoint.

// ============================================================================
// SECTION: Imports
// ============================================================================

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::core::Singularizer;
use crate::interfaces::ListFetcher;
use crate::runtime::verifier::ListEndpoint;
use crate::runtime::verifier::SortCheckError;
use crate::runtime::verifier::SortingVerifier;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Compound sort coverage for an endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MultiSortMode {
    /// Only single-field checks run.
    #[default]
    Disabled,
    /// One random pair per run.
    Random,
    /// One pair chosen by an RNG seeded with the given value.
    Seeded(u64),
    /// Every ordered pair of distinct fields.
    AllPairs,
    /// An explicit `(primary, secondary)` pair.
    Pair(String, String),
}

/// Sort checks to run against one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointCheck {
    /// Endpoint under test.
    pub endpoint: ListEndpoint,
    /// Sortable request fields.
    pub fields: Vec<String>,
    /// Compound sort coverage.
    pub multi: MultiSortMode,
}

impl EndpointCheck {
    /// Creates a check with single-field coverage only.
    #[must_use]
    pub fn new(endpoint: ListEndpoint, fields: Vec<String>) -> Self {
        Self {
            endpoint,
            fields,
            multi: MultiSortMode::Disabled,
        }
    }

    /// Sets the compound sort coverage.
    #[must_use]
    pub fn with_multi(mut self, multi: MultiSortMode) -> Self {
        self.multi = multi;
        self
    }
}

/// Outcome of one [`EndpointCheck`].
#[derive(Debug)]
pub struct CheckReport {
    /// Endpoint path that was checked.
    pub endpoint: String,
    /// First failure, if any.
    pub outcome: Result<(), SortCheckError>,
}

impl CheckReport {
    /// Returns true when every check on the endpoint passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.outcome.is_ok()
    }
}

// ============================================================================
// SECTION: Execution
// ============================================================================

impl<F, S> SortingVerifier<F, S>
where
    F: ListFetcher,
    S: Singularizer,
{
    /// Runs the single-field checks, then the configured compound checks.
    ///
    /// # Errors
    ///
    /// Returns the first [`SortCheckError`] encountered.
    pub fn run_check(&self, check: &EndpointCheck) -> Result<(), SortCheckError> {
        let endpoint = &check.endpoint;
        self.assert_sorting_works(endpoint, &check.fields)?;
        match &check.multi {
            MultiSortMode::Disabled => Ok(()),
            MultiSortMode::Random => self.assert_multi_sorting_works(endpoint, &check.fields),
            MultiSortMode::Seeded(seed) => self.assert_multi_sorting_works_with_rng(
                endpoint,
                &check.fields,
                &mut StdRng::seed_from_u64(*seed),
            ),
            MultiSortMode::AllPairs => self.assert_all_multi_sorting_pairs(endpoint, &check.fields),
            MultiSortMode::Pair(first, second) => {
                self.assert_multi_sorting_pair(endpoint, first, second)
            }
        }
    }

    /// Runs every check, continuing past failures.
    #[must_use]
    pub fn run_suite(&self, checks: &[EndpointCheck]) -> Vec<CheckReport> {
        checks
            .iter()
            .map(|check| CheckReport {
                endpoint: check.endpoint.path.clone(),
                outcome: self.run_check(check),
            })
            .collect()
    }
}
