// crates/sort-verify-core/src/runtime/verifier.rs
// ============================================================================
// Module: Sort Verify Facade
// Description: End-to-end single and compound sort assertions.
// Purpose: Fetch ascending and descending lists and run every validator.
// Dependencies: crate::{audit, core, interfaces, runtime}, rand, serde, thiserror
// ============================================================================

//! ## Overview
//! [`SortingVerifier`] is the single execution path for sort checks. For each
//! requested field (or field combination) it normalizes the request key into
//! the record-level key, fetches the ascending and fully flipped lists through
//! the injected [`ListFetcher`], enforces the expected record count, validates
//! the ascending set, and finally checks that the descending set is its exact
//! reverse on the primary key.
//!
//! The descending request flips every key of a compound spec (`id,name`
//! becomes `-id,-name`), so the response is the exact mirror of the ascending
//! one. Only the primary key is compared when checking that mirror; rows tied
//! on the primary key may come back in any secondary order.
//!
//! Every check emits one [`SortCheckAuditEvent`], pass or fail. Failures are
//! scoped to the call that produced them; the verifier holds no mutable state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use rand::Rng;
use rand::seq::index::sample;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::audit::NoopAuditSink;
use crate::audit::SortCheckAuditEvent;
use crate::audit::SortCheckAuditEventParams;
use crate::core::EnglishSingularizer;
use crate::core::KeyPath;
use crate::core::PathNormalizer;
use crate::core::ReversalMismatch;
use crate::core::Singularizer;
use crate::core::SortDirection;
use crate::core::SortKey;
use crate::core::SortSpec;
use crate::core::SortSpecError;
use crate::core::SortingViolation;
use crate::interfaces::AuthContext;
use crate::interfaces::FetchError;
use crate::interfaces::ListFetcher;
use crate::interfaces::SortCheckAuditSink;
use crate::runtime::compound::validate_compound;
use crate::runtime::extract::EnvelopeError;
use crate::runtime::extract::extract_results;
use crate::runtime::reversal::validate_reversal;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Number of fields combined by the randomized and pairwise compound checks.
const PAIR_SIZE: usize = 2;

// ============================================================================
// SECTION: Check Labels
// ============================================================================

/// Kind of sort check being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckMode {
    /// One field sorted on its own.
    Single,
    /// Several fields combined into one `order_by` value.
    Compound,
}

/// Result label recorded in audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    /// Every validator accepted the lists.
    Pass,
    /// The check failed.
    Fail,
}

// ============================================================================
// SECTION: Endpoint
// ============================================================================

/// Description of a list endpoint under test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEndpoint {
    /// Endpoint path, optionally already carrying a query string.
    pub path: String,
    /// Minimum number of records the ascending list must contain.
    pub expected_count: usize,
    /// Auth material forwarded to the fetcher.
    pub auth: AuthContext,
    /// Location of the result array; the body root when unset.
    pub envelope_key: Option<KeyPath>,
}

impl ListEndpoint {
    /// Creates an anonymous endpoint whose results sit at the body root.
    #[must_use]
    pub fn new(path: impl Into<String>, expected_count: usize) -> Self {
        Self {
            path: path.into(),
            expected_count,
            auth: AuthContext::anonymous(),
            envelope_key: None,
        }
    }

    /// Sets the auth context.
    #[must_use]
    pub fn with_auth(mut self, auth: AuthContext) -> Self {
        self.auth = auth;
        self
    }

    /// Sets the envelope key holding the result array.
    #[must_use]
    pub fn with_envelope(mut self, envelope_key: KeyPath) -> Self {
        self.envelope_key = Some(envelope_key);
        self
    }

    /// Builds the request URI for `spec`.
    ///
    /// `order_by` and `per_page` are appended with `&` when the path already
    /// carries a query string.
    #[must_use]
    pub fn request_uri(&self, spec: &SortSpec) -> String {
        let separator = if self.path.contains('?') { '&' } else { '?' };
        format!(
            "{path}{separator}order_by={order_by}&per_page={per_page}",
            path = self.path,
            order_by = spec.to_query(),
            per_page = self.expected_count
        )
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Sort check failures.
#[derive(Debug, Error)]
pub enum SortCheckError {
    /// A requested field cannot be used as a sort key.
    #[error(transparent)]
    InvalidField(#[from] SortSpecError),
    /// A compound check was requested with too few fields.
    #[error("compound sort check needs at least {required} fields, got {provided}")]
    InsufficientFields {
        /// Minimum number of fields.
        required: usize,
        /// Number of fields supplied.
        provided: usize,
    },
    /// The fetch collaborator failed.
    #[error("fetching {uri} failed: {source}")]
    Fetch {
        /// Requested URI.
        uri: String,
        /// Collaborator error, unmodified.
        #[source]
        source: FetchError,
    },
    /// The list endpoint answered with a non-success status.
    #[error("{uri} returned status {status}")]
    Status {
        /// Requested URI.
        uri: String,
        /// Status code returned.
        status: u16,
    },
    /// The response body does not hold a result array where expected.
    #[error("malformed response from {uri}: {source}")]
    MalformedResponse {
        /// Requested URI.
        uri: String,
        /// Envelope resolution failure.
        #[source]
        source: EnvelopeError,
    },
    /// The ascending list holds fewer records than the endpoint promises.
    #[error("{uri} returned {actual} records, expected at least {expected}")]
    CountShortfall {
        /// Requested URI.
        uri: String,
        /// Expected minimum count.
        expected: usize,
        /// Records returned.
        actual: usize,
    },
    /// The ascending list is not sorted.
    #[error("order_by={order_by}: {violation}")]
    Sorting {
        /// Requested `order_by` value.
        order_by: String,
        /// Validator failure.
        #[source]
        violation: SortingViolation,
    },
    /// The descending list is not the reverse of the ascending list.
    #[error("order_by={order_by}: {mismatch}")]
    Reversal {
        /// Requested ascending `order_by` value.
        order_by: String,
        /// Validator failure.
        #[source]
        mismatch: ReversalMismatch,
    },
}

impl SortCheckError {
    /// Returns a stable label for audit events.
    #[must_use]
    pub const fn failure_kind(&self) -> &'static str {
        match self {
            Self::InvalidField(_) => "invalid_field",
            Self::InsufficientFields {
                ..
            } => "insufficient_fields",
            Self::Fetch {
                ..
            } => "fetch",
            Self::Status {
                ..
            } => "status",
            Self::MalformedResponse {
                ..
            } => "malformed_response",
            Self::CountShortfall {
                ..
            } => "count_shortfall",
            Self::Sorting {
                violation,
                ..
            } => violation.kind.as_str(),
            Self::Reversal {
                ..
            } => "reversal",
        }
    }
}

// ============================================================================
// SECTION: Verifier
// ============================================================================

/// Sort contract verifier bound to a fetch collaborator.
///
/// Each check issues two requests: the sort as given and the sort with every
/// key flipped.
pub struct SortingVerifier<F, S = EnglishSingularizer> {
    /// Fetch collaborator used for every request.
    fetcher: F,
    /// Request-to-record key normalizer.
    normalizer: PathNormalizer<S>,
    /// Audit sink receiving one event per check.
    audit: Arc<dyn SortCheckAuditSink>,
}

impl<F: ListFetcher> SortingVerifier<F> {
    /// Creates a verifier with English singularization and no audit output.
    #[must_use]
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            normalizer: PathNormalizer::default(),
            audit: Arc::new(NoopAuditSink),
        }
    }
}

impl<F, S> SortingVerifier<F, S>
where
    F: ListFetcher,
    S: Singularizer,
{
    /// Replaces the singularizer used to derive record-level keys.
    #[must_use]
    pub fn with_singularizer<T: Singularizer>(self, singularizer: T) -> SortingVerifier<F, T> {
        SortingVerifier {
            fetcher: self.fetcher,
            normalizer: PathNormalizer::new(singularizer),
            audit: self.audit,
        }
    }

    /// Replaces the audit sink.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: Arc<dyn SortCheckAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the fetch collaborator.
    #[must_use]
    pub const fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Returns the record-level key path for a requested field.
    ///
    /// # Errors
    ///
    /// Returns [`SortCheckError::InvalidField`] when the field is not a valid
    /// ascending sort key.
    pub fn normalize_field(&self, field: &str) -> Result<KeyPath, SortCheckError> {
        Ok(self.normalizer.normalize(&request_key(field)?.field))
    }

    /// Verifies each field independently as a single-key sort.
    ///
    /// An empty field list passes without issuing requests.
    ///
    /// # Errors
    ///
    /// Returns the first [`SortCheckError`] encountered; later fields are not
    /// checked.
    pub fn assert_sorting_works(
        &self,
        endpoint: &ListEndpoint,
        fields: &[impl AsRef<str>],
    ) -> Result<(), SortCheckError> {
        for field in fields {
            let spec = SortSpec::single(request_key(field.as_ref())?);
            self.check(endpoint, CheckMode::Single, &spec)?;
        }
        Ok(())
    }

    /// Verifies a compound sort over two distinct fields picked at random.
    ///
    /// # Errors
    ///
    /// Returns [`SortCheckError::InsufficientFields`] when fewer than two
    /// fields are supplied, or the failure of the compound check.
    pub fn assert_multi_sorting_works(
        &self,
        endpoint: &ListEndpoint,
        fields: &[impl AsRef<str>],
    ) -> Result<(), SortCheckError> {
        self.assert_multi_sorting_works_with_rng(endpoint, fields, &mut rand::thread_rng())
    }

    /// Verifies a compound sort over two distinct fields picked with `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`SortCheckError::InsufficientFields`] when fewer than two
    /// fields are supplied, or the failure of the compound check.
    pub fn assert_multi_sorting_works_with_rng<R: Rng + ?Sized>(
        &self,
        endpoint: &ListEndpoint,
        fields: &[impl AsRef<str>],
        rng: &mut R,
    ) -> Result<(), SortCheckError> {
        ensure_field_count(fields.len())?;
        let picked = sample(rng, fields.len(), PAIR_SIZE);
        self.assert_multi_sorting_pair(
            endpoint,
            fields[picked.index(0)].as_ref(),
            fields[picked.index(1)].as_ref(),
        )
    }

    /// Verifies the compound sort `first,second`.
    ///
    /// # Errors
    ///
    /// Returns the failure of the compound check.
    pub fn assert_multi_sorting_pair(
        &self,
        endpoint: &ListEndpoint,
        first: &str,
        second: &str,
    ) -> Result<(), SortCheckError> {
        self.assert_multi_sorting_fields(endpoint, &[first, second])
    }

    /// Verifies the compound sort over all `fields` in the given priority order.
    ///
    /// # Errors
    ///
    /// Returns [`SortCheckError::InsufficientFields`] when fewer than two
    /// fields are supplied, or the failure of the compound check.
    pub fn assert_multi_sorting_fields(
        &self,
        endpoint: &ListEndpoint,
        fields: &[impl AsRef<str>],
    ) -> Result<(), SortCheckError> {
        ensure_field_count(fields.len())?;
        let keys = fields
            .iter()
            .map(|field| request_key(field.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        let spec = SortSpec::new(keys)?;
        self.check(endpoint, CheckMode::Compound, &spec)
    }

    /// Verifies every ordered pair of distinct field positions.
    ///
    /// # Errors
    ///
    /// Returns [`SortCheckError::InsufficientFields`] when fewer than two
    /// fields are supplied, or the first failing pair.
    pub fn assert_all_multi_sorting_pairs(
        &self,
        endpoint: &ListEndpoint,
        fields: &[impl AsRef<str>],
    ) -> Result<(), SortCheckError> {
        ensure_field_count(fields.len())?;
        for (i, first) in fields.iter().enumerate() {
            for (j, second) in fields.iter().enumerate() {
                if i != j {
                    self.assert_multi_sorting_pair(endpoint, first.as_ref(), second.as_ref())?;
                }
            }
        }
        Ok(())
    }

    /// Runs one audited check for a request spec.
    fn check(
        &self,
        endpoint: &ListEndpoint,
        mode: CheckMode,
        spec: &SortSpec,
    ) -> Result<(), SortCheckError> {
        let record_keys: Vec<SortKey> = spec
            .keys()
            .iter()
            .map(|key| SortKey {
                field: self.normalizer.normalize(&key.field),
                direction: key.direction,
            })
            .collect();
        let mut record_count = None;
        let result = self.verify_spec(endpoint, spec, &record_keys, &mut record_count);
        self.record_event(endpoint, mode, spec, &record_keys, &result, record_count);
        result
    }

    /// Fetches both directions and runs the validators.
    fn verify_spec(
        &self,
        endpoint: &ListEndpoint,
        spec: &SortSpec,
        record_keys: &[SortKey],
        record_count: &mut Option<usize>,
    ) -> Result<(), SortCheckError> {
        let ascending_uri = endpoint.request_uri(spec);
        let descending_uri = endpoint.request_uri(&spec.flipped());
        let ascending_body = self.fetch_body(endpoint, &ascending_uri)?;
        let descending_body = self.fetch_body(endpoint, &descending_uri)?;
        let ascending = results(endpoint, &ascending_uri, &ascending_body)?;
        let descending = results(endpoint, &descending_uri, &descending_body)?;
        *record_count = Some(ascending.len());

        if ascending.len() < endpoint.expected_count {
            return Err(SortCheckError::CountShortfall {
                uri: ascending_uri,
                expected: endpoint.expected_count,
                actual: ascending.len(),
            });
        }
        validate_compound(ascending, record_keys).map_err(|violation| {
            SortCheckError::Sorting {
                order_by: spec.to_query(),
                violation,
            }
        })?;
        let Some(primary) = record_keys.first() else {
            return Ok(());
        };
        validate_reversal(ascending, descending, &primary.field).map_err(|mismatch| {
            SortCheckError::Reversal {
                order_by: spec.to_query(),
                mismatch,
            }
        })
    }

    /// Fetches `uri` and returns the body of a successful response.
    fn fetch_body(&self, endpoint: &ListEndpoint, uri: &str) -> Result<Value, SortCheckError> {
        let response =
            self.fetcher.fetch(uri, &endpoint.auth).map_err(|source| SortCheckError::Fetch {
                uri: uri.to_string(),
                source,
            })?;
        if !response.is_success() {
            return Err(SortCheckError::Status {
                uri: uri.to_string(),
                status: response.status,
            });
        }
        Ok(response.body)
    }

    /// Emits the audit event for one check.
    fn record_event(
        &self,
        endpoint: &ListEndpoint,
        mode: CheckMode,
        spec: &SortSpec,
        record_keys: &[SortKey],
        result: &Result<(), SortCheckError>,
        record_count: Option<usize>,
    ) {
        let (outcome, failure_kind, message) = match result {
            Ok(()) => (CheckOutcome::Pass, None, None),
            Err(err) => (CheckOutcome::Fail, Some(err.failure_kind()), Some(err.to_string())),
        };
        let event = SortCheckAuditEvent::new(SortCheckAuditEventParams {
            endpoint: endpoint.path.clone(),
            mode,
            order_by: spec.to_query(),
            fields: record_keys.iter().map(|key| key.field.to_string()).collect(),
            outcome,
            failure_kind,
            message,
            record_count,
        });
        self.audit.record(&event);
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses a requested field as an ascending sort key.
fn request_key(field: &str) -> Result<SortKey, SortSpecError> {
    let key = SortKey::parse(field)?;
    if key.direction == SortDirection::Descending {
        return Err(SortSpecError::InvalidField {
            field: field.to_string(),
            reason: "direction prefix is added by the verifier",
        });
    }
    Ok(key)
}

/// Rejects compound checks with fewer than two fields.
fn ensure_field_count(provided: usize) -> Result<(), SortCheckError> {
    if provided < PAIR_SIZE {
        return Err(SortCheckError::InsufficientFields {
            required: PAIR_SIZE,
            provided,
        });
    }
    Ok(())
}

/// Locates the result array inside a response body.
fn results<'a>(
    endpoint: &ListEndpoint,
    uri: &str,
    body: &'a Value,
) -> Result<&'a [Value], SortCheckError> {
    extract_results(body, endpoint.envelope_key.as_ref()).map_err(|source| {
        SortCheckError::MalformedResponse {
            uri: uri.to_string(),
            source,
        }
    })
}
