// crates/sort-verify-providers/src/http.rs
// ============================================================================
// Module: HTTP List Fetcher
// Description: Blocking HTTP implementation of the list fetcher interface.
// Purpose: Fetch sorted list pages from a live API with strict limits.
// Dependencies: sort-verify-core, reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! [`HttpListFetcher`] resolves the verifier's relative request URIs against a
//! configured base URL, issues bounded GET requests, and parses the body as
//! JSON. Scheme restrictions, an optional host allowlist, disabled redirects,
//! and a hard response size limit keep a misbehaving server from stalling or
//! flooding a verification run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::io::Read;
use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::header::ACCEPT;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde_json::Value;
use sort_verify_core::AuthContext;
use sort_verify_core::FetchError;
use sort_verify_core::ListFetcher;
use sort_verify_core::ListResponse;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the HTTP list fetcher.
///
/// # Invariants
/// - `allow_http = false` blocks cleartext `http://` URLs.
/// - `max_response_bytes` is a hard upper bound on response bodies.
/// - If `allowed_hosts` is set, only listed hosts are permitted.
/// - URLs with embedded credentials are rejected.
/// - `timeout_ms` applies to the full request lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpFetcherConfig {
    /// Base URL that relative request URIs are joined onto.
    pub base_url: Option<String>,
    /// Allow cleartext HTTP (disabled by default).
    pub allow_http: bool,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum response size allowed, in bytes.
    pub max_response_bytes: usize,
    /// Optional host allowlist.
    pub allowed_hosts: Option<BTreeSet<String>>,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            allow_http: false,
            timeout_ms: 5_000,
            max_response_bytes: 4 * 1024 * 1024,
            allowed_hosts: None,
            user_agent: "sort-verify/0.1".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Fetcher Implementation
// ============================================================================

/// List fetcher backed by a blocking HTTP client.
///
/// # Invariants
/// - Redirects are not followed; a `3xx` is returned as the response status.
/// - Responses exceeding configured limits fail with [`FetchError::Response`].
/// - Non-2xx bodies that are not JSON are surfaced as `null`.
pub struct HttpListFetcher {
    /// Fetcher configuration, including limits and policy.
    config: HttpFetcherConfig,
    /// Parsed base URL, always ending in `/`.
    base_url: Option<Url>,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl HttpListFetcher {
    /// Creates a new HTTP fetcher with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Policy`] when the base URL is invalid or
    /// disallowed, and [`FetchError::Request`] when the client cannot be built.
    pub fn new(config: HttpFetcherConfig) -> Result<Self, FetchError> {
        let base_url = match config.base_url.as_deref() {
            Some(raw) => {
                let url = parse_base_url(raw)?;
                validate_url(&url, &config)?;
                Some(url)
            }
            None => None,
        };
        let client = build_http_client(&config)?;
        Ok(Self {
            config,
            base_url,
            client,
        })
    }

    /// Returns the fetcher configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpFetcherConfig {
        &self.config
    }

    /// Resolves a request URI to the absolute URL that would be fetched.
    ///
    /// Relative URIs require a base URL; absolute URIs are used as given.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Policy`] when the URI cannot be resolved or the
    /// resolved URL violates the scheme, credential, or host policy.
    pub fn request_url(&self, uri: &str) -> Result<Url, FetchError> {
        let url = match &self.base_url {
            Some(base) => base.join(uri),
            None => Url::parse(uri),
        }
        .map_err(|err| FetchError::Policy(format!("invalid request uri {uri}: {err}")))?;
        validate_url(&url, &self.config)?;
        Ok(url)
    }
}

impl ListFetcher for HttpListFetcher {
    fn fetch(&self, uri: &str, auth: &AuthContext) -> Result<ListResponse, FetchError> {
        let url = self.request_url(uri)?;
        let mut request = self.client.get(url).header(ACCEPT, "application/json");
        for (name, value) in &auth.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        let response = request.send().map_err(|err| {
            if err.is_timeout() {
                FetchError::Request(format!("request to {uri} timed out"))
            } else {
                FetchError::Request(format!("request to {uri} failed: {err}"))
            }
        })?;
        let status = response.status().as_u16();
        let bytes = read_list_body(response, uri, self.config.max_response_bytes)?;
        let body = parse_body(status, &bytes)?;
        Ok(ListResponse {
            status,
            body,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Parses the base URL and ensures its path ends with `/` so joins append.
fn parse_base_url(raw: &str) -> Result<Url, FetchError> {
    let mut url =
        Url::parse(raw).map_err(|err| FetchError::Policy(format!("invalid base url: {err}")))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Validates URL scheme, credential, and allowlist policy.
fn validate_url(url: &Url, config: &HttpFetcherConfig) -> Result<(), FetchError> {
    match url.scheme() {
        "https" => {}
        "http" if config.allow_http => {}
        other => return Err(FetchError::Policy(format!("unsupported url scheme: {other}"))),
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(FetchError::Policy("url credentials are not allowed".to_string()));
    }
    if let Some(allowlist) = &config.allowed_hosts {
        let host = url
            .host_str()
            .ok_or_else(|| FetchError::Policy("url host required".to_string()))?
            .to_ascii_lowercase();
        if !allowlist.iter().any(|entry| entry.eq_ignore_ascii_case(&host)) {
            return Err(FetchError::Policy(format!("url host not allowed: {host}")));
        }
    }
    Ok(())
}

/// Builds the blocking client with timeout, user agent, and no redirects.
fn build_http_client(config: &HttpFetcherConfig) -> Result<Client, FetchError> {
    Client::builder()
        .timeout(Duration::from_millis(config.timeout_ms))
        .user_agent(config.user_agent.clone())
        .redirect(Policy::none())
        .build()
        .map_err(|err| FetchError::Request(format!("http client build failed: {err}")))
}

/// Reads a list body of at most `limit` bytes.
///
/// A declared `Content-Length` above the limit is refused before reading. A
/// body shorter than its declared length is treated as a cut-off transfer.
fn read_list_body(response: Response, uri: &str, limit: usize) -> Result<Vec<u8>, FetchError> {
    let over_limit =
        || FetchError::Response(format!("response from {uri} exceeds {limit} byte limit"));
    let declared = match response.content_length().map(usize::try_from) {
        None => None,
        Some(Ok(length)) if length <= limit => Some(length),
        Some(_) => return Err(over_limit()),
    };
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    let mut body = Vec::with_capacity(declared.unwrap_or(0));
    response
        .take(cap)
        .read_to_end(&mut body)
        .map_err(|err| FetchError::Response(format!("reading response from {uri} failed: {err}")))?;
    if body.len() > limit {
        return Err(over_limit());
    }
    match declared {
        Some(length) if body.len() < length => Err(FetchError::Response(format!(
            "response from {uri} ended after {} of {length} bytes",
            body.len()
        ))),
        _ => Ok(body),
    }
}

/// Parses a response body as JSON.
///
/// Empty bodies and non-JSON error pages on non-2xx responses become `null`
/// so the status code stays the reported failure.
fn parse_body(status: u16, bytes: &[u8]) -> Result<Value, FetchError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Ok(value),
        Err(_) if !(200 .. 300).contains(&status) => Ok(Value::Null),
        Err(err) => Err(FetchError::Response(format!("response body is not json: {err}"))),
    }
}
