// crates/sort-verify-config/src/config.rs
// ============================================================================
// Module: Sort Verify Configuration
// Description: Configuration loading and validation for verification runs.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: sort-verify-core, sort-verify-providers, serde, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits
//! and rejected outright on unknown keys. A validated [`SortVerifyConfig`]
//! builds the fetcher, auth context, audit sink, and endpoint checks for a
//! run; nothing is built from a config that failed validation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use sort_verify_core::AuthContext;
use sort_verify_core::EndpointCheck;
use sort_verify_core::FileAuditSink;
use sort_verify_core::KeyPath;
use sort_verify_core::ListEndpoint;
use sort_verify_core::MultiSortMode;
use sort_verify_core::NoopAuditSink;
use sort_verify_core::SortCheckAuditSink;
use sort_verify_core::SortDirection;
use sort_verify_core::SortKey;
use sort_verify_core::SortingVerifier;
use sort_verify_core::StderrAuditSink;
use sort_verify_providers::HttpFetcherConfig;
use sort_verify_providers::HttpListFetcher;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "sort-verify.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "SORT_VERIFY_CONFIG";
/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of configured endpoints.
const MAX_ENDPOINTS: usize = 1024;
/// Maximum sortable fields per endpoint.
const MAX_FIELDS_PER_ENDPOINT: usize = 64;
/// Maximum `per_page` value requested from an endpoint.
const MAX_EXPECTED_COUNT: usize = 10_000;
/// Maximum request timeout in milliseconds.
const MAX_TIMEOUT_MS: u64 = 120_000;
/// Maximum response size limit in bytes.
const MAX_RESPONSE_BYTES: usize = 64 * 1024 * 1024;
/// Envelope applied when neither the endpoint nor the defaults set one.
const DEFAULT_ENVELOPE: &str = "results";

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Root configuration for a sort verification run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortVerifyConfig {
    /// HTTP fetcher configuration.
    #[serde(default)]
    pub http: HttpFetcherConfig,
    /// Credentials forwarded with every request.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Audit sink selection.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Values inherited by every endpoint.
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Endpoints to verify.
    #[serde(default)]
    pub endpoints: Vec<EndpointConfig>,
}

impl SortVerifyConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// An explicit `path` wins, then [`CONFIG_ENV_VAR`], then
    /// `sort-verify.toml` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_http(&self.http)?;
        self.auth.validate()?;
        self.audit.validate()?;
        self.defaults.validate()?;
        if self.endpoints.len() > MAX_ENDPOINTS {
            return Err(ConfigError::Invalid("too many endpoints".to_string()));
        }
        for endpoint in &self.endpoints {
            endpoint.validate()?;
        }
        Ok(())
    }

    /// Builds the HTTP fetcher.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the fetcher rejects the settings.
    pub fn http_fetcher(&self) -> Result<HttpListFetcher, ConfigError> {
        HttpListFetcher::new(self.http.clone())
            .map_err(|err| ConfigError::Invalid(format!("http: {err}")))
    }

    /// Builds the auth context from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the token variable is unset.
    pub fn auth_context(&self) -> Result<AuthContext, ConfigError> {
        self.auth.resolve(|name| env::var(name).ok())
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the audit file cannot be opened.
    pub fn audit_sink(&self) -> Result<Arc<dyn SortCheckAuditSink>, ConfigError> {
        self.audit.build()
    }

    /// Builds one endpoint check per configured endpoint, all sharing `auth`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when an envelope or compound setting
    /// cannot be converted.
    pub fn endpoint_checks(&self, auth: &AuthContext) -> Result<Vec<EndpointCheck>, ConfigError> {
        self.endpoints.iter().map(|endpoint| endpoint.to_check(&self.defaults, auth)).collect()
    }

    /// Builds a verifier over the HTTP fetcher with the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the fetcher or audit sink cannot be built.
    pub fn verifier(&self) -> Result<SortingVerifier<HttpListFetcher>, ConfigError> {
        Ok(SortingVerifier::new(self.http_fetcher()?).with_audit_sink(self.audit_sink()?))
    }
}

// ============================================================================
// SECTION: Auth
// ============================================================================

/// Credentials forwarded with every request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Environment variable holding a bearer token.
    #[serde(default)]
    pub token_env: Option<String>,
    /// Static request headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl AuthConfig {
    /// Validates variable and header names.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = &self.token_env
            && (name.trim().is_empty() || name.contains('='))
        {
            return Err(ConfigError::Invalid("auth.token_env is not a valid name".to_string()));
        }
        for (name, value) in &self.headers {
            if name.is_empty() || !name.bytes().all(is_header_name_byte) {
                return Err(ConfigError::Invalid(format!("auth header name `{name}` is invalid")));
            }
            if value.contains(['\r', '\n']) {
                return Err(ConfigError::Invalid(format!(
                    "auth header `{name}` value contains a line break"
                )));
            }
        }
        Ok(())
    }

    /// Builds the auth context, reading the token through `lookup`.
    ///
    /// The bearer token replaces any static `Authorization` header.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the token variable is unset or empty.
    pub fn resolve<F>(&self, lookup: F) -> Result<AuthContext, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut auth = AuthContext::anonymous();
        for (name, value) in &self.headers {
            auth = auth.with_header(name.as_str(), value.as_str());
        }
        let Some(name) = &self.token_env else {
            return Ok(auth);
        };
        let token = lookup(name)
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| ConfigError::Invalid(format!("auth token variable {name} is unset")))?;
        auth.headers.retain(|header, _| !header.eq_ignore_ascii_case("authorization"));
        Ok(auth.with_header("Authorization", format!("Bearer {}", token.trim())))
    }
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit sink kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Discard events.
    #[default]
    None,
}

/// Audit sink selection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Output path for the `file` sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates that a path is present exactly when the file sink is used.
    fn validate(&self) -> Result<(), ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::File, Some(path)) => validate_path_string("audit.path", path),
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
            (_, Some(_)) => {
                Err(ConfigError::Invalid("audit.path is only valid for the file sink".to_string()))
            }
            (_, None) => Ok(()),
        }
    }

    /// Opens the selected sink.
    fn build(&self) -> Result<Arc<dyn SortCheckAuditSink>, ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::Stderr, _) => Ok(Arc::new(StderrAuditSink)),
            (AuditSinkKind::File, Some(path)) => {
                let sink = FileAuditSink::new(Path::new(path.trim()))
                    .map_err(|err| ConfigError::Io(format!("audit file {path}: {err}")))?;
                Ok(Arc::new(sink))
            }
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
            (AuditSinkKind::None, _) => Ok(Arc::new(NoopAuditSink)),
        }
    }
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Values inherited by every endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsConfig {
    /// Dotted path to the result array; empty means the body root.
    #[serde(default = "default_envelope")]
    pub envelope: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            envelope: default_envelope(),
        }
    }
}

impl DefaultsConfig {
    /// Validates the default envelope.
    fn validate(&self) -> Result<(), ConfigError> {
        parse_envelope("defaults.envelope", &self.envelope).map(|_| ())
    }
}

/// Default envelope key.
fn default_envelope() -> String {
    DEFAULT_ENVELOPE.to_string()
}

// ============================================================================
// SECTION: Endpoints
// ============================================================================

/// Compound sort coverage as written in config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiSortSetting {
    /// Single-field checks only.
    #[default]
    None,
    /// One random pair per run, or a seeded pair when `seed` is set.
    Random,
    /// Every ordered pair of distinct fields.
    AllPairs,
    /// The explicit pair given by `pair`.
    Pair,
}

/// One endpoint to verify.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EndpointConfig {
    /// Endpoint path relative to `http.base_url`.
    pub path: String,
    /// Records the endpoint must return; sent as `per_page`.
    pub expected_count: usize,
    /// Sortable request fields.
    pub fields: Vec<String>,
    /// Envelope override; empty means the body root.
    #[serde(default)]
    pub envelope: Option<String>,
    /// Compound sort coverage.
    #[serde(default)]
    pub multi: MultiSortSetting,
    /// `(primary, secondary)` fields for `multi = "pair"`.
    #[serde(default)]
    pub pair: Option<[String; 2]>,
    /// RNG seed for `multi = "random"`.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl EndpointConfig {
    /// Validates path, count, fields, and compound settings.
    fn validate(&self) -> Result<(), ConfigError> {
        let path = self.path.trim();
        if path.is_empty() {
            return Err(ConfigError::Invalid("endpoint path must be non-empty".to_string()));
        }
        if path.contains(char::is_whitespace) || path.contains('#') {
            return Err(ConfigError::Invalid(format!("endpoint path `{path}` is invalid")));
        }
        if path.contains("order_by=") || path.contains("per_page=") {
            return Err(ConfigError::Invalid(format!(
                "endpoint {path}: order_by and per_page are added by the verifier"
            )));
        }
        if self.expected_count == 0 || self.expected_count > MAX_EXPECTED_COUNT {
            return Err(ConfigError::Invalid(format!(
                "endpoint {path}: expected_count out of range"
            )));
        }
        if self.fields.is_empty() || self.fields.len() > MAX_FIELDS_PER_ENDPOINT {
            return Err(ConfigError::Invalid(format!("endpoint {path}: fields count out of range")));
        }
        for field in &self.fields {
            validate_field(path, field)?;
        }
        if let Some(envelope) = &self.envelope {
            parse_envelope(&format!("endpoint {path}: envelope"), envelope)?;
        }
        self.validate_multi(path)
    }

    /// Validates the compound sort settings.
    fn validate_multi(&self, path: &str) -> Result<(), ConfigError> {
        if self.seed.is_some() && self.multi != MultiSortSetting::Random {
            return Err(ConfigError::Invalid(format!(
                "endpoint {path}: seed requires multi = \"random\""
            )));
        }
        match (self.multi, &self.pair) {
            (MultiSortSetting::Pair, Some([primary, secondary])) => {
                validate_field(path, primary)?;
                validate_field(path, secondary)
            }
            (MultiSortSetting::Pair, None) => Err(ConfigError::Invalid(format!(
                "endpoint {path}: multi = \"pair\" requires pair"
            ))),
            (_, Some(_)) => Err(ConfigError::Invalid(format!(
                "endpoint {path}: pair requires multi = \"pair\""
            ))),
            (MultiSortSetting::Random | MultiSortSetting::AllPairs, None)
                if self.fields.len() < 2 =>
            {
                Err(ConfigError::Invalid(format!(
                    "endpoint {path}: compound checks need at least two fields"
                )))
            }
            (_, None) => Ok(()),
        }
    }

    /// Converts to a runtime check.
    fn to_check(
        &self,
        defaults: &DefaultsConfig,
        auth: &AuthContext,
    ) -> Result<EndpointCheck, ConfigError> {
        let path = self.path.trim();
        let envelope = self.envelope.as_deref().unwrap_or(&defaults.envelope);
        let mut endpoint = ListEndpoint::new(path, self.expected_count).with_auth(auth.clone());
        if let Some(key) = parse_envelope(&format!("endpoint {path}: envelope"), envelope)? {
            endpoint = endpoint.with_envelope(key);
        }
        let multi = match (self.multi, &self.pair, self.seed) {
            (MultiSortSetting::None, _, _) => MultiSortMode::Disabled,
            (MultiSortSetting::Random, _, Some(seed)) => MultiSortMode::Seeded(seed),
            (MultiSortSetting::Random, _, None) => MultiSortMode::Random,
            (MultiSortSetting::AllPairs, _, _) => MultiSortMode::AllPairs,
            (MultiSortSetting::Pair, Some([primary, secondary]), _) => {
                MultiSortMode::Pair(primary.clone(), secondary.clone())
            }
            (MultiSortSetting::Pair, None, _) => {
                return Err(ConfigError::Invalid(format!(
                    "endpoint {path}: multi = \"pair\" requires pair"
                )));
            }
        };
        Ok(EndpointCheck::new(endpoint, self.fields.clone()).with_multi(multi))
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration or opening outputs.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the caller, the environment, or the default.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    if path.to_string_lossy().len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates the `[http]` section limits.
fn validate_http(http: &HttpFetcherConfig) -> Result<(), ConfigError> {
    if http.timeout_ms == 0 || http.timeout_ms > MAX_TIMEOUT_MS {
        return Err(ConfigError::Invalid("http.timeout_ms out of range".to_string()));
    }
    if http.max_response_bytes == 0 || http.max_response_bytes > MAX_RESPONSE_BYTES {
        return Err(ConfigError::Invalid("http.max_response_bytes out of range".to_string()));
    }
    if http.user_agent.trim().is_empty() {
        return Err(ConfigError::Invalid("http.user_agent must be non-empty".to_string()));
    }
    if let Some(base_url) = &http.base_url {
        if base_url.starts_with("http://") {
            if !http.allow_http {
                return Err(ConfigError::Invalid(
                    "http.base_url uses http:// but http.allow_http is false".to_string(),
                ));
            }
        } else if !base_url.starts_with("https://") {
            return Err(ConfigError::Invalid(
                "http.base_url must start with https:// or http://".to_string(),
            ));
        }
    }
    if let Some(hosts) = &http.allowed_hosts
        && hosts.iter().any(|host| host.trim().is_empty())
    {
        return Err(ConfigError::Invalid(
            "http.allowed_hosts entries must be non-empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates one sortable request field.
fn validate_field(path: &str, field: &str) -> Result<(), ConfigError> {
    let key = SortKey::parse(field)
        .map_err(|err| ConfigError::Invalid(format!("endpoint {path}: {err}")))?;
    if key.direction == SortDirection::Descending {
        return Err(ConfigError::Invalid(format!(
            "endpoint {path}: field `{field}` must not carry a direction prefix"
        )));
    }
    Ok(())
}

/// Parses an envelope setting; an empty value selects the body root.
fn parse_envelope(label: &str, raw: &str) -> Result<Option<KeyPath>, ConfigError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    KeyPath::parse(raw)
        .map(Some)
        .map_err(|err| ConfigError::Invalid(format!("{label} `{raw}` is invalid: {err}")))
}

/// Returns true for bytes allowed in an HTTP header name.
const fn is_header_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
        || matches!(
            byte,
            b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_'
                | b'`' | b'|' | b'~'
        )
}
