// crates/trust-gate-config/src/config.rs
// ============================================================================
// Module: Trust Gate Configuration
// Description: Configuration loading and validation for Trust Gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: trust-gate-core, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed: the server never starts
//! with an unresolvable redirect or an unusable upstream URL.
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use trust_gate_core::RedirectTarget;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "trust-gate.toml";
/// Environment variable naming the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "TRUST_GATE_CONFIG";
/// Maximum config file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default HTTP bind address.
pub(crate) const DEFAULT_BIND: &str = "127.0.0.1:9781";
/// Default maximum request body size in bytes.
pub(crate) const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;
/// Upper bound for the request body limit.
pub(crate) const MAX_MAX_BODY_BYTES: usize = 1024 * 1024;
/// Default upstream connect timeout.
pub(crate) const DEFAULT_UPSTREAM_CONNECT_TIMEOUT_MS: u64 = 500;
/// Default upstream request timeout.
pub(crate) const DEFAULT_UPSTREAM_REQUEST_TIMEOUT_MS: u64 = 2_000;
/// Minimum upstream connect timeout.
pub const MIN_UPSTREAM_CONNECT_TIMEOUT_MS: u64 = 100;
/// Maximum upstream connect timeout.
pub const MAX_UPSTREAM_CONNECT_TIMEOUT_MS: u64 = 10_000;
/// Minimum upstream request timeout.
pub const MIN_UPSTREAM_REQUEST_TIMEOUT_MS: u64 = 500;
/// Maximum upstream request timeout.
pub const MAX_UPSTREAM_REQUEST_TIMEOUT_MS: u64 = 30_000;
/// Maximum number of configured access codes.
pub const MAX_ACCESS_CODES: usize = 256;
/// Maximum access code length in bytes.
pub const MAX_ACCESS_CODE_LENGTH: usize = 128;
/// Maximum redirect or base URL length.
pub(crate) const MAX_URL_LENGTH: usize = 2048;

// ============================================================================
// SECTION: Top-Level Config
// ============================================================================

/// Trust Gate configuration loaded from `trust-gate.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct TrustGateConfig {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Authentication provider endpoint.
    pub auth_provider: UpstreamConfig,
    /// Enrolment store endpoint.
    pub enrolment_store: UpstreamConfig,
    /// Redirect URL per denial target.
    pub redirects: RedirectConfig,
    /// Access-code allow-list.
    #[serde(default)]
    pub access_codes: AccessCodeConfig,
}

impl TrustGateConfig {
    /// Loads configuration from disk using the default resolution rules.
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
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
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
        self.server.validate()?;
        self.auth_provider.validate("auth_provider")?;
        self.enrolment_store.validate("enrolment_store")?;
        self.redirects.validate()?;
        self.access_codes.validate()?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (`host:port`).
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Audit logging configuration.
    #[serde(default)]
    pub audit: ServerAuditConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
            audit: ServerAuditConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Returns the parsed bind address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the bind address is invalid.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid("server.bind is not a valid address".to_string()))
    }

    /// Validates server configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.bind_addr()?;
        if self.max_body_bytes == 0 || self.max_body_bytes > MAX_MAX_BODY_BYTES {
            return Err(ConfigError::Invalid(format!(
                "server.max_body_bytes must be between 1 and {MAX_MAX_BODY_BYTES}"
            )));
        }
        self.audit.validate()
    }
}

/// Audit logging configuration for decision events.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerAuditConfig {
    /// Enable structured audit logging.
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    /// Optional audit log path (JSON lines); stderr when absent.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for ServerAuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            path: None,
        }
    }
}

impl ServerAuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("server.audit.path", path)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Upstreams
// ============================================================================

/// Upstream HTTP service endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the service.
    pub base_url: String,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_upstream_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Request timeout in milliseconds.
    #[serde(default = "default_upstream_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl UpstreamConfig {
    /// Creates an upstream config with default timeouts.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout_ms: default_upstream_connect_timeout_ms(),
            request_timeout_ms: default_upstream_request_timeout_ms(),
        }
    }

    /// Validates the upstream settings under the given section name.
    fn validate(&self, section: &str) -> Result<(), ConfigError> {
        validate_http_url(&format!("{section}.base_url"), &self.base_url)?;
        validate_timeout_range(
            &format!("{section}.connect_timeout_ms"),
            self.connect_timeout_ms,
            MIN_UPSTREAM_CONNECT_TIMEOUT_MS,
            MAX_UPSTREAM_CONNECT_TIMEOUT_MS,
        )?;
        validate_timeout_range(
            &format!("{section}.request_timeout_ms"),
            self.request_timeout_ms,
            MIN_UPSTREAM_REQUEST_TIMEOUT_MS,
            MAX_UPSTREAM_REQUEST_TIMEOUT_MS,
        )?;
        Ok(())
    }
}

// ============================================================================
// SECTION: Redirects
// ============================================================================

/// Absolute redirect URLs for login and every denial target.
#[derive(Debug, Clone, Deserialize)]
pub struct RedirectConfig {
    /// Login page for unauthenticated callers.
    pub login: String,
    /// Agent services account registration.
    pub create_agent_services_account: String,
    /// Agent lacks delegated authority.
    pub agent_not_authorised: String,
    /// Trust has not been claimed yet.
    pub trust_not_claimed: String,
    /// Trust claimed by another principal.
    pub already_claimed_by_other: String,
    /// Claim the trust.
    pub claim_a_trust: String,
    /// Verify ownership of an enrolled trust.
    pub maintain_this_trust: String,
    /// Unsupported caller role.
    pub unauthorised: String,
}

impl RedirectConfig {
    /// Returns the configured URL for a denial target.
    #[must_use]
    pub fn url_for(&self, target: RedirectTarget) -> &str {
        match target {
            RedirectTarget::CreateAgentServicesAccount => &self.create_agent_services_account,
            RedirectTarget::AgentNotAuthorised => &self.agent_not_authorised,
            RedirectTarget::TrustNotClaimed => &self.trust_not_claimed,
            RedirectTarget::AlreadyClaimedByOther => &self.already_claimed_by_other,
            RedirectTarget::ClaimATrust => &self.claim_a_trust,
            RedirectTarget::MaintainThisTrust => &self.maintain_this_trust,
            RedirectTarget::Unauthorised => &self.unauthorised,
        }
    }

    /// Returns the login URL.
    #[must_use]
    pub fn login_url(&self) -> &str {
        &self.login
    }

    /// Validates every redirect URL.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_http_url("redirects.login", &self.login)?;
        for target in RedirectTarget::ALL {
            validate_http_url(&format!("redirects.{}", target.label()), self.url_for(target))?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Access Codes
// ============================================================================

/// Static access-code allow-list.
#[derive(Clone, Default, Deserialize)]
pub struct AccessCodeConfig {
    /// Accepted codes.
    #[serde(default)]
    pub codes: Vec<String>,
}

impl std::fmt::Debug for AccessCodeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessCodeConfig").field("codes", &self.codes.len()).finish()
    }
}

impl AccessCodeConfig {
    /// Validates the access-code list.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.codes.len() > MAX_ACCESS_CODES {
            return Err(ConfigError::Invalid(format!(
                "access_codes.codes exceeds {MAX_ACCESS_CODES} entries"
            )));
        }
        let mut seen = BTreeSet::new();
        for code in &self.codes {
            if code.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "access_codes.codes entries must be non-empty".to_string(),
                ));
            }
            if code.len() > MAX_ACCESS_CODE_LENGTH {
                return Err(ConfigError::Invalid(format!(
                    "access_codes.codes entries must be at most {MAX_ACCESS_CODE_LENGTH} bytes"
                )));
            }
            if !seen.insert(code.as_str()) {
                return Err(ConfigError::Invalid(
                    "access_codes.codes contains duplicate entries".to_string(),
                ));
            }
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
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

/// Resolves the config path from CLI or environment defaults.
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

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
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
    validate_path(Path::new(trimmed))
        .map_err(|_| ConfigError::Invalid(format!("{field} exceeds path length limits")))
}

/// Validates an absolute http(s) URL.
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} is required")));
    }
    if trimmed.len() > MAX_URL_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    let url = Url::parse(trimmed)
        .map_err(|err| ConfigError::Invalid(format!("{field} is not a valid url: {err}")))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(()),
        "http" | "https" => Err(ConfigError::Invalid(format!("{field} must include a host"))),
        _ => Err(ConfigError::Invalid(format!("{field} must use http or https"))),
    }
}

/// Validates a timeout value against an inclusive range.
fn validate_timeout_range(
    field: &str,
    value_ms: u64,
    min_ms: u64,
    max_ms: u64,
) -> Result<(), ConfigError> {
    if value_ms < min_ms || value_ms > max_ms {
        return Err(ConfigError::Invalid(format!(
            "{field} must be between {min_ms} and {max_ms} milliseconds",
        )));
    }
    Ok(())
}

/// Default HTTP bind address.
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

/// Default maximum request body size in bytes.
pub(crate) const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Audit logging is on unless disabled.
pub(crate) const fn default_audit_enabled() -> bool {
    true
}

/// Default upstream connect timeout in milliseconds.
pub(crate) const fn default_upstream_connect_timeout_ms() -> u64 {
    DEFAULT_UPSTREAM_CONNECT_TIMEOUT_MS
}

/// Default upstream request timeout in milliseconds.
pub(crate) const fn default_upstream_request_timeout_ms() -> u64 {
    DEFAULT_UPSTREAM_REQUEST_TIMEOUT_MS
}

// ============================================================================
// SECTION: Tests
// ============================================================================
