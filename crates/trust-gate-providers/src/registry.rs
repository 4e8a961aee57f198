// crates/trust-gate-providers/src/registry.rs
// ============================================================================
// Module: HTTP Enrolment Registry
// Description: Enrolment store client for principal user lookups.
// Purpose: Count principal users holding a trust's enrolment key.
// Dependencies: trust-gate-core, trust-gate-config, reqwest, url
// ============================================================================

//! ## Overview
//! Issues `GET {base}/enrolment-store-proxy/enrolment-store/enrolments/{key}/users`
//! with `type=principal`, where `key` is the composite
//! `service~identifier-name~identifier-value` enrolment key. A `204` means no
//! users hold the key; a `200` lists them in `principalUserIds`.
//!
//! Security posture: identifier values only appear in the request path and
//! are percent-encoded as a single path segment. Transport errors drop the
//! URL so the identifier never reaches error text.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use trust_gate_config::UpstreamConfig;
use trust_gate_core::EnrolmentLookup;
use trust_gate_core::EnrolmentRegistry;
use trust_gate_core::PrincipalLookup;
use trust_gate_core::RegistryError;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Path segments between the base URL and the enrolment key.
const ENROLMENTS_PATH: [&str; 3] = ["enrolment-store-proxy", "enrolment-store", "enrolments"];
/// Trailing path segment for the users listing.
const USERS_SEGMENT: &str = "users";

// ============================================================================
// SECTION: Registry
// ============================================================================

/// HTTP-backed enrolment registry.
pub struct HttpEnrolmentRegistry {
    /// Parsed base URL.
    base_url: Url,
    /// HTTP client configured with timeouts.
    client: Client,
}

impl HttpEnrolmentRegistry {
    /// Builds a new registry client.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Unavailable`] when the base URL is invalid or
    /// the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, RegistryError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|err| RegistryError::Unavailable(format!("invalid base url: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RegistryError::Unavailable("base url cannot be a base".to_string()));
        }
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|err| RegistryError::Unavailable(err.to_string()))?;
        Ok(Self {
            base_url,
            client,
        })
    }

    /// Builds a client from upstream configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Unavailable`] when the client cannot be built.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, RegistryError> {
        Self::new(
            &config.base_url,
            Duration::from_millis(config.connect_timeout_ms),
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    /// Builds the principal users URL for a lookup.
    fn users_url(&self, lookup: &EnrolmentLookup) -> Result<Url, RegistryError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| RegistryError::Unavailable("base url cannot be a base".to_string()))?;
            segments.pop_if_empty();
            segments.extend(ENROLMENTS_PATH);
            segments.push(&lookup.composite_key());
            segments.push(USERS_SEGMENT);
        }
        url.query_pairs_mut().clear().append_pair("type", "principal");
        Ok(url)
    }
}

#[async_trait]
impl EnrolmentRegistry for HttpEnrolmentRegistry {
    async fn lookup_principals(
        &self,
        lookup: &EnrolmentLookup,
    ) -> Result<PrincipalLookup, RegistryError> {
        let url = self.users_url(lookup)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| RegistryError::Unavailable(err.without_url().to_string()))?;
        match response.status() {
            StatusCode::NO_CONTENT => Ok(PrincipalLookup {
                principal_count: 0,
            }),
            StatusCode::OK => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|err| RegistryError::Unavailable(err.without_url().to_string()))?;
                let body: PrincipalUsersBody = serde_json::from_slice(&bytes)
                    .map_err(|err| RegistryError::InvalidResponse(err.to_string()))?;
                Ok(PrincipalLookup {
                    principal_count: body.principal_user_ids.len(),
                })
            }
            status => {
                Err(RegistryError::Unavailable(format!("enrolment store error: status {status}")))
            }
        }
    }
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Principal users listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrincipalUsersBody {
    principal_user_ids: Vec<String>,
}

// ============================================================================
// SECTION: Tests
// ============================================================================
