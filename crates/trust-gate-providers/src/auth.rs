// crates/trust-gate-providers/src/auth.rs
// ============================================================================
// Module: HTTP Authentication Provider
// Description: Auth service client for identity retrieval and predicates.
// Purpose: Map auth service responses onto the core provider contract.
// Dependencies: trust-gate-core, trust-gate-config, reqwest, serde
// ============================================================================

//! ## Overview
//! Every call is a single `POST {base}/auth/authorise` carrying the caller's
//! credential. Identity retrieval sends no predicates and asks for the
//! internal id, affinity group, and all enrolments. Predicate calls send one
//! predicate and retrieve nothing. A 401 carries the failure reason in the
//! `WWW-Authenticate` header as `MDTP detail="..."`.
//!
//! Security posture: the caller credential is forwarded as-is and never
//! logged; a missing credential fails without a network call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::Response;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use reqwest::header::WWW_AUTHENTICATE;
use serde::Deserialize;
use serde::Serialize;
use trust_gate_config::UpstreamConfig;
use trust_gate_core::AuthProvider;
use trust_gate_core::AuthProviderError;
use trust_gate_core::CallerCredentials;
use trust_gate_core::Enrolment;
use trust_gate_core::EnrolmentPredicate;
use trust_gate_core::Enrolments;
use trust_gate_core::RelationshipPredicate;
use trust_gate_core::RetrievedIdentity;

use crate::CORRELATION_HEADER;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Authorise endpoint path relative to the base URL.
const AUTHORISE_PATH: &str = "/auth/authorise";
/// Fields requested on identity retrieval.
const IDENTITY_RETRIEVALS: &[&str] = &["internalId", "affinityGroup", "allEnrolments"];

// ============================================================================
// SECTION: Provider
// ============================================================================

/// HTTP-backed authentication provider.
///
/// # Invariants
/// - Base URL is normalized without a trailing slash.
pub struct HttpAuthProvider {
    /// Auth service base URL (no trailing slash).
    base_url: String,
    /// HTTP client configured with timeouts.
    client: Client,
}

impl HttpAuthProvider {
    /// Builds a new auth provider client.
    ///
    /// # Errors
    ///
    /// Returns [`AuthProviderError::Unavailable`] when the HTTP client cannot
    /// be built.
    pub fn new(
        mut base_url: String,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, AuthProviderError> {
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()
            .map_err(|err| AuthProviderError::Unavailable(err.to_string()))?;
        let trimmed_len = base_url.trim_end_matches('/').len();
        base_url.truncate(trimmed_len);
        Ok(Self {
            base_url,
            client,
        })
    }

    /// Builds a client from upstream configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AuthProviderError::Unavailable`] when the HTTP client cannot
    /// be built.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, AuthProviderError> {
        Self::new(
            config.base_url.trim().to_string(),
            Duration::from_millis(config.connect_timeout_ms),
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    /// Builds headers forwarding the caller credential and correlation id.
    fn build_headers(credentials: &CallerCredentials) -> Result<HeaderMap, AuthProviderError> {
        let authorization =
            credentials.authorization().ok_or(AuthProviderError::NoActiveSession)?;
        let mut headers = HeaderMap::new();
        let value =
            HeaderValue::from_str(authorization).map_err(|_| AuthProviderError::NoActiveSession)?;
        headers.insert(AUTHORIZATION, value);
        if let Some(correlation_id) = credentials.correlation_id()
            && let Ok(value) = HeaderValue::from_str(correlation_id)
        {
            headers.insert(CORRELATION_HEADER, value);
        }
        Ok(headers)
    }

    /// Sends one authorise request and maps non-success statuses.
    async fn authorise(
        &self,
        credentials: &CallerCredentials,
        request: &AuthoriseRequest<'_>,
    ) -> Result<Response, AuthProviderError> {
        let headers = Self::build_headers(credentials)?;
        let response = self
            .client
            .post(format!("{}{AUTHORISE_PATH}", self.base_url))
            .headers(headers)
            .json(request)
            .send()
            .await
            .map_err(|err| AuthProviderError::Unavailable(err.to_string()))?;
        match response.status() {
            StatusCode::OK => Ok(response),
            StatusCode::UNAUTHORIZED => Err(classify_unauthorised(response.headers())),
            status => Err(AuthProviderError::Unavailable(format!(
                "auth provider error: status {status}"
            ))),
        }
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn retrieve(
        &self,
        credentials: &CallerCredentials,
    ) -> Result<RetrievedIdentity, AuthProviderError> {
        let request = AuthoriseRequest {
            authorise: Vec::new(),
            retrieve: IDENTITY_RETRIEVALS,
        };
        let response = self.authorise(credentials, &request).await?;
        let body: RetrievalBody = response
            .json()
            .await
            .map_err(|err| AuthProviderError::InvalidResponse(err.to_string()))?;
        Ok(body.into_identity())
    }

    async fn authorise_enrolment(
        &self,
        credentials: &CallerCredentials,
        predicate: &EnrolmentPredicate,
    ) -> Result<(), AuthProviderError> {
        let request = AuthoriseRequest {
            authorise: vec![WirePredicate::Enrolment(WireEnrolmentPredicate::from(predicate))],
            retrieve: &[],
        };
        self.authorise(credentials, &request).await.map(|_| ())
    }

    async fn authorise_relationship(
        &self,
        credentials: &CallerCredentials,
        predicate: &RelationshipPredicate,
    ) -> Result<(), AuthProviderError> {
        let request = AuthoriseRequest {
            authorise: vec![WirePredicate::Relationship(predicate)],
            retrieve: &[],
        };
        self.authorise(credentials, &request).await.map(|_| ())
    }
}

// ============================================================================
// SECTION: Wire Types
// ============================================================================

/// Authorise request body.
#[derive(Debug, Serialize)]
struct AuthoriseRequest<'a> {
    /// Predicates that must hold.
    authorise: Vec<WirePredicate<'a>>,
    /// Fields to retrieve.
    retrieve: &'a [&'a str],
}

/// Predicate in wire form.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WirePredicate<'a> {
    /// Enrolment with delegated auth rule.
    Enrolment(WireEnrolmentPredicate<'a>),
    /// Relationship with business keys.
    Relationship(&'a RelationshipPredicate),
}

/// Enrolment predicate in wire form.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireEnrolmentPredicate<'a> {
    enrolment: &'a str,
    identifiers: [WireIdentifier<'a>; 1],
    state: &'a str,
    delegated_auth_rule: &'a str,
}

impl<'a> From<&'a EnrolmentPredicate> for WireEnrolmentPredicate<'a> {
    fn from(predicate: &'a EnrolmentPredicate) -> Self {
        Self {
            enrolment: predicate.enrolment,
            identifiers: [WireIdentifier {
                key: predicate.identifier_name,
                value: &predicate.identifier_value,
            }],
            state: predicate.state,
            delegated_auth_rule: predicate.delegated_auth_rule,
        }
    }
}

/// Identifier key/value pair in wire form.
#[derive(Debug, Serialize)]
struct WireIdentifier<'a> {
    key: &'a str,
    value: &'a str,
}

/// Identity retrieval response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetrievalBody {
    #[serde(default)]
    internal_id: Option<String>,
    #[serde(default)]
    affinity_group: Option<String>,
    #[serde(default)]
    all_enrolments: Vec<EnrolmentRecord>,
}

impl RetrievalBody {
    fn into_identity(self) -> RetrievedIdentity {
        RetrievedIdentity {
            internal_id: self.internal_id,
            affinity_group: self.affinity_group,
            enrolments: self
                .all_enrolments
                .into_iter()
                .map(EnrolmentRecord::into_enrolment)
                .collect::<Enrolments>(),
        }
    }
}

/// Enrolment as returned by the auth service.
#[derive(Debug, Deserialize)]
struct EnrolmentRecord {
    key: String,
    #[serde(default)]
    identifiers: Vec<IdentifierRecord>,
    state: String,
}

impl EnrolmentRecord {
    fn into_enrolment(self) -> Enrolment {
        let identifiers: BTreeMap<String, String> =
            self.identifiers.into_iter().map(|id| (id.key, id.value)).collect();
        Enrolment {
            service_key: self.key,
            identifiers,
            state: self.state,
        }
    }
}

/// Enrolment identifier as returned by the auth service.
#[derive(Debug, Deserialize)]
struct IdentifierRecord {
    key: String,
    value: String,
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps a 401 response onto a provider error using the MDTP detail.
fn classify_unauthorised(headers: &HeaderMap) -> AuthProviderError {
    let detail = headers
        .get(WWW_AUTHENTICATE)
        .and_then(|value| value.to_str().ok())
        .and_then(mdtp_detail);
    match detail {
        Some(
            "MissingBearerToken"
            | "BearerTokenExpired"
            | "InvalidBearerToken"
            | "SessionRecordNotFound",
        ) => AuthProviderError::NoActiveSession,
        Some("InsufficientEnrolments") => AuthProviderError::InsufficientEnrolments,
        Some("FailedRelationship") => AuthProviderError::RelationshipNotEstablished,
        Some(other) => {
            AuthProviderError::Unavailable(format!("auth provider rejected request: {other}"))
        }
        None => AuthProviderError::Unavailable(
            "auth provider returned 401 without MDTP detail".to_string(),
        ),
    }
}

/// Extracts the quoted `detail` value from an `MDTP detail="..."` header.
fn mdtp_detail(header: &str) -> Option<&str> {
    let rest = header.trim().strip_prefix("MDTP")?;
    let start = rest.find("detail=\"")? + "detail=\"".len();
    let value = &rest[start..];
    let end = value.find('"')?;
    Some(&value[..end])
}

// ============================================================================
// SECTION: Tests
// ============================================================================
