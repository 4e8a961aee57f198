// crates/trust-gate-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Scripted providers and caller fixtures for engine tests.
// Purpose: Drive every decision branch without network access.
// Dependencies: trust-gate-core
// ============================================================================

//! ## Overview
//! The fakes answer with fixed results and record every call, so tests can
//! assert both the outcome and which external services were consulted.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(clippy::unwrap_used, reason = "Test fixtures unwrap poisoned locks.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use trust_gate_core::AuthProvider;
use trust_gate_core::AuthProviderError;
use trust_gate_core::CallerCredentials;
use trust_gate_core::DecisionEngine;
use trust_gate_core::Enrolment;
use trust_gate_core::EnrolmentLookup;
use trust_gate_core::EnrolmentPredicate;
use trust_gate_core::EnrolmentRegistry;
use trust_gate_core::Enrolments;
use trust_gate_core::PrincipalLookup;
use trust_gate_core::RegistryError;
use trust_gate_core::RelationshipPredicate;
use trust_gate_core::RetrievedIdentity;

// ============================================================================
// SECTION: Fake Auth Provider
// ============================================================================

/// External call observed by [`FakeAuthProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthCall {
    /// Identity retrieval.
    Retrieve,
    /// Delegated authority predicate.
    Enrolment(EnrolmentPredicate),
    /// Relationship predicate.
    Relationship(RelationshipPredicate),
}

/// Auth provider answering with scripted results.
pub struct FakeAuthProvider {
    identity: Result<RetrievedIdentity, AuthProviderError>,
    enrolment: Result<(), AuthProviderError>,
    relationship: Result<(), AuthProviderError>,
    calls: Mutex<Vec<AuthCall>>,
}

impl FakeAuthProvider {
    /// Creates a provider that resolves the given identity and grants both
    /// predicates.
    pub fn resolving(identity: RetrievedIdentity) -> Self {
        Self {
            identity: Ok(identity),
            enrolment: Ok(()),
            relationship: Ok(()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Creates a provider whose identity retrieval fails.
    pub fn failing(err: AuthProviderError) -> Self {
        Self {
            identity: Err(err),
            ..Self::resolving(RetrievedIdentity::default())
        }
    }

    /// Sets the delegated authority answer.
    pub fn with_enrolment(mut self, result: Result<(), AuthProviderError>) -> Self {
        self.enrolment = result;
        self
    }

    /// Sets the relationship answer.
    pub fn with_relationship(mut self, result: Result<(), AuthProviderError>) -> Self {
        self.relationship = result;
        self
    }

    /// Returns every call observed so far.
    pub fn calls(&self) -> Vec<AuthCall> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, call: AuthCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl AuthProvider for FakeAuthProvider {
    async fn retrieve(
        &self,
        _credentials: &CallerCredentials,
    ) -> Result<RetrievedIdentity, AuthProviderError> {
        self.push(AuthCall::Retrieve);
        self.identity.clone()
    }

    async fn authorise_enrolment(
        &self,
        _credentials: &CallerCredentials,
        predicate: &EnrolmentPredicate,
    ) -> Result<(), AuthProviderError> {
        self.push(AuthCall::Enrolment(predicate.clone()));
        self.enrolment.clone()
    }

    async fn authorise_relationship(
        &self,
        _credentials: &CallerCredentials,
        predicate: &RelationshipPredicate,
    ) -> Result<(), AuthProviderError> {
        self.push(AuthCall::Relationship(predicate.clone()));
        self.relationship.clone()
    }
}

// ============================================================================
// SECTION: Fake Registry
// ============================================================================

/// Enrolment registry answering with a scripted result.
pub struct FakeRegistry {
    result: Result<PrincipalLookup, RegistryError>,
    lookups: Mutex<Vec<EnrolmentLookup>>,
}

impl FakeRegistry {
    /// Registry reporting the given number of principals.
    pub fn with_principals(principal_count: usize) -> Self {
        Self {
            result: Ok(PrincipalLookup { principal_count }),
            lookups: Mutex::new(Vec::new()),
        }
    }

    /// Registry that fails every lookup.
    pub fn unavailable() -> Self {
        Self {
            result: Err(RegistryError::Unavailable("status 500".to_string())),
            lookups: Mutex::new(Vec::new()),
        }
    }

    /// Returns every lookup observed so far.
    pub fn lookups(&self) -> Vec<EnrolmentLookup> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl EnrolmentRegistry for FakeRegistry {
    async fn lookup_principals(
        &self,
        lookup: &EnrolmentLookup,
    ) -> Result<PrincipalLookup, RegistryError> {
        self.lookups.lock().unwrap().push(lookup.clone());
        self.result.clone()
    }
}

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Identity for a caller in the given group.
pub fn identity(group: &str, enrolments: Vec<Enrolment>) -> RetrievedIdentity {
    RetrievedIdentity {
        internal_id: Some("internal-id".to_string()),
        affinity_group: Some(group.to_string()),
        enrolments: Enrolments::new(enrolments),
    }
}

/// Activated agent services enrolment.
pub fn agent_enrolment(arn: &str) -> Enrolment {
    Enrolment::new("HMRC-AS-AGENT", "AgentReferenceNumber", arn, "Activated")
}

/// Activated taxable trust enrolment.
pub fn utr_enrolment(utr: &str) -> Enrolment {
    Enrolment::new("HMRC-TERS-ORG", "SAUTR", utr, "Activated")
}

/// Activated non-taxable trust enrolment.
pub fn urn_enrolment(urn: &str) -> Enrolment {
    Enrolment::new("HMRC-TERSNT-ORG", "URN", urn, "Activated")
}

/// Builds an engine over shared fakes.
pub fn engine(auth: &Arc<FakeAuthProvider>, registry: &Arc<FakeRegistry>) -> DecisionEngine {
    let auth: Arc<dyn AuthProvider> = auth.clone();
    let registry: Arc<dyn EnrolmentRegistry> = registry.clone();
    DecisionEngine::new(auth, registry)
}

/// Credentials carrying a bearer token.
pub fn credentials() -> CallerCredentials {
    CallerCredentials::new(Some("Bearer test-token".to_string()))
}
