//! Decision engine branch tests for Trust Gate core.
// crates/trust-gate-core/tests/engine_decisions.rs
// ============================================================================
// Module: Decision Engine Tests
// Description: Outcome, call-order, and fail-closed coverage per branch.
// Purpose: Pin every branch of the agent and organisation decision paths.
// ============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::sync::Arc;

use trust_gate_core::AccessQuery;
use trust_gate_core::AuthProviderError;
use trust_gate_core::AuthorizationOutcome;
use trust_gate_core::CallerCredentials;
use trust_gate_core::CheckKind;
use trust_gate_core::Enrolment;
use trust_gate_core::FailureKind;
use trust_gate_core::RedirectTarget;
use trust_gate_core::RetrievedIdentity;
use trust_gate_core::TrustIdentifier;

mod common;
use crate::common::AuthCall;
use crate::common::FakeAuthProvider;
use crate::common::FakeRegistry;
use crate::common::agent_enrolment;
use crate::common::credentials;
use crate::common::engine;
use crate::common::identity;
use crate::common::urn_enrolment;
use crate::common::utr_enrolment;

const UTR: &str = "0987654321";
const URN: &str = "XATRUST12345678";

fn trust(raw: &str) -> AccessQuery {
    AccessQuery::Trust(TrustIdentifier::classify(raw))
}

// ============================================================================
// SECTION: Agent Identity
// ============================================================================

#[tokio::test]
async fn agent_without_agent_enrolment_must_create_account() {
    let auth = Arc::new(FakeAuthProvider::resolving(identity("Agent", vec![])));
    let registry = Arc::new(FakeRegistry::with_principals(0));
    let decision =
        engine(&auth, &registry).decide(&credentials(), &AccessQuery::AgentIdentity).await;
    assert_eq!(
        decision.outcome,
        AuthorizationOutcome::Denied(RedirectTarget::CreateAgentServicesAccount)
    );
    assert_eq!(auth.calls(), vec![AuthCall::Retrieve]);
    assert!(registry.lookups().is_empty());
}

#[tokio::test]
async fn agent_with_activated_agent_enrolment_is_agent_allowed() {
    let auth = Arc::new(FakeAuthProvider::resolving(identity(
        "Agent",
        vec![agent_enrolment("SomeARN")],
    )));
    let registry = Arc::new(FakeRegistry::with_principals(0));
    let decision =
        engine(&auth, &registry).decide(&credentials(), &AccessQuery::AgentIdentity).await;
    assert_eq!(decision.outcome, AuthorizationOutcome::AgentAllowed("SomeARN".to_string()));
    assert_eq!(
        decision.trace.consulted(),
        vec![CheckKind::ResolveIdentity, CheckKind::AgentEnrolment]
    );
}

#[tokio::test]
async fn agent_with_pending_agent_enrolment_must_create_account() {
    let pending = Enrolment::new("HMRC-AS-AGENT", "AgentReferenceNumber", "SomeARN", "Pending");
    let auth = Arc::new(FakeAuthProvider::resolving(identity("Agent", vec![pending])));
    let registry = Arc::new(FakeRegistry::with_principals(0));
    let decision =
        engine(&auth, &registry).decide(&credentials(), &AccessQuery::AgentIdentity).await;
    assert_eq!(
        decision.outcome,
        AuthorizationOutcome::Denied(RedirectTarget::CreateAgentServicesAccount)
    );
}

#[tokio::test]
async fn organisation_asking_agent_identity_is_unauthorised() {
    let auth = Arc::new(FakeAuthProvider::resolving(identity(
        "Organisation",
        vec![agent_enrolment("SomeARN")],
    )));
    let registry = Arc::new(FakeRegistry::with_principals(0));
    let decision =
        engine(&auth, &registry).decide(&credentials(), &AccessQuery::AgentIdentity).await;
    assert_eq!(decision.outcome, AuthorizationOutcome::Denied(RedirectTarget::Unauthorised));
}

// ============================================================================
// SECTION: Agent Trust Path
// ============================================================================

#[tokio::test]
async fn agent_with_delegated_authority_is_allowed_without_registry_lookup() {
    let auth = Arc::new(FakeAuthProvider::resolving(identity("Agent", vec![])));
    let registry = Arc::new(FakeRegistry::with_principals(3));
    let decision = engine(&auth, &registry).decide(&credentials(), &trust(UTR)).await;
    assert_eq!(decision.outcome, AuthorizationOutcome::Allowed);
    assert!(registry.lookups().is_empty());

    let calls = auth.calls();
    assert_eq!(calls.len(), 2);
    let AuthCall::Enrolment(predicate) = &calls[1] else {
        panic!("expected enrolment predicate, got {calls:?}");
    };
    assert_eq!(predicate.enrolment, "HMRC-TERS-ORG");
    assert_eq!(predicate.identifier_name, "SAUTR");
    assert_eq!(predicate.identifier_value, UTR);
    assert_eq!(predicate.state, "Activated");
    assert_eq!(predicate.delegated_auth_rule, "trust-auth");
}

#[tokio::test]
async fn agent_urn_predicate_uses_urn_service() {
    let auth = Arc::new(FakeAuthProvider::resolving(identity("Agent", vec![])));
    let registry = Arc::new(FakeRegistry::with_principals(0));
    let decision = engine(&auth, &registry).decide(&credentials(), &trust(URN)).await;
    assert_eq!(decision.outcome, AuthorizationOutcome::Allowed);
    let calls = auth.calls();
    let AuthCall::Enrolment(predicate) = &calls[1] else {
        panic!("expected enrolment predicate, got {calls:?}");
    };
    assert_eq!(predicate.enrolment, "HMRC-TERSNT-ORG");
    assert_eq!(predicate.identifier_name, "URN");
    assert_eq!(predicate.identifier_value, URN);
}

#[tokio::test]
async fn agent_without_authority_on_unclaimed_trust_sees_trust_not_claimed() {
    let auth = Arc::new(
        FakeAuthProvider::resolving(identity("Agent", vec![]))
            .with_enrolment(Err(AuthProviderError::InsufficientEnrolments)),
    );
    let registry = Arc::new(FakeRegistry::with_principals(0));
    let decision = engine(&auth, &registry).decide(&credentials(), &trust(UTR)).await;
    assert_eq!(decision.outcome, AuthorizationOutcome::Denied(RedirectTarget::TrustNotClaimed));
    assert_eq!(
        decision.trace.consulted(),
        vec![CheckKind::ResolveIdentity, CheckKind::DelegatedAuthority, CheckKind::ClaimStatus]
    );
    let lookups = registry.lookups();
    assert_eq!(lookups.len(), 1);
    assert_eq!(lookups[0].composite_key(), "HMRC-TERS-ORG~SAUTR~0987654321");
}

#[tokio::test]
async fn agent_without_authority_on_claimed_trust_is_not_authorised() {
    let auth = Arc::new(
        FakeAuthProvider::resolving(identity("Agent", vec![]))
            .with_enrolment(Err(AuthProviderError::InsufficientEnrolments)),
    );
    let registry = Arc::new(FakeRegistry::with_principals(1));
    let decision = engine(&auth, &registry).decide(&credentials(), &trust(URN)).await;
    assert_eq!(decision.outcome, AuthorizationOutcome::Denied(RedirectTarget::AgentNotAuthorised));
    assert_eq!(registry.lookups()[0].composite_key(), "HMRC-TERSNT-ORG~URN~XATRUST12345678");
}

#[tokio::test]
async fn agent_without_authority_and_registry_outage_fails_upstream() {
    let auth = Arc::new(
        FakeAuthProvider::resolving(identity("Agent", vec![]))
            .with_enrolment(Err(AuthProviderError::InsufficientEnrolments)),
    );
    let registry = Arc::new(FakeRegistry::unavailable());
    let decision = engine(&auth, &registry).decide(&credentials(), &trust(UTR)).await;
    assert_eq!(decision.outcome, AuthorizationOutcome::Failed(FailureKind::UpstreamError));
    assert!(decision.trace.detail.is_some());
}

#[tokio::test]
async fn delegated_authority_outage_fails_without_registry_lookup() {
    let auth = Arc::new(
        FakeAuthProvider::resolving(identity("Agent", vec![]))
            .with_enrolment(Err(AuthProviderError::Unavailable("timeout".to_string()))),
    );
    let registry = Arc::new(FakeRegistry::with_principals(0));
    let decision = engine(&auth, &registry).decide(&credentials(), &trust(UTR)).await;
    assert_eq!(decision.outcome, AuthorizationOutcome::Failed(FailureKind::UpstreamError));
    assert!(registry.lookups().is_empty());
}

#[tokio::test]
async fn session_expiring_before_predicate_is_unauthenticated() {
    let auth = Arc::new(
        FakeAuthProvider::resolving(identity("Agent", vec![]))
            .with_enrolment(Err(AuthProviderError::NoActiveSession)),
    );
    let registry = Arc::new(FakeRegistry::with_principals(0));
    let decision = engine(&auth, &registry).decide(&credentials(), &trust(UTR)).await;
    assert_eq!(decision.outcome, AuthorizationOutcome::Failed(FailureKind::Unauthenticated));
}

// ============================================================================
// SECTION: Organisation Trust Path
// ============================================================================

#[tokio::test]
async fn enrolled_organisation_with_relationship_is_allowed() {
    let auth = Arc::new(FakeAuthProvider::resolving(identity(
        "Organisation",
        vec![utr_enrolment(UTR)],
    )));
    let registry = Arc::new(FakeRegistry::with_principals(1));
    let decision = engine(&auth, &registry).decide(&credentials(), &trust(UTR)).await;
    assert_eq!(decision.outcome, AuthorizationOutcome::Allowed);
    assert!(registry.lookups().is_empty());

    let calls = auth.calls();
    let AuthCall::Relationship(predicate) = &calls[1] else {
        panic!("expected relationship predicate, got {calls:?}");
    };
    assert_eq!(predicate.relationship, "Trusts");
    assert_eq!(predicate.business_keys[0].key, "utr");
    assert_eq!(predicate.business_keys[0].value, UTR);
}

#[tokio::test]
async fn enrolled_organisation_without_relationship_maintains_trust() {
    let auth = Arc::new(
        FakeAuthProvider::resolving(identity("Organisation", vec![urn_enrolment(URN)]))
            .with_relationship(Err(AuthProviderError::RelationshipNotEstablished)),
    );
    let registry = Arc::new(FakeRegistry::with_principals(0));
    let decision = engine(&auth, &registry).decide(&credentials(), &trust(URN)).await;
    assert_eq!(decision.outcome, AuthorizationOutcome::Denied(RedirectTarget::MaintainThisTrust));
    assert_eq!(
        decision.trace.consulted(),
        vec![CheckKind::ResolveIdentity, CheckKind::DirectEnrolment, CheckKind::Relationship]
    );
}

#[tokio::test]
async fn relationship_outage_fails_upstream() {
    let auth = Arc::new(
        FakeAuthProvider::resolving(identity("Organisation", vec![utr_enrolment(UTR)]))
            .with_relationship(Err(AuthProviderError::Unavailable("status 502".to_string()))),
    );
    let registry = Arc::new(FakeRegistry::with_principals(0));
    let decision = engine(&auth, &registry).decide(&credentials(), &trust(UTR)).await;
    assert_eq!(decision.outcome, AuthorizationOutcome::Failed(FailureKind::UpstreamError));
}

#[tokio::test]
async fn unenrolled_organisation_on_claimed_trust_is_claimed_by_other() {
    let auth = Arc::new(FakeAuthProvider::resolving(identity("Organisation", vec![])));
    let registry = Arc::new(FakeRegistry::with_principals(1));
    let decision = engine(&auth, &registry).decide(&credentials(), &trust(UTR)).await;
    assert_eq!(
        decision.outcome,
        AuthorizationOutcome::Denied(RedirectTarget::AlreadyClaimedByOther)
    );
    assert_eq!(auth.calls(), vec![AuthCall::Retrieve]);
}

#[tokio::test]
async fn unenrolled_organisation_on_unclaimed_trust_claims_it() {
    let auth = Arc::new(FakeAuthProvider::resolving(identity("Organisation", vec![])));
    let registry = Arc::new(FakeRegistry::with_principals(0));
    let decision = engine(&auth, &registry).decide(&credentials(), &trust(URN)).await;
    assert_eq!(decision.outcome, AuthorizationOutcome::Denied(RedirectTarget::ClaimATrust));
}

#[tokio::test]
async fn unenrolled_organisation_with_registry_outage_fails_upstream() {
    let auth = Arc::new(FakeAuthProvider::resolving(identity("Organisation", vec![])));
    let registry = Arc::new(FakeRegistry::unavailable());
    let decision = engine(&auth, &registry).decide(&credentials(), &trust(UTR)).await;
    assert_eq!(decision.outcome, AuthorizationOutcome::Failed(FailureKind::UpstreamError));
}

#[tokio::test]
async fn enrolment_for_other_trust_does_not_count() {
    let auth = Arc::new(FakeAuthProvider::resolving(identity(
        "Organisation",
        vec![utr_enrolment("1111111111")],
    )));
    let registry = Arc::new(FakeRegistry::with_principals(0));
    let decision = engine(&auth, &registry).decide(&credentials(), &trust(UTR)).await;
    assert_eq!(decision.outcome, AuthorizationOutcome::Denied(RedirectTarget::ClaimATrust));
    assert_eq!(auth.calls(), vec![AuthCall::Retrieve]);
}

// ============================================================================
// SECTION: Resolution Failures
// ============================================================================

#[tokio::test]
async fn absent_session_is_unauthenticated_on_every_query() {
    for query in [AccessQuery::AgentIdentity, trust(UTR), trust(URN)] {
        let auth = Arc::new(FakeAuthProvider::failing(AuthProviderError::NoActiveSession));
        let registry = Arc::new(FakeRegistry::with_principals(0));
        let decision =
            engine(&auth, &registry).decide(&CallerCredentials::anonymous(), &query).await;
        assert_eq!(decision.outcome, AuthorizationOutcome::Failed(FailureKind::Unauthenticated));
        assert_eq!(auth.calls(), vec![AuthCall::Retrieve]);
        assert!(registry.lookups().is_empty());
    }
}

#[tokio::test]
async fn session_without_internal_id_is_identity_incomplete() {
    let auth = Arc::new(FakeAuthProvider::resolving(RetrievedIdentity {
        internal_id: None,
        affinity_group: Some("Organisation".to_string()),
        enrolments: trust_gate_core::Enrolments::new(vec![utr_enrolment(UTR)]),
    }));
    let registry = Arc::new(FakeRegistry::with_principals(0));
    let decision = engine(&auth, &registry).decide(&credentials(), &trust(UTR)).await;
    assert_eq!(decision.outcome, AuthorizationOutcome::Failed(FailureKind::IdentityIncomplete));
    assert_eq!(auth.calls(), vec![AuthCall::Retrieve]);
}

#[tokio::test]
async fn unsupported_group_is_unauthorised() {
    let auth = Arc::new(FakeAuthProvider::resolving(identity("Individual", vec![])));
    let registry = Arc::new(FakeRegistry::with_principals(0));
    let decision = engine(&auth, &registry).decide(&credentials(), &trust(UTR)).await;
    assert_eq!(decision.outcome, AuthorizationOutcome::Denied(RedirectTarget::Unauthorised));
    assert_eq!(decision.trace.role, Some("unsupported"));
    assert_eq!(auth.calls(), vec![AuthCall::Retrieve]);
}

#[tokio::test]
async fn unsupported_group_asking_agent_identity_is_unauthorised() {
    let auth = Arc::new(FakeAuthProvider::resolving(identity(
        "Individual",
        vec![agent_enrolment("SomeARN")],
    )));
    let registry = Arc::new(FakeRegistry::with_principals(0));
    let decision =
        engine(&auth, &registry).decide(&credentials(), &AccessQuery::AgentIdentity).await;
    assert_eq!(decision.outcome, AuthorizationOutcome::Denied(RedirectTarget::Unauthorised));
    assert_eq!(decision.trace.role, Some("unsupported"));
    assert_eq!(auth.calls(), vec![AuthCall::Retrieve]);
    assert!(registry.lookups().is_empty());
}

// ============================================================================
// SECTION: Idempotence
// ============================================================================

#[tokio::test]
async fn repeated_requests_yield_identical_decisions() {
    let auth = Arc::new(
        FakeAuthProvider::resolving(identity("Agent", vec![]))
            .with_enrolment(Err(AuthProviderError::InsufficientEnrolments)),
    );
    let registry = Arc::new(FakeRegistry::with_principals(1));
    let engine = engine(&auth, &registry);
    let first = engine.decide(&credentials(), &trust(UTR)).await;
    let second = engine.decide(&credentials(), &trust(UTR)).await;
    assert_eq!(first, second);
    assert_eq!(registry.lookups().len(), 2);
}
