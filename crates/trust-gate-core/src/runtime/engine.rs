// crates/trust-gate-core/src/runtime/engine.rs
// ============================================================================
// Module: Trust Gate Decision Engine
// Description: Per-request orchestration of resolver and trust checks.
// Purpose: Reduce caller identity and check results to one outcome.
// Dependencies: serde, crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The decision engine is the single canonical decision path. Every HTTP
//! route calls [`DecisionEngine::decide`], which runs the resolver, dispatches
//! on role, and consults at most one trust check per branch. The only
//! two-step sequence is on the agent path, where a negative delegated
//! authority answer is followed by a claim status lookup to pick the
//! redirect.
//!
//! Security posture: `Allowed` is only returned after a positive delegated
//! authority or relationship answer for the exact identifier requested, and
//! `AgentAllowed` only after an activated agent enrolment is found.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde::Serialize;

use crate::core::caller::AuthContext;
use crate::core::caller::CallerCredentials;
use crate::core::caller::Role;
use crate::core::identifiers::IdentifierKind;
use crate::core::identifiers::TrustIdentifier;
use crate::core::outcome::AccessQuery;
use crate::core::outcome::AuthorizationOutcome;
use crate::core::outcome::ClaimStatus;
use crate::core::outcome::FailureKind;
use crate::core::outcome::RedirectTarget;
use crate::interfaces::AuthProvider;
use crate::interfaces::EnrolmentRegistry;
use crate::runtime::checks::CheckFailure;
use crate::runtime::checks::ClaimStatusChecker;
use crate::runtime::checks::DelegatedAuthority;
use crate::runtime::checks::DelegatedAuthorityChecker;
use crate::runtime::checks::Relationship;
use crate::runtime::checks::RelationshipChecker;
use crate::runtime::resolver::AuthContextResolver;
use crate::runtime::resolver::ResolveError;

// ============================================================================
// SECTION: Decision Trace
// ============================================================================

/// Step consulted while deciding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// Auth context resolution.
    ResolveIdentity,
    /// Agent services enrolment lookup in the caller's enrolments.
    AgentEnrolment,
    /// Trust enrolment lookup in the caller's enrolments.
    DirectEnrolment,
    /// Delegated authority predicate.
    DelegatedAuthority,
    /// Registry claim status lookup.
    ClaimStatus,
    /// Ownership relationship predicate.
    Relationship,
}

/// One consulted step and its result label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckRecord {
    /// Step consulted.
    pub check: CheckKind,
    /// Stable result label.
    pub result: &'static str,
}

/// Ordered record of what the engine consulted for one request.
///
/// # Invariants
/// - Records appear in the order the steps ran.
/// - The trace never carries identifier values or credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecisionTrace {
    /// Role label, once resolved.
    pub role: Option<&'static str>,
    /// Identifier kind for trust queries.
    pub identifier_kind: Option<IdentifierKind>,
    /// Consulted steps in order.
    pub checks: Vec<CheckRecord>,
    /// Failure detail, when the decision failed.
    pub detail: Option<String>,
}

impl DecisionTrace {
    /// Creates an empty trace for a query.
    fn for_query(query: &AccessQuery) -> Self {
        Self {
            identifier_kind: match query {
                AccessQuery::AgentIdentity => None,
                AccessQuery::Trust(identifier) => Some(identifier.kind()),
            },
            ..Self::default()
        }
    }

    /// Appends a consulted step.
    fn record(&mut self, check: CheckKind, result: &'static str) {
        self.checks.push(CheckRecord { check, result });
    }

    /// Returns the consulted step kinds in order.
    #[must_use]
    pub fn consulted(&self) -> Vec<CheckKind> {
        self.checks.iter().map(|record| record.check).collect()
    }
}

/// Engine output: the outcome and how it was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Final outcome.
    pub outcome: AuthorizationOutcome,
    /// Consulted steps.
    pub trace: DecisionTrace,
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Authorization decision engine.
#[derive(Clone)]
pub struct DecisionEngine {
    /// Authentication provider.
    auth: Arc<dyn AuthProvider>,
    /// Enrolment registry.
    registry: Arc<dyn EnrolmentRegistry>,
}

impl DecisionEngine {
    /// Creates an engine over the given providers.
    #[must_use]
    pub fn new(auth: Arc<dyn AuthProvider>, registry: Arc<dyn EnrolmentRegistry>) -> Self {
        Self { auth, registry }
    }

    /// Resolves the caller context without deciding.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the session is missing, incomplete, or
    /// the provider fails.
    pub async fn resolve(
        &self,
        credentials: &CallerCredentials,
    ) -> Result<AuthContext, ResolveError> {
        AuthContextResolver::new(self.auth.as_ref()).resolve(credentials).await
    }

    /// Decides whether the caller may proceed with the query.
    pub async fn decide(&self, credentials: &CallerCredentials, query: &AccessQuery) -> Decision {
        let mut trace = DecisionTrace::for_query(query);
        let outcome = self.evaluate(credentials, query, &mut trace).await;
        Decision { outcome, trace }
    }

    /// Runs the decision tree, recording each step in `trace`.
    async fn evaluate(
        &self,
        credentials: &CallerCredentials,
        query: &AccessQuery,
        trace: &mut DecisionTrace,
    ) -> AuthorizationOutcome {
        let context = match self.resolve(credentials).await {
            Ok(context) => {
                trace.record(CheckKind::ResolveIdentity, "resolved");
                context
            }
            Err(err) => {
                trace.record(CheckKind::ResolveIdentity, err.label());
                trace.detail = Some(err.to_string());
                return AuthorizationOutcome::Failed(err.failure_kind());
            }
        };
        trace.role = Some(context.role.label());

        match (&context.role, query) {
            (Role::Unsupported(_), _) | (Role::Organisation, AccessQuery::AgentIdentity) => {
                AuthorizationOutcome::Denied(RedirectTarget::Unauthorised)
            }
            (Role::Agent, AccessQuery::AgentIdentity) => agent_identity(&context, trace),
            (Role::Agent, AccessQuery::Trust(identifier)) => {
                self.agent_trust(credentials, identifier, trace).await
            }
            (Role::Organisation, AccessQuery::Trust(identifier)) => {
                self.organisation_trust(credentials, &context, identifier, trace).await
            }
        }
    }

    /// Agent path for a specific trust.
    async fn agent_trust(
        &self,
        credentials: &CallerCredentials,
        identifier: &TrustIdentifier,
        trace: &mut DecisionTrace,
    ) -> AuthorizationOutcome {
        let authority =
            DelegatedAuthorityChecker::new(self.auth.as_ref()).check(credentials, identifier).await;
        trace.record(CheckKind::DelegatedAuthority, authority.label());
        match authority {
            DelegatedAuthority::Granted => AuthorizationOutcome::Allowed,
            DelegatedAuthority::Failed(failure) => check_failed(&failure, trace),
            DelegatedAuthority::NotGranted => match self.claim_status(identifier, trace).await {
                ClaimStatus::NotClaimed => {
                    AuthorizationOutcome::Denied(RedirectTarget::TrustNotClaimed)
                }
                ClaimStatus::AlreadyClaimed => {
                    AuthorizationOutcome::Denied(RedirectTarget::AgentNotAuthorised)
                }
                ClaimStatus::LookupFailed(reason) => lookup_failed(reason, trace),
            },
        }
    }

    /// Organisation path for a specific trust.
    async fn organisation_trust(
        &self,
        credentials: &CallerCredentials,
        context: &AuthContext,
        identifier: &TrustIdentifier,
        trace: &mut DecisionTrace,
    ) -> AuthorizationOutcome {
        let enrolled = context.enrolments.holds_trust(identifier);
        trace.record(CheckKind::DirectEnrolment, if enrolled { "held" } else { "not_held" });
        if enrolled {
            let relationship =
                RelationshipChecker::new(self.auth.as_ref()).check(credentials, identifier).await;
            trace.record(CheckKind::Relationship, relationship.label());
            return match relationship {
                Relationship::Established => AuthorizationOutcome::Allowed,
                Relationship::NotEstablished => {
                    AuthorizationOutcome::Denied(RedirectTarget::MaintainThisTrust)
                }
                Relationship::Failed(failure) => check_failed(&failure, trace),
            };
        }
        match self.claim_status(identifier, trace).await {
            ClaimStatus::AlreadyClaimed => {
                AuthorizationOutcome::Denied(RedirectTarget::AlreadyClaimedByOther)
            }
            ClaimStatus::NotClaimed => AuthorizationOutcome::Denied(RedirectTarget::ClaimATrust),
            ClaimStatus::LookupFailed(reason) => lookup_failed(reason, trace),
        }
    }

    /// Runs the claim status check and records it.
    async fn claim_status(
        &self,
        identifier: &TrustIdentifier,
        trace: &mut DecisionTrace,
    ) -> ClaimStatus {
        let status = ClaimStatusChecker::new(self.registry.as_ref()).check(identifier).await;
        trace.record(CheckKind::ClaimStatus, status.label());
        status
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Agent path when no trust is in scope.
fn agent_identity(context: &AuthContext, trace: &mut DecisionTrace) -> AuthorizationOutcome {
    if let Some(arn) = context.enrolments.agent_reference_number() {
        trace.record(CheckKind::AgentEnrolment, "present");
        AuthorizationOutcome::AgentAllowed(arn.to_string())
    } else {
        trace.record(CheckKind::AgentEnrolment, "absent");
        AuthorizationOutcome::Denied(RedirectTarget::CreateAgentServicesAccount)
    }
}

/// Converts a predicate failure into a failed outcome.
fn check_failed(failure: &CheckFailure, trace: &mut DecisionTrace) -> AuthorizationOutcome {
    trace.detail = Some(failure.detail());
    AuthorizationOutcome::Failed(failure.failure_kind())
}

/// Converts a registry failure into a failed outcome.
fn lookup_failed(reason: String, trace: &mut DecisionTrace) -> AuthorizationOutcome {
    trace.detail = Some(reason);
    AuthorizationOutcome::Failed(FailureKind::UpstreamError)
}
