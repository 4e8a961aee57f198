// crates/trust-gate-core/src/runtime/checks.rs
// ============================================================================
// Module: Trust Checks
// Description: Delegated authority, claim status, and relationship checks.
// Purpose: Turn provider responses into explicit three-way check results.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Each checker issues exactly one external call and returns a tagged result
//! that separates a positive answer, a negative answer, and a failure. A
//! negative predicate result is a normal business answer and never an error.
//! Checkers never retry.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::caller::CallerCredentials;
use crate::core::identifiers::TrustIdentifier;
use crate::core::outcome::ClaimStatus;
use crate::core::outcome::FailureKind;
use crate::core::predicates::EnrolmentLookup;
use crate::core::predicates::EnrolmentPredicate;
use crate::core::predicates::RelationshipPredicate;
use crate::interfaces::AuthProvider;
use crate::interfaces::AuthProviderError;
use crate::interfaces::EnrolmentRegistry;

// ============================================================================
// SECTION: Result Types
// ============================================================================

/// Predicate check failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckFailure {
    /// Session expired between resolution and the predicate call.
    SessionExpired,
    /// Provider failed or answered with an unexpected result.
    Upstream(String),
}

impl CheckFailure {
    /// Maps the failure onto the outcome failure kind.
    #[must_use]
    pub const fn failure_kind(&self) -> FailureKind {
        match self {
            Self::SessionExpired => FailureKind::Unauthenticated,
            Self::Upstream(_) => FailureKind::UpstreamError,
        }
    }

    /// Returns the failure detail for audit logs.
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::SessionExpired => "session expired during check".to_string(),
            Self::Upstream(reason) => reason.clone(),
        }
    }

    /// Maps provider errors that are not a negative predicate result.
    fn from_provider(err: AuthProviderError) -> Self {
        match err {
            AuthProviderError::NoActiveSession => Self::SessionExpired,
            other => Self::Upstream(other.to_string()),
        }
    }
}

/// Delegated authority check result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DelegatedAuthority {
    /// Agent holds delegated authority for the trust.
    Granted,
    /// Agent lacks delegated authority for the trust.
    NotGranted,
    /// Check could not be completed.
    Failed(CheckFailure),
}

impl DelegatedAuthority {
    /// Returns a stable label for decision traces.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::NotGranted => "not_granted",
            Self::Failed(_) => "failed",
        }
    }
}

/// Relationship check result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relationship {
    /// Ownership relationship verified.
    Established,
    /// Ownership relationship not verified.
    NotEstablished,
    /// Check could not be completed.
    Failed(CheckFailure),
}

impl Relationship {
    /// Returns a stable label for decision traces.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Established => "established",
            Self::NotEstablished => "not_established",
            Self::Failed(_) => "failed",
        }
    }
}

// ============================================================================
// SECTION: Delegated Authority
// ============================================================================

/// Asks the provider whether an agent holds delegated authority for a trust.
pub struct DelegatedAuthorityChecker<'a> {
    /// Provider asserting the predicate.
    provider: &'a dyn AuthProvider,
}

impl<'a> DelegatedAuthorityChecker<'a> {
    /// Creates a checker over the given provider.
    #[must_use]
    pub const fn new(provider: &'a dyn AuthProvider) -> Self {
        Self { provider }
    }

    /// Checks delegated authority for the exact identifier.
    pub async fn check(
        &self,
        credentials: &CallerCredentials,
        identifier: &TrustIdentifier,
    ) -> DelegatedAuthority {
        let predicate = EnrolmentPredicate::delegated(identifier);
        match self.provider.authorise_enrolment(credentials, &predicate).await {
            Ok(()) => DelegatedAuthority::Granted,
            Err(AuthProviderError::InsufficientEnrolments) => DelegatedAuthority::NotGranted,
            Err(err) => DelegatedAuthority::Failed(CheckFailure::from_provider(err)),
        }
    }
}

// ============================================================================
// SECTION: Claim Status
// ============================================================================

/// Asks the enrolment registry whether a trust has been claimed.
pub struct ClaimStatusChecker<'a> {
    /// Registry queried for principals.
    registry: &'a dyn EnrolmentRegistry,
}

impl<'a> ClaimStatusChecker<'a> {
    /// Creates a checker over the given registry.
    #[must_use]
    pub const fn new(registry: &'a dyn EnrolmentRegistry) -> Self {
        Self { registry }
    }

    /// Returns the claim status for the identifier.
    pub async fn check(&self, identifier: &TrustIdentifier) -> ClaimStatus {
        let lookup = EnrolmentLookup::for_trust(identifier);
        match self.registry.lookup_principals(&lookup).await {
            Ok(found) => ClaimStatus::from_principal_count(found.principal_count),
            Err(err) => ClaimStatus::LookupFailed(err.to_string()),
        }
    }
}

// ============================================================================
// SECTION: Relationship
// ============================================================================

/// Asks the provider whether the caller's trust ownership is verified.
pub struct RelationshipChecker<'a> {
    /// Provider asserting the predicate.
    provider: &'a dyn AuthProvider,
}

impl<'a> RelationshipChecker<'a> {
    /// Creates a checker over the given provider.
    #[must_use]
    pub const fn new(provider: &'a dyn AuthProvider) -> Self {
        Self { provider }
    }

    /// Checks the ownership relationship for the exact identifier.
    pub async fn check(
        &self,
        credentials: &CallerCredentials,
        identifier: &TrustIdentifier,
    ) -> Relationship {
        let predicate = RelationshipPredicate::trust_ownership(identifier);
        match self.provider.authorise_relationship(credentials, &predicate).await {
            Ok(()) => Relationship::Established,
            Err(AuthProviderError::RelationshipNotEstablished) => Relationship::NotEstablished,
            Err(err) => Relationship::Failed(CheckFailure::from_provider(err)),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
