// crates/trust-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Trust Gate Interfaces
// Description: Contracts for the authentication provider and enrolment registry.
// Purpose: Define the external surfaces the decision engine depends on.
// Dependencies: async-trait, serde, thiserror, crate::core
// ============================================================================

//! ## Overview
//! The engine never talks to the network. It asks an [`AuthProvider`] who the
//! caller is and whether predicates hold, and asks an [`EnrolmentRegistry`]
//! how many principals hold a trust enrolment. Implementations must report
//! negative predicate results with the dedicated error variants so the engine
//! can tell "not granted" apart from "service broken".
//!
//! Security posture: responses from both services are untrusted input and
//! must fail closed when malformed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::caller::CallerCredentials;
use crate::core::enrolment::Enrolments;
use crate::core::predicates::EnrolmentLookup;
use crate::core::predicates::EnrolmentPredicate;
use crate::core::predicates::RelationshipPredicate;

// ============================================================================
// SECTION: Authentication Provider
// ============================================================================

/// Identity fields retrieved for the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetrievedIdentity {
    /// Caller internal identifier, when the session carries one.
    pub internal_id: Option<String>,
    /// Caller group (`Agent`, `Organisation`, or other).
    pub affinity_group: Option<String>,
    /// All enrolments held by the caller.
    pub enrolments: Enrolments,
}

/// Authentication provider errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthProviderError {
    /// No active session or the credential expired.
    #[error("no active session")]
    NoActiveSession,
    /// Session is valid but the enrolment predicate did not hold.
    #[error("insufficient enrolments")]
    InsufficientEnrolments,
    /// Session is valid but the relationship predicate did not hold.
    #[error("relationship not established")]
    RelationshipNotEstablished,
    /// Provider could not be reached or returned an unexpected status.
    #[error("auth provider unavailable: {0}")]
    Unavailable(String),
    /// Provider response could not be interpreted.
    #[error("auth provider invalid response: {0}")]
    InvalidResponse(String),
}

/// Authentication provider used by the resolver and predicate checks.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Retrieves the caller's internal id, group, and enrolments.
    ///
    /// # Errors
    ///
    /// Returns [`AuthProviderError::NoActiveSession`] when the credential is
    /// missing or expired, and other variants when the provider fails.
    async fn retrieve(
        &self,
        credentials: &CallerCredentials,
    ) -> Result<RetrievedIdentity, AuthProviderError>;

    /// Asserts a delegated authority enrolment predicate.
    ///
    /// # Errors
    ///
    /// Returns [`AuthProviderError::InsufficientEnrolments`] when the
    /// predicate does not hold.
    async fn authorise_enrolment(
        &self,
        credentials: &CallerCredentials,
        predicate: &EnrolmentPredicate,
    ) -> Result<(), AuthProviderError>;

    /// Asserts a relationship predicate.
    ///
    /// # Errors
    ///
    /// Returns [`AuthProviderError::RelationshipNotEstablished`] when the
    /// predicate does not hold.
    async fn authorise_relationship(
        &self,
        credentials: &CallerCredentials,
        predicate: &RelationshipPredicate,
    ) -> Result<(), AuthProviderError>;
}

// ============================================================================
// SECTION: Enrolment Registry
// ============================================================================

/// Result of a principal lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalLookup {
    /// Number of principals holding the enrolment.
    pub principal_count: usize,
}

/// Enrolment registry errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Registry could not be reached or returned an unexpected status.
    #[error("enrolment registry unavailable: {0}")]
    Unavailable(String),
    /// Registry response could not be interpreted.
    #[error("enrolment registry invalid response: {0}")]
    InvalidResponse(String),
}

/// Enrolment registry used by the claim status check.
#[async_trait]
pub trait EnrolmentRegistry: Send + Sync {
    /// Counts principals holding the enrolment identified by `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the registry fails.
    async fn lookup_principals(
        &self,
        lookup: &EnrolmentLookup,
    ) -> Result<PrincipalLookup, RegistryError>;
}
