// crates/trust-gate-core/src/core/outcome.rs
// ============================================================================
// Module: Authorization Outcomes
// Description: Queries, decision outcomes, redirect targets, and failures.
// Purpose: Define the closed set of results the decision engine may return.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every request reduces to exactly one [`AuthorizationOutcome`]. Denials are
//! expected business results and carry a symbolic [`RedirectTarget`]; the
//! mapping from target to URL lives in configuration. Failures carry a
//! [`FailureKind`] and are never rendered as redirects, with the exception
//! of `Unauthenticated`, which the boundary sends to login.
//!
//! Security posture: no variant defaults to allow; see the engine for the
//! branches that produce `Allowed`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::TrustIdentifier;

// ============================================================================
// SECTION: Query
// ============================================================================

/// Question the caller is asking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "query", content = "identifier", rename_all = "snake_case")]
pub enum AccessQuery {
    /// Is this caller an onboarded agent at all.
    AgentIdentity,
    /// May this caller act on the given trust.
    Trust(TrustIdentifier),
}

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Final decision for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum AuthorizationOutcome {
    /// Caller may proceed.
    Allowed,
    /// Caller is an onboarded agent with the given reference number.
    AgentAllowed(String),
    /// Caller must be sent to a remediation destination.
    Denied(RedirectTarget),
    /// Decision could not be made.
    Failed(FailureKind),
}

impl AuthorizationOutcome {
    /// Returns true for `Allowed` and `AgentAllowed`.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed | Self::AgentAllowed(_))
    }

    /// Returns a stable label for audit logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::AgentAllowed(_) => "agent_allowed",
            Self::Denied(_) => "denied",
            Self::Failed(_) => "failed",
        }
    }
}

/// Symbolic remediation destination for a denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectTarget {
    /// Caller must register for agent services.
    CreateAgentServicesAccount,
    /// Agent lacks delegated authority over a claimed trust.
    AgentNotAuthorised,
    /// Trust has not been claimed by its owner yet.
    TrustNotClaimed,
    /// Trust is claimed by a different principal.
    AlreadyClaimedByOther,
    /// Organisation should claim the trust.
    ClaimATrust,
    /// Organisation holds the enrolment but ownership is not verified.
    MaintainThisTrust,
    /// Caller role cannot use this service.
    Unauthorised,
}

impl RedirectTarget {
    /// All redirect targets, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::CreateAgentServicesAccount,
        Self::AgentNotAuthorised,
        Self::TrustNotClaimed,
        Self::AlreadyClaimedByOther,
        Self::ClaimATrust,
        Self::MaintainThisTrust,
        Self::Unauthorised,
    ];

    /// Returns a stable label for audit logs and config keys.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CreateAgentServicesAccount => "create_agent_services_account",
            Self::AgentNotAuthorised => "agent_not_authorised",
            Self::TrustNotClaimed => "trust_not_claimed",
            Self::AlreadyClaimedByOther => "already_claimed_by_other",
            Self::ClaimATrust => "claim_a_trust",
            Self::MaintainThisTrust => "maintain_this_trust",
            Self::Unauthorised => "unauthorised",
        }
    }
}

/// Reason a decision could not be made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No valid session; the caller must log in.
    Unauthenticated,
    /// Session present but missing the internal identifier.
    IdentityIncomplete,
    /// An external dependency failed.
    UpstreamError,
    /// Malformed request input.
    BadRequest,
}

impl FailureKind {
    /// Returns a stable label for responses and audit logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::IdentityIncomplete => "identity_incomplete",
            Self::UpstreamError => "upstream_error",
            Self::BadRequest => "bad_request",
        }
    }
}

// ============================================================================
// SECTION: Claim Status
// ============================================================================

/// Registry view of whether a trust has an owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum ClaimStatus {
    /// One or more principals hold the trust enrolment.
    AlreadyClaimed,
    /// No principal holds the trust enrolment.
    NotClaimed,
    /// Registry lookup failed.
    LookupFailed(String),
}

impl ClaimStatus {
    /// Maps a principal count onto a claim status.
    #[must_use]
    pub const fn from_principal_count(count: usize) -> Self {
        if count == 0 { Self::NotClaimed } else { Self::AlreadyClaimed }
    }

    /// Returns a stable label for decision traces.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::AlreadyClaimed => "already_claimed",
            Self::NotClaimed => "not_claimed",
            Self::LookupFailed(_) => "lookup_failed",
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
