// crates/trust-gate-core/src/core/mod.rs
// ============================================================================
// Module: Trust Gate Core Types
// Description: Identifiers, enrolments, caller context, and decision outcomes.
// Purpose: Provide stable, serializable types shared by every Trust Gate layer.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types describe who is calling, which trust they are asking about, and
//! what the engine decided. These types are the canonical source of truth for
//! any derived surface (HTTP JSON, audit events).

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod caller;
pub mod enrolment;
pub mod identifiers;
pub mod outcome;
pub mod predicates;
pub mod services;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use caller::AuthContext;
pub use caller::CallerCredentials;
pub use caller::InternalId;
pub use caller::Role;
pub use enrolment::Enrolment;
pub use enrolment::Enrolments;
pub use identifiers::IdentifierError;
pub use identifiers::IdentifierKind;
pub use identifiers::TrustIdentifier;
pub use outcome::AccessQuery;
pub use outcome::AuthorizationOutcome;
pub use outcome::ClaimStatus;
pub use outcome::FailureKind;
pub use outcome::RedirectTarget;
pub use predicates::BusinessKey;
pub use predicates::EnrolmentLookup;
pub use predicates::EnrolmentPredicate;
pub use predicates::RelationshipPredicate;
pub use services::ACTIVATED_STATE;
pub use services::AGENT_SERVICE;
pub use services::DELEGATED_AUTH_RULE;
pub use services::EnrolmentKey;
pub use services::TRUST_RELATIONSHIP;
pub use services::enrolment_key;
