// crates/trust-gate-core/src/lib.rs
// ============================================================================
// Module: Trust Gate Core Library
// Description: Public API surface for the Trust Gate core.
// Purpose: Expose core types, provider interfaces, and the decision engine.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Trust Gate core decides whether an authenticated caller may act on a trust
//! identified by a UTR or URN. It combines the caller's identity, enrolments,
//! delegated authority, claim status, and relationship records into a single
//! [`AuthorizationOutcome`]. The core performs no I/O of its own and reaches
//! external services only through the traits in [`interfaces`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::AuthProvider;
pub use interfaces::AuthProviderError;
pub use interfaces::EnrolmentRegistry;
pub use interfaces::PrincipalLookup;
pub use interfaces::RegistryError;
pub use interfaces::RetrievedIdentity;
pub use runtime::AccessCodeAuthoriser;
pub use runtime::AccessCodeError;
pub use runtime::AuthContextResolver;
pub use runtime::CheckFailure;
pub use runtime::CheckKind;
pub use runtime::CheckRecord;
pub use runtime::ClaimStatusChecker;
pub use runtime::Decision;
pub use runtime::DecisionEngine;
pub use runtime::DecisionTrace;
pub use runtime::DelegatedAuthority;
pub use runtime::DelegatedAuthorityChecker;
pub use runtime::Relationship;
pub use runtime::RelationshipChecker;
pub use runtime::ResolveError;
