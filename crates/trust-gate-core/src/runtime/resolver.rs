// crates/trust-gate-core/src/runtime/resolver.rs
// ============================================================================
// Module: Auth Context Resolver
// Description: Builds the request-scoped caller context from the provider.
// Purpose: Separate "no session" from "session without identity" failures.
// Dependencies: thiserror, crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The resolver makes one retrieval call to the [`AuthProvider`] and turns the
//! result into an [`AuthContext`]. A missing session is an authentication
//! failure; a session without an internal id is an identity anomaly reported
//! as a server error. Unknown groups resolve successfully as
//! [`Role::Unsupported`] and are denied later by the engine.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::caller::AuthContext;
use crate::core::caller::CallerCredentials;
use crate::core::caller::InternalId;
use crate::core::caller::Role;
use crate::core::outcome::FailureKind;
use crate::interfaces::AuthProvider;
use crate::interfaces::AuthProviderError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Context resolution failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No active session or expired credential.
    #[error("caller is not authenticated")]
    Unauthenticated,
    /// Session present without an internal identifier.
    #[error("session has no internal identifier")]
    IdentityIncomplete,
    /// Provider failed.
    #[error("auth provider failure: {0}")]
    Upstream(String),
}

impl ResolveError {
    /// Maps the resolution failure onto the outcome failure kind.
    #[must_use]
    pub const fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Unauthenticated => FailureKind::Unauthenticated,
            Self::IdentityIncomplete => FailureKind::IdentityIncomplete,
            Self::Upstream(_) => FailureKind::UpstreamError,
        }
    }

    /// Returns a stable label for decision traces.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::IdentityIncomplete => "identity_incomplete",
            Self::Upstream(_) => "upstream_error",
        }
    }
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Resolves caller context through an authentication provider.
pub struct AuthContextResolver<'a> {
    /// Provider queried for identity.
    provider: &'a dyn AuthProvider,
}

impl<'a> AuthContextResolver<'a> {
    /// Creates a resolver over the given provider.
    #[must_use]
    pub const fn new(provider: &'a dyn AuthProvider) -> Self {
        Self { provider }
    }

    /// Resolves the caller's internal id, role, and enrolments.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the session is missing, incomplete, or
    /// the provider fails.
    pub async fn resolve(
        &self,
        credentials: &CallerCredentials,
    ) -> Result<AuthContext, ResolveError> {
        let identity = self.provider.retrieve(credentials).await.map_err(|err| match err {
            AuthProviderError::NoActiveSession => ResolveError::Unauthenticated,
            other => ResolveError::Upstream(other.to_string()),
        })?;
        let internal_id = identity
            .internal_id
            .filter(|id| !id.trim().is_empty())
            .ok_or(ResolveError::IdentityIncomplete)?;
        Ok(AuthContext {
            internal_id: InternalId::new(internal_id),
            role: Role::from_group(identity.affinity_group.as_deref()),
            enrolments: identity.enrolments,
        })
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
