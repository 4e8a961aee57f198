// crates/trust-gate-core/src/core/caller.rs
// ============================================================================
// Module: Caller Context
// Description: Caller credentials, roles, and the resolved auth context.
// Purpose: Carry request-scoped identity from the resolver to the engine.
// Dependencies: serde, crate::core::enrolment
// ============================================================================

//! ## Overview
//! [`CallerCredentials`] is what the boundary hands to the engine: an opaque
//! credential to forward upstream. [`AuthContext`] is what the resolver hands
//! back: the caller's internal id, role, and enrolments. Both live for one
//! request and are never persisted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::enrolment::Enrolments;

// ============================================================================
// SECTION: Credentials
// ============================================================================

/// Caller credentials forwarded to the authentication provider.
///
/// # Invariants
/// - The authorization value is never printed by `Debug`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CallerCredentials {
    /// Raw `Authorization` header value presented by the caller.
    authorization: Option<String>,
    /// Sanitized client correlation identifier.
    correlation_id: Option<String>,
}

impl CallerCredentials {
    /// Creates credentials from an optional authorization header value.
    #[must_use]
    pub fn new(authorization: Option<String>) -> Self {
        let authorization = authorization.filter(|value| !value.trim().is_empty());
        Self {
            authorization,
            correlation_id: None,
        }
    }

    /// Returns credentials with no authorization value.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Returns a copy carrying a sanitized correlation identifier.
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: Option<String>) -> Self {
        self.correlation_id = correlation_id;
        self
    }

    /// Returns the authorization header value, if any.
    #[must_use]
    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    /// Returns the correlation identifier, if any.
    #[must_use]
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }
}

impl fmt::Debug for CallerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallerCredentials")
            .field("authorization", &self.authorization.as_ref().map(|_| "<redacted>"))
            .field("correlation_id", &self.correlation_id)
            .finish()
    }
}

// ============================================================================
// SECTION: Identity
// ============================================================================

/// Caller internal identifier issued by the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InternalId(String);

impl InternalId {
    /// Creates a new internal identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Caller role derived from the provider's group value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "group", rename_all = "snake_case")]
pub enum Role {
    /// Agent acting on behalf of a client.
    Agent,
    /// Organisation acting for itself.
    Organisation,
    /// Any other group; always denied.
    Unsupported(String),
}

impl Role {
    /// Maps a provider group value onto a role.
    #[must_use]
    pub fn from_group(group: Option<&str>) -> Self {
        match group {
            Some("Agent") => Self::Agent,
            Some("Organisation") => Self::Organisation,
            Some(other) => Self::Unsupported(other.to_string()),
            None => Self::Unsupported("none".to_string()),
        }
    }

    /// Returns a stable label for audit logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Agent => "agent",
            Self::Organisation => "organisation",
            Self::Unsupported(_) => "unsupported",
        }
    }
}

/// Resolved caller context for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Caller internal identifier.
    pub internal_id: InternalId,
    /// Caller role.
    pub role: Role,
    /// Enrolments held by the caller.
    pub enrolments: Enrolments,
}

// ============================================================================
// SECTION: Tests
// ============================================================================
