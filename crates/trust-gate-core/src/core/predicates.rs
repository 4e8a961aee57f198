// crates/trust-gate-core/src/core/predicates.rs
// ============================================================================
// Module: External Predicates
// Description: Query objects sent to the authentication provider and registry.
// Purpose: Build every external query for a trust from the service table.
// Dependencies: serde, crate::core::{identifiers, services}
// ============================================================================

//! ## Overview
//! The delegated authority, relationship, and claim status checks each send
//! one query to an external service. The query shapes here are built only
//! from [`TrustIdentifier`] and the service table, so the UTR and URN paths
//! differ in data, not in code.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::identifiers::TrustIdentifier;
use crate::core::services::ACTIVATED_STATE;
use crate::core::services::DELEGATED_AUTH_RULE;
use crate::core::services::TRUST_RELATIONSHIP;
use crate::core::services::enrolment_key;

// ============================================================================
// SECTION: Enrolment Predicate
// ============================================================================

/// Delegated authority predicate for one trust.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolmentPredicate {
    /// Enrolment service key.
    pub enrolment: &'static str,
    /// Identifier name.
    pub identifier_name: &'static str,
    /// Exact identifier value.
    pub identifier_value: String,
    /// Required enrolment state.
    pub state: &'static str,
    /// Delegation rule name.
    pub delegated_auth_rule: &'static str,
}

impl EnrolmentPredicate {
    /// Builds the delegated authority predicate for a trust.
    #[must_use]
    pub fn delegated(identifier: &TrustIdentifier) -> Self {
        let key = enrolment_key(identifier.kind());
        Self {
            enrolment: key.service_key,
            identifier_name: key.identifier_name,
            identifier_value: identifier.value().to_string(),
            state: ACTIVATED_STATE,
            delegated_auth_rule: DELEGATED_AUTH_RULE,
        }
    }
}

// ============================================================================
// SECTION: Relationship Predicate
// ============================================================================

/// Business key pair identifying a trust to the relationship service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusinessKey {
    /// Lowercase identifier kind label.
    pub key: &'static str,
    /// Identifier value.
    pub value: String,
}

/// Relationship predicate asserting verified trust ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipPredicate {
    /// Relationship name.
    pub relationship: &'static str,
    /// Business keys scoping the relationship.
    pub business_keys: Vec<BusinessKey>,
}

impl RelationshipPredicate {
    /// Builds the ownership relationship predicate for a trust.
    #[must_use]
    pub fn trust_ownership(identifier: &TrustIdentifier) -> Self {
        Self {
            relationship: TRUST_RELATIONSHIP,
            business_keys: vec![BusinessKey {
                key: identifier.kind().label(),
                value: identifier.value().to_string(),
            }],
        }
    }
}

// ============================================================================
// SECTION: Registry Lookup
// ============================================================================

/// Composite registry key for a principal lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolmentLookup {
    /// Enrolment service key.
    pub service_key: &'static str,
    /// Identifier name.
    pub identifier_name: &'static str,
    /// Identifier value.
    pub identifier_value: String,
}

impl EnrolmentLookup {
    /// Builds the registry lookup key for a trust.
    #[must_use]
    pub fn for_trust(identifier: &TrustIdentifier) -> Self {
        let key = enrolment_key(identifier.kind());
        Self {
            service_key: key.service_key,
            identifier_name: key.identifier_name,
            identifier_value: identifier.value().to_string(),
        }
    }

    /// Returns the `service~name~value` composite key.
    #[must_use]
    pub fn composite_key(&self) -> String {
        format!("{}~{}~{}", self.service_key, self.identifier_name, self.identifier_value)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
