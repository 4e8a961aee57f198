// crates/trust-gate-core/src/core/services.rs
// ============================================================================
// Module: Service Mapping Table
// Description: Enrolment service keys and identifier names per trust namespace.
// Purpose: Single source of truth for every predicate and registry key.
// Dependencies: crate::core::identifiers
// ============================================================================

//! ## Overview
//! Every external query the engine builds is keyed by the identifier kind.
//! This module is the only place that knows which enrolment service and
//! identifier name belong to each kind, so the delegated authority, claim
//! status, and relationship checks cannot drift apart.
//!
//! ## Invariants
//! - Each [`IdentifierKind`] maps to exactly one [`EnrolmentKey`].
//! - Keys are stable wire values shared with the external services.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::core::identifiers::IdentifierKind;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Enrolment state that grants rights.
pub const ACTIVATED_STATE: &str = "Activated";

/// Delegated authority rule evaluated for agent callers.
pub const DELEGATED_AUTH_RULE: &str = "trust-auth";

/// Relationship name asserted for organisation callers.
pub const TRUST_RELATIONSHIP: &str = "Trusts";

/// Agent services enrolment carrying the agent reference number.
pub const AGENT_SERVICE: EnrolmentKey = EnrolmentKey {
    service_key: "HMRC-AS-AGENT",
    identifier_name: "AgentReferenceNumber",
};

/// Taxable trust enrolment keyed by UTR.
const UTR_SERVICE: EnrolmentKey = EnrolmentKey {
    service_key: "HMRC-TERS-ORG",
    identifier_name: "SAUTR",
};

/// Non-taxable trust enrolment keyed by URN.
const URN_SERVICE: EnrolmentKey = EnrolmentKey {
    service_key: "HMRC-TERSNT-ORG",
    identifier_name: "URN",
};

// ============================================================================
// SECTION: Types
// ============================================================================

/// Enrolment service key and identifier name pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EnrolmentKey {
    /// Enrolment service key.
    pub service_key: &'static str,
    /// Identifier name within the enrolment.
    pub identifier_name: &'static str,
}

/// Returns the enrolment key for an identifier kind.
#[must_use]
pub const fn enrolment_key(kind: IdentifierKind) -> EnrolmentKey {
    match kind {
        IdentifierKind::Utr => UTR_SERVICE,
        IdentifierKind::Urn => URN_SERVICE,
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
