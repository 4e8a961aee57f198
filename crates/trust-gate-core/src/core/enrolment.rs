// crates/trust-gate-core/src/core/enrolment.rs
// ============================================================================
// Module: Enrolments
// Description: Caller enrolment records and membership queries.
// Purpose: Answer "does the caller hold this activated enrolment" precisely.
// Dependencies: serde, crate::core::{identifiers, services}
// ============================================================================

//! ## Overview
//! An enrolment is a caller's registered right to act under a service. It
//! carries named identifiers and an activation state. Only activated
//! enrolments grant anything; pending or inactive enrolments are ignored by
//! every query in this module.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::TrustIdentifier;
use crate::core::services::ACTIVATED_STATE;
use crate::core::services::AGENT_SERVICE;
use crate::core::services::enrolment_key;

// ============================================================================
// SECTION: Enrolment
// ============================================================================

/// Single enrolment held by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrolment {
    /// Enrolment service key.
    pub service_key: String,
    /// Identifier name to value mapping.
    pub identifiers: BTreeMap<String, String>,
    /// Activation state label.
    pub state: String,
}

impl Enrolment {
    /// Builds an enrolment with a single identifier.
    #[must_use]
    pub fn new(
        service_key: impl Into<String>,
        identifier_name: impl Into<String>,
        identifier_value: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        let mut identifiers = BTreeMap::new();
        identifiers.insert(identifier_name.into(), identifier_value.into());
        Self {
            service_key: service_key.into(),
            identifiers,
            state: state.into(),
        }
    }

    /// Returns true when the enrolment state is activated.
    #[must_use]
    pub fn is_activated(&self) -> bool {
        self.state == ACTIVATED_STATE
    }

    /// Returns the identifier value for a name.
    #[must_use]
    pub fn identifier(&self, name: &str) -> Option<&str> {
        self.identifiers.get(name).map(String::as_str)
    }
}

// ============================================================================
// SECTION: Enrolment Set
// ============================================================================

/// Enrolments held by a caller for the lifetime of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Enrolments(Vec<Enrolment>);

impl Enrolments {
    /// Creates an enrolment set.
    #[must_use]
    pub const fn new(enrolments: Vec<Enrolment>) -> Self {
        Self(enrolments)
    }

    /// Returns the agent reference number from an activated agent enrolment.
    #[must_use]
    pub fn agent_reference_number(&self) -> Option<&str> {
        self.0
            .iter()
            .filter(|enrolment| {
                enrolment.service_key == AGENT_SERVICE.service_key && enrolment.is_activated()
            })
            .find_map(|enrolment| enrolment.identifier(AGENT_SERVICE.identifier_name))
            .filter(|arn| !arn.trim().is_empty())
    }

    /// Returns true when an activated enrolment matches the identifier's
    /// service, identifier name, and exact value.
    #[must_use]
    pub fn holds_trust(&self, identifier: &TrustIdentifier) -> bool {
        let key = enrolment_key(identifier.kind());
        self.0.iter().any(|enrolment| {
            enrolment.service_key == key.service_key
                && enrolment.is_activated()
                && enrolment.identifier(key.identifier_name) == Some(identifier.value())
        })
    }
}

impl FromIterator<Enrolment> for Enrolments {
    fn from_iter<I: IntoIterator<Item = Enrolment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
