// crates/trust-gate-core/src/core/identifiers.rs
// ============================================================================
// Module: Trust Identifiers
// Description: Classification of caller-supplied trust references.
// Purpose: Turn a raw path segment into a typed UTR or URN identifier.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A trust is addressed either by a Unique Taxpayer Reference (UTR) or by a
//! Unique Reference Number (URN). The two namespaces are mutually exclusive:
//! any reference that is not shaped like a UTR is, by definition, a URN.
//! Classification is a pure function of the string shape and never fails;
//! [`TrustIdentifier::parse`] guards the boundary against blank or padded input.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Number of ASCII digits in a UTR.
pub const UTR_LENGTH: usize = 10;

// ============================================================================
// SECTION: Identifier Kind
// ============================================================================

/// Identifier namespace for a trust reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    /// Unique Taxpayer Reference.
    Utr,
    /// Unique Reference Number.
    Urn,
}

impl IdentifierKind {
    /// Returns the lowercase label used for relationship business keys.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Utr => "utr",
            Self::Urn => "urn",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// SECTION: Trust Identifier
// ============================================================================

/// Typed trust identifier.
///
/// # Invariants
/// - Exactly one variant applies; the variant is derived from the value shape.
/// - The value is immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TrustIdentifier {
    /// Unique Taxpayer Reference (ten ASCII digits).
    Utr(String),
    /// Unique Reference Number (anything that is not a UTR).
    Urn(String),
}

impl TrustIdentifier {
    /// Classifies a reference as a UTR or URN, keeping the value verbatim.
    ///
    /// Exactly ten ASCII digits select UTR; every other shape selects URN.
    /// Emptiness is not checked here: caller-supplied references go through
    /// [`TrustIdentifier::parse`].
    #[must_use]
    pub fn classify(raw: &str) -> Self {
        if is_utr_shape(raw) {
            Self::Utr(raw.to_string())
        } else {
            Self::Urn(raw.to_string())
        }
    }

    /// Parses a caller-supplied reference.
    ///
    /// # Errors
    ///
    /// Returns [`IdentifierError::Empty`] for blank input and
    /// [`IdentifierError::SurroundingWhitespace`] when the reference is padded.
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentifierError::Empty);
        }
        if trimmed.len() != raw.len() {
            return Err(IdentifierError::SurroundingWhitespace);
        }
        Ok(Self::classify(raw))
    }

    /// Returns the identifier namespace.
    #[must_use]
    pub const fn kind(&self) -> IdentifierKind {
        match self {
            Self::Utr(_) => IdentifierKind::Utr,
            Self::Urn(_) => IdentifierKind::Urn,
        }
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Utr(value) | Self::Urn(value) => value,
        }
    }
}

impl fmt::Display for TrustIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.value())
    }
}

/// Identifier parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// Reference was empty or whitespace only.
    #[error("trust identifier must be non-empty")]
    Empty,
    /// Reference had leading or trailing whitespace.
    #[error("trust identifier must not have surrounding whitespace")]
    SurroundingWhitespace,
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when the value is exactly ten ASCII digits.
fn is_utr_shape(value: &str) -> bool {
    value.len() == UTR_LENGTH && value.bytes().all(|byte| byte.is_ascii_digit())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
