// crates/trust-gate-core/src/runtime/access_code.rs
// ============================================================================
// Module: Access Code Authoriser
// Description: Allow-list membership check for caller-supplied access codes.
// Purpose: Side channel independent of the decision engine.
// Dependencies: serde_json, subtle, thiserror
// ============================================================================

//! ## Overview
//! The request body must be a single JSON string. A missing or malformed body
//! is a bad request, never a denial. Membership is tested in constant time
//! against every configured code.

// ============================================================================
// SECTION: Imports
// ============================================================================

use subtle::Choice;
use subtle::ConstantTimeEq;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Access code request errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessCodeError {
    /// Body was empty.
    #[error("access code body is empty")]
    MissingCode,
    /// Body was not a JSON string.
    #[error("access code body must be a JSON string: {0}")]
    InvalidBody(String),
}

// ============================================================================
// SECTION: Authoriser
// ============================================================================

/// Static allow-list of access codes.
#[derive(Clone, Default)]
pub struct AccessCodeAuthoriser {
    /// Configured codes.
    codes: Vec<String>,
}

impl AccessCodeAuthoriser {
    /// Creates an authoriser over the configured codes.
    #[must_use]
    pub const fn new(codes: Vec<String>) -> Self {
        Self { codes }
    }

    /// Parses the request body into a code.
    ///
    /// # Errors
    ///
    /// Returns [`AccessCodeError`] when the body is empty or not a JSON string.
    pub fn parse_body(body: &[u8]) -> Result<String, AccessCodeError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(AccessCodeError::MissingCode);
        }
        let value: serde_json::Value = serde_json::from_slice(body)
            .map_err(|err| AccessCodeError::InvalidBody(err.to_string()))?;
        match value {
            serde_json::Value::String(code) => Ok(code),
            other => Err(AccessCodeError::InvalidBody(format!(
                "expected string, found {}",
                json_type(&other)
            ))),
        }
    }

    /// Returns true when the code is on the allow-list.
    #[must_use]
    pub fn is_authorised(&self, code: &str) -> bool {
        let candidate = code.as_bytes();
        let mut found = Choice::from(0);
        for allowed in &self.codes {
            found |= allowed.as_bytes().ct_eq(candidate);
        }
        bool::from(found)
    }

    /// Parses the body and checks membership.
    ///
    /// # Errors
    ///
    /// Returns [`AccessCodeError`] when the body is malformed.
    pub fn authorise_body(&self, body: &[u8]) -> Result<bool, AccessCodeError> {
        let code = Self::parse_body(body)?;
        Ok(self.is_authorised(&code))
    }
}

impl std::fmt::Debug for AccessCodeAuthoriser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessCodeAuthoriser").field("codes", &self.codes.len()).finish()
    }
}

/// Returns a JSON type name for error messages.
const fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
