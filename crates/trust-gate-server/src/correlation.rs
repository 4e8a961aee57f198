// crates/trust-gate-server/src/correlation.rs
// ============================================================================
// Module: Correlation IDs
// Description: Client correlation sanitization and server id issuance.
// Purpose: Tie audit lines and upstream calls to a single request.
// Dependencies: rand, axum
// ============================================================================

//! ## Overview
//! Callers may send `x-correlation-id`. The value is untrusted: it is kept
//! only when it is 1 to 128 visible ASCII characters, and dropped otherwise.
//! A kept value is forwarded to the upstream services. Independently, every
//! request is issued a server id (`x-server-correlation-id`) built from a
//! boot-scoped random prefix and a process-wide counter.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use axum::http::HeaderMap;
use rand::RngCore;
use rand::rngs::OsRng;
use trust_gate_providers::CORRELATION_HEADER;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header carrying the client-supplied correlation id.
pub const CLIENT_CORRELATION_HEADER: &str = CORRELATION_HEADER;
/// Header carrying the server-issued correlation id.
pub const SERVER_CORRELATION_HEADER: &str = "x-server-correlation-id";
/// Longest accepted client correlation id.
pub const MAX_CLIENT_CORRELATION_ID_LENGTH: usize = 128;

// ============================================================================
// SECTION: Rejections
// ============================================================================

/// Why a client correlation id was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrelationRejection {
    /// Blank after trimming.
    Empty,
    /// Longer than [`MAX_CLIENT_CORRELATION_ID_LENGTH`].
    TooLong,
    /// Contains whitespace, control, or non-ASCII characters.
    NotVisibleAscii,
}

impl CorrelationRejection {
    /// Returns a stable label for audit logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::TooLong => "too_long",
            Self::NotVisibleAscii => "not_visible_ascii",
        }
    }
}

impl fmt::Display for CorrelationRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validates a raw client correlation id.
///
/// # Errors
///
/// Returns [`CorrelationRejection`] when the value is blank, too long, or
/// contains anything other than visible ASCII.
pub fn check_client_correlation_id(raw: &str) -> Result<&str, CorrelationRejection> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CorrelationRejection::Empty);
    }
    if trimmed.len() > MAX_CLIENT_CORRELATION_ID_LENGTH {
        return Err(CorrelationRejection::TooLong);
    }
    if !trimmed.bytes().all(|byte| byte.is_ascii_graphic()) {
        return Err(CorrelationRejection::NotVisibleAscii);
    }
    Ok(trimmed)
}

// ============================================================================
// SECTION: Request Correlation
// ============================================================================

/// Correlation ids for one request.
///
/// # Invariants
/// - `client_id`, when present, passed [`check_client_correlation_id`].
/// - `server_id` is unique within the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestCorrelation {
    /// Sanitized client id.
    pub client_id: Option<String>,
    /// Rejection label when the client sent an unusable id.
    pub client_rejection: Option<CorrelationRejection>,
    /// Server-issued id.
    pub server_id: String,
}

impl RequestCorrelation {
    /// Reads the client header and issues a server id.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, generator: &CorrelationIdGenerator) -> Self {
        let raw = headers.get(CLIENT_CORRELATION_HEADER).map(|value| value.to_str());
        let (client_id, client_rejection) = match raw {
            None => (None, None),
            Some(Err(_)) => (None, Some(CorrelationRejection::NotVisibleAscii)),
            Some(Ok(value)) => match check_client_correlation_id(value) {
                Ok(id) => (Some(id.to_string()), None),
                Err(rejection) => (None, Some(rejection)),
            },
        };
        Self {
            client_id,
            client_rejection,
            server_id: generator.issue(),
        }
    }
}

// ============================================================================
// SECTION: Generator
// ============================================================================

/// Issues server correlation ids.
#[derive(Debug)]
pub struct CorrelationIdGenerator {
    /// Fixed prefix.
    prefix: &'static str,
    /// Random value chosen at construction.
    boot_id: u64,
    /// Next sequence number.
    counter: AtomicU64,
}

impl CorrelationIdGenerator {
    /// Creates a generator with the given prefix.
    #[must_use]
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            boot_id: OsRng.next_u64(),
            counter: AtomicU64::new(1),
        }
    }

    /// Issues the next id as `{prefix}-{boot:016x}-{seq:016x}`.
    #[must_use]
    pub fn issue(&self) -> String {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}-{:016x}-{seq:016x}", self.prefix, self.boot_id)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
