// crates/trust-gate-server/src/audit.rs
// ============================================================================
// Module: Audit Logging
// Description: Structured audit events for authorization decisions.
// Purpose: Emit one JSON line per decision without leaking identifiers.
// Dependencies: trust-gate-core, trust-gate-config, serde
// ============================================================================

//! ## Overview
//! Two events are emitted: `authz_decision` for the trust and agent
//! endpoints, and `access_code_check` for the access-code endpoint. Sinks
//! write JSON lines to stderr or an append-only file, or discard them.
//!
//! Security posture: events carry the identifier kind and the decision trace
//! labels only. Identifier values, agent reference numbers, credentials, and
//! access codes are never recorded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use trust_gate_config::ServerAuditConfig;
use trust_gate_core::AuthorizationOutcome;
use trust_gate_core::DecisionTrace;
use trust_gate_core::FailureKind;

use crate::correlation::CorrelationRejection;
use crate::correlation::RequestCorrelation;

// ============================================================================
// SECTION: Levels
// ============================================================================

/// Severity attached to each audit line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditLevel {
    /// Expected outcome.
    Info,
    /// Session present but unusable.
    Warn,
    /// Dependency failure or malformed request.
    Error,
}

impl AuditLevel {
    /// Level for a failure kind.
    #[must_use]
    pub const fn for_failure(kind: FailureKind) -> Self {
        match kind {
            FailureKind::Unauthenticated => Self::Info,
            FailureKind::IdentityIncomplete => Self::Warn,
            FailureKind::UpstreamError | FailureKind::BadRequest => Self::Error,
        }
    }

    /// Level for a decision outcome.
    #[must_use]
    pub const fn for_outcome(outcome: &AuthorizationOutcome) -> Self {
        match outcome {
            AuthorizationOutcome::Failed(kind) => Self::for_failure(*kind),
            _ => Self::Info,
        }
    }
}

// ============================================================================
// SECTION: Events
// ============================================================================

/// Decision audit event.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionAuditEvent {
    /// Event name.
    pub event: &'static str,
    /// Severity.
    pub level: AuditLevel,
    /// Milliseconds since epoch.
    pub timestamp_ms: u128,
    /// Endpoint label.
    pub endpoint: &'static str,
    /// Server-issued correlation id.
    pub server_correlation_id: String,
    /// Sanitized client correlation id.
    pub client_correlation_id: Option<String>,
    /// Why the client correlation id was dropped, if it was.
    pub client_correlation_rejection: Option<&'static str>,
    /// Outcome label.
    pub outcome: &'static str,
    /// Redirect target label for denials.
    pub redirect: Option<&'static str>,
    /// Failure label for failed decisions.
    pub failure: Option<&'static str>,
    /// Steps consulted.
    pub trace: DecisionTrace,
}

impl DecisionAuditEvent {
    /// Builds a decision event stamped with the current time.
    #[must_use]
    pub fn new(
        endpoint: &'static str,
        correlation: &RequestCorrelation,
        outcome: &AuthorizationOutcome,
        trace: DecisionTrace,
    ) -> Self {
        let (redirect, failure) = match outcome {
            AuthorizationOutcome::Denied(target) => (Some(target.label()), None),
            AuthorizationOutcome::Failed(kind) => (None, Some(kind.label())),
            AuthorizationOutcome::Allowed | AuthorizationOutcome::AgentAllowed(_) => (None, None),
        };
        Self {
            event: "authz_decision",
            level: AuditLevel::for_outcome(outcome),
            timestamp_ms: now_ms(),
            endpoint,
            server_correlation_id: correlation.server_id.clone(),
            client_correlation_id: correlation.client_id.clone(),
            client_correlation_rejection: correlation
                .client_rejection
                .map(CorrelationRejection::label),
            outcome: outcome.label(),
            redirect,
            failure,
            trace,
        }
    }
}

/// Access-code audit event.
#[derive(Debug, Clone, Serialize)]
pub struct AccessCodeAuditEvent {
    /// Event name.
    pub event: &'static str,
    /// Severity.
    pub level: AuditLevel,
    /// Milliseconds since epoch.
    pub timestamp_ms: u128,
    /// Server-issued correlation id.
    pub server_correlation_id: String,
    /// Sanitized client correlation id.
    pub client_correlation_id: Option<String>,
    /// Why the client correlation id was dropped, if it was.
    pub client_correlation_rejection: Option<&'static str>,
    /// Membership result when the check ran.
    pub authorised: Option<bool>,
    /// Failure label when the check could not run.
    pub failure: Option<&'static str>,
    /// Failure detail.
    pub detail: Option<String>,
}

impl AccessCodeAuditEvent {
    /// Builds an access-code event stamped with the current time.
    #[must_use]
    pub fn new(
        correlation: &RequestCorrelation,
        result: Result<bool, FailureKind>,
        detail: Option<String>,
    ) -> Self {
        let (level, authorised, failure) = match result {
            Ok(authorised) => (AuditLevel::Info, Some(authorised), None),
            Err(kind) => (AuditLevel::for_failure(kind), None, Some(kind.label())),
        };
        Self {
            event: "access_code_check",
            level,
            timestamp_ms: now_ms(),
            server_correlation_id: correlation.server_id.clone(),
            client_correlation_id: correlation.client_id.clone(),
            client_correlation_rejection: correlation
                .client_rejection
                .map(CorrelationRejection::label),
            authorised,
            failure,
            detail,
        }
    }
}

/// Current time in milliseconds since epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Destination for audit events.
pub trait AuditSink: Send + Sync {
    /// Records a decision event.
    fn record_decision(&self, event: &DecisionAuditEvent);

    /// Records an access-code event.
    fn record_access_code(&self, event: &AccessCodeAuditEvent);
}

/// Builds the sink selected by configuration.
///
/// # Errors
///
/// Returns an error when the audit file cannot be opened.
pub fn sink_from_config(config: &ServerAuditConfig) -> io::Result<Arc<dyn AuditSink>> {
    if !config.enabled {
        return Ok(Arc::new(NoopAuditSink));
    }
    match &config.path {
        Some(path) => Ok(Arc::new(FileAuditSink::new(Path::new(path))?)),
        None => Ok(Arc::new(StderrAuditSink)),
    }
}

/// Writes JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record_decision(&self, event: &DecisionAuditEvent) {
        write_json_line(&mut io::stderr(), event);
    }

    fn record_access_code(&self, event: &AccessCodeAuditEvent) {
        write_json_line(&mut io::stderr(), event);
    }
}

/// Appends JSON lines to a file.
pub struct FileAuditSink {
    /// Append-mode handle.
    file: Mutex<File>,
}

impl FileAuditSink {
    /// Opens (or creates) the file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Writes one event under the file lock.
    fn append<T: Serialize>(&self, event: &T) {
        if let Ok(mut file) = self.file.lock() {
            write_json_line(&mut *file, event);
            let _ = file.flush();
        }
    }
}

impl AuditSink for FileAuditSink {
    fn record_decision(&self, event: &DecisionAuditEvent) {
        self.append(event);
    }

    fn record_access_code(&self, event: &AccessCodeAuditEvent) {
        self.append(event);
    }
}

/// Discards events.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record_decision(&self, _event: &DecisionAuditEvent) {}

    fn record_access_code(&self, _event: &AccessCodeAuditEvent) {}
}

/// Serializes an event and writes it as a single line.
fn write_json_line<W: Write, T: Serialize>(writer: &mut W, event: &T) {
    if let Ok(payload) = serde_json::to_string(event) {
        let _ = writeln!(writer, "{payload}");
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
