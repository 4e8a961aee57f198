// crates/trust-gate-server/src/lib.rs
// ============================================================================
// Module: Trust Gate Server
// Description: HTTP boundary for trust authorization decisions.
// Purpose: Expose the decision engine over axum with audit logging.
// Dependencies: trust-gate-core, trust-gate-config, trust-gate-providers, axum
// ============================================================================

//! ## Overview
//! Trust Gate Server renders [`trust_gate_core::DecisionEngine`] outcomes as
//! JSON over HTTP, issues correlation ids, and writes one audit line per
//! decision. The engine reaches the auth service and enrolment store through
//! the HTTP providers in `trust-gate-providers`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod correlation;
pub mod server;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AccessCodeAuditEvent;
pub use audit::AuditLevel;
pub use audit::AuditSink;
pub use audit::DecisionAuditEvent;
pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use correlation::CLIENT_CORRELATION_HEADER;
pub use correlation::SERVER_CORRELATION_HEADER;
pub use server::ServerError;
pub use server::TrustGateServer;
