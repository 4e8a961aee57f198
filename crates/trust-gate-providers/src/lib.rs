// crates/trust-gate-providers/src/lib.rs
// ============================================================================
// Module: Trust Gate Providers Library
// Description: HTTP clients for the authentication provider and registry.
// Purpose: Implement the core provider interfaces over async HTTP.
// Dependencies: trust-gate-core, trust-gate-config, reqwest, serde, url
// ============================================================================

//! ## Overview
//! [`HttpAuthProvider`] and [`HttpEnrolmentRegistry`] implement the core
//! [`trust_gate_core::AuthProvider`] and [`trust_gate_core::EnrolmentRegistry`]
//! traits. Each issues exactly one request per call with bounded connect and
//! request timeouts and never retries.
//!
//! Security posture: upstream responses are untrusted; anything outside the
//! documented status and body shapes fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod auth;
pub mod registry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use auth::HttpAuthProvider;
pub use registry::HttpEnrolmentRegistry;

// ============================================================================
// SECTION: Shared Constants
// ============================================================================

/// Header carrying the sanitized client correlation identifier upstream.
pub const CORRELATION_HEADER: &str = "x-correlation-id";
