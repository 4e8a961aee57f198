// crates/trust-gate-config/src/lib.rs
// ============================================================================
// Module: Trust Gate Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for trust-gate.toml semantics.
// Dependencies: trust-gate-core, serde, toml, url
// ============================================================================

//! ## Overview
//! `trust-gate-config` defines the configuration model for Trust Gate: the
//! HTTP bind address, the upstream authentication provider and enrolment
//! store, the redirect URL for every denial, and the access-code allow-list.
//! Validation is strict and fails closed.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
