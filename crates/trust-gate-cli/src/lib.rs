// crates/trust-gate-cli/src/lib.rs
// ============================================================================
// Module: Trust Gate CLI Library
// Description: Shared helpers for the trust-gate binary.
// Purpose: Expose the message catalog to the binary and its tests.
// Dependencies: Standard library
// ============================================================================

//! ## Overview
//! The library half of `trust-gate-cli` holds the message catalog used by the
//! `trust-gate` binary. Command dispatch lives in `main.rs`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod i18n;
