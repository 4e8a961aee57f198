// crates/trust-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Trust Gate Runtime
// Description: Context resolution, checkers, decision engine, access codes.
// Purpose: Reduce caller identity and external checks to one outcome.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules run the per-request decision. The resolver always runs
//! first; the engine then dispatches on role to the checkers. Every external
//! call is awaited sequentially because each later call depends on the
//! earlier result. Nothing here keeps state across requests.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod access_code;
pub mod checks;
pub mod engine;
pub mod resolver;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use access_code::AccessCodeAuthoriser;
pub use access_code::AccessCodeError;
pub use checks::CheckFailure;
pub use checks::ClaimStatusChecker;
pub use checks::DelegatedAuthority;
pub use checks::DelegatedAuthorityChecker;
pub use checks::Relationship;
pub use checks::RelationshipChecker;
pub use engine::CheckKind;
pub use engine::CheckRecord;
pub use engine::Decision;
pub use engine::DecisionEngine;
pub use engine::DecisionTrace;
pub use resolver::AuthContextResolver;
pub use resolver::ResolveError;
