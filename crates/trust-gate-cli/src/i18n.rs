// crates/trust-gate-cli/src/i18n.rs
// ============================================================================
// Module: CLI Message Catalog
// Description: Static message catalog and placeholder substitution.
// Purpose: Keep every user-facing CLI string in one table.
// Dependencies: Standard library collections
// ============================================================================

//! ## Overview
//! User-facing strings live in [`CATALOG_ITEMS`] and are rendered through the
//! [`t!`](crate::t) macro.
//!
//! ## Invariants
//! - The catalog is built once and read-only thereafter.
//! - Unknown keys render as the key itself.
//! - Placeholders are substituted in argument order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A named placeholder value captured by the [`macro@crate::t`] macro.
#[derive(Clone, Debug)]
pub struct MessageArg {
    /// Placeholder name without braces (e.g. `"path"`).
    pub key: &'static str,
    /// Rendered value substituted for the placeholder.
    pub value: String,
}

impl MessageArg {
    /// Builds a message argument.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// English catalog entries.
pub const CATALOG_ITEMS: &[(&str, &str)] = &[
    ("main.version", "trust-gate {version}"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("config.validate.ok", "Config valid."),
    ("serve.config.load_failed", "Failed to load config: {error}"),
    ("serve.init_failed", "Failed to initialize Trust Gate: {error}"),
    ("serve.listening", "Trust Gate listening on {bind}"),
    ("serve.failed", "Trust Gate server failed: {error}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
];

/// Renders the catalog entry for `key` with `args` substituted.
///
/// Unknown keys render as the key itself.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    let mut result = template.to_string();
    for arg in args {
        result = result.replace(&format!("{{{}}}", arg.key), &arg.value);
    }
    result
}

/// Returns the catalog keyed by message id.
#[must_use]
pub fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    CATALOG.get_or_init(|| CATALOG_ITEMS.iter().copied().collect())
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Renders a catalog message with named placeholder values.
///
/// ```ignore
/// let line = t!("serve.listening", bind = "127.0.0.1:8080");
/// ```
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
