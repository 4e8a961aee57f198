// crates/trust-gate-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for trust-gate-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use trust_gate_config::ConfigError;
use trust_gate_config::TrustGateConfig;

/// Redirect section with every required URL.
pub const REDIRECTS: &str = r#"
[redirects]
login = "https://www.example.gov/sign-in"
create_agent_services_account = "https://www.example.gov/agent/create"
agent_not_authorised = "https://www.example.gov/trusts/agent-not-authorised"
trust_not_claimed = "https://www.example.gov/trusts/not-claimed"
already_claimed_by_other = "https://www.example.gov/trusts/already-claimed"
claim_a_trust = "https://www.example.gov/trusts/claim"
maintain_this_trust = "https://www.example.gov/trusts/verify"
unauthorised = "https://www.example.gov/trusts/unauthorised"
"#;

/// Upstream sections with default timeouts.
pub const UPSTREAMS: &str = r#"
[auth_provider]
base_url = "http://127.0.0.1:8500"

[enrolment_store]
base_url = "http://127.0.0.1:7775/"
"#;

/// Returns the smallest valid configuration text.
pub fn minimal_toml() -> String {
    format!("{UPSTREAMS}{REDIRECTS}")
}

/// Parses TOML into a config without validation.
pub fn config_from_toml(toml_str: &str) -> Result<TrustGateConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a minimal config with all defaults applied.
pub fn minimal_config() -> Result<TrustGateConfig, toml::de::Error> {
    config_from_toml(&minimal_toml())
}

/// Asserts the result is an invalid-config error mentioning `needle`.
pub fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> Result<(), String> {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(()) => Err("expected invalid config".to_string()),
    }
}
