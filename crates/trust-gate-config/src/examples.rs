// crates/trust-gate-config/src/examples.rs
// ============================================================================
// Module: Config Examples
// Description: Canonical example configuration payload.
// Purpose: Deterministic example for docs, tests, and the CLI.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Canonical example for Trust Gate configuration. The example must always
//! pass validation; the test suite loads it.

/// Returns a canonical example `trust-gate.toml` configuration.
#[must_use]
pub fn config_toml_example() -> String {
    String::from(
        r#"[server]
bind = "127.0.0.1:9781"
max_body_bytes = 65536

[server.audit]
enabled = true
# path = "trust-gate-audit.jsonl"

[auth_provider]
base_url = "http://localhost:8500"
connect_timeout_ms = 500
request_timeout_ms = 2000

[enrolment_store]
base_url = "http://localhost:7775"
connect_timeout_ms = 500
request_timeout_ms = 2000

[redirects]
login = "http://localhost:9949/auth-login-stub/gg-sign-in"
create_agent_services_account = "http://localhost:9437/agent-services-account/create"
agent_not_authorised = "http://localhost:9781/maintain-a-trust/agent-not-authorised"
trust_not_claimed = "http://localhost:9781/maintain-a-trust/trust-not-claimed"
already_claimed_by_other = "http://localhost:9781/claim-a-trust/already-claimed"
claim_a_trust = "http://localhost:9781/claim-a-trust"
maintain_this_trust = "http://localhost:9781/maintain-a-trust/verify-identity"
unauthorised = "http://localhost:9781/maintain-a-trust/unauthorised"

[access_codes]
codes = []
"#,
    )
}
