// crates/trust-gate-server/tests/common/mod.rs
// ============================================================================
// Module: Server Test Fixtures
// Description: Scripted upstream services and a running Trust Gate server.
// Purpose: Exercise the full HTTP stack against in-process upstreams.
// Dependencies: trust-gate-server, trust-gate-config, axum, tokio
// ============================================================================

//! ## Overview
//! [`Upstream`] plays both the auth service and the enrolment store on one
//! axum listener. Sessions are keyed by bearer token; predicate answers and
//! claim counts are keyed by identifier value. [`spawn_gate`] starts a Trust
//! Gate server wired to it through the real HTTP providers.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test fixtures panic on setup failures."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::http::header::WWW_AUTHENTICATE;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum::routing::post;
use serde_json::Value;
use serde_json::json;
use tokio::sync::oneshot;
use trust_gate_config::TrustGateConfig;
use trust_gate_config::config_toml_example;
use trust_gate_server::TrustGateServer;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Access code accepted by the test configuration.
pub const ACCESS_CODE: &str = "OPEN-SESAME";
/// Request body limit used by the test configuration.
pub const MAX_BODY_BYTES: usize = 1024;

// ============================================================================
// SECTION: Upstream Script
// ============================================================================

/// Scripted auth service and enrolment store state.
#[derive(Default)]
pub struct Upstream {
    /// Retrieval bodies keyed by bearer token.
    sessions: BTreeMap<String, Value>,
    /// Identifier values with delegated authority.
    delegated: BTreeSet<String>,
    /// Identifier values with an established ownership relationship.
    relationships: BTreeSet<String>,
    /// Principal counts keyed by composite enrolment key.
    principals: BTreeMap<String, usize>,
    /// When set, the enrolment store answers 503.
    store_down: bool,
    /// Correlation ids seen on auth calls.
    correlation_ids: Mutex<Vec<String>>,
    /// Number of auth calls received.
    auth_calls: Mutex<usize>,
}

impl Upstream {
    /// Adds a session for `token`.
    pub fn session(
        mut self,
        token: &str,
        internal_id: Option<&str>,
        group: &str,
        enrolments: Value,
    ) -> Self {
        let mut body = json!({"affinityGroup": group, "allEnrolments": enrolments});
        if let Some(internal_id) = internal_id {
            body["internalId"] = json!(internal_id);
        }
        self.sessions.insert(format!("Bearer {token}"), body);
        self
    }

    /// Grants delegated authority over `value`.
    pub fn delegated(mut self, value: &str) -> Self {
        self.delegated.insert(value.to_string());
        self
    }

    /// Establishes the ownership relationship for `value`.
    pub fn relationship(mut self, value: &str) -> Self {
        self.relationships.insert(value.to_string());
        self
    }

    /// Records `count` principals for a composite enrolment key.
    pub fn principals(mut self, key: &str, count: usize) -> Self {
        self.principals.insert(key.to_string(), count);
        self
    }

    /// Makes the enrolment store fail.
    pub fn store_down(mut self) -> Self {
        self.store_down = true;
        self
    }

    /// Correlation ids the auth service observed.
    pub fn correlation_ids(&self) -> Vec<String> {
        self.correlation_ids.lock().unwrap().clone()
    }

    /// Number of auth calls the auth service observed.
    pub fn auth_calls(&self) -> usize {
        *self.auth_calls.lock().unwrap()
    }
}

/// Agent services enrolment JSON.
pub fn agent_enrolment(arn: &str) -> Value {
    json!({
        "key": "HMRC-AS-AGENT",
        "identifiers": [{"key": "AgentReferenceNumber", "value": arn}],
        "state": "Activated"
    })
}

/// UTR trust enrolment JSON.
pub fn utr_enrolment(utr: &str) -> Value {
    json!({
        "key": "HMRC-TERS-ORG",
        "identifiers": [{"key": "SAUTR", "value": utr}],
        "state": "Activated"
    })
}

// ============================================================================
// SECTION: Upstream Handlers
// ============================================================================

fn unauthorised(detail: &str) -> Response {
    let mut response = StatusCode::UNAUTHORIZED.into_response();
    let value = format!("MDTP detail=\"{detail}\"").parse().unwrap();
    response.headers_mut().insert(WWW_AUTHENTICATE, value);
    response
}

async fn auth_handler(
    State(upstream): State<Arc<Upstream>>,
    headers: HeaderMap,
    Json(request): Json<Value>,
) -> Response {
    *upstream.auth_calls.lock().unwrap() += 1;
    if let Some(id) = headers.get("x-correlation-id").and_then(|value| value.to_str().ok()) {
        upstream.correlation_ids.lock().unwrap().push(id.to_string());
    }
    let Some(token) = headers.get(AUTHORIZATION).and_then(|value| value.to_str().ok()) else {
        return unauthorised("MissingBearerToken");
    };
    let Some(session) = upstream.sessions.get(token) else {
        return unauthorised("InvalidBearerToken");
    };
    let predicates = request["authorise"].as_array().cloned().unwrap_or_default();
    let Some(predicate) = predicates.first() else {
        return (StatusCode::OK, Json(session.clone())).into_response();
    };
    if predicate.get("enrolment").is_some() {
        let value = predicate["identifiers"][0]["value"].as_str().unwrap_or_default();
        if upstream.delegated.contains(value) {
            return (StatusCode::OK, Json(json!({}))).into_response();
        }
        return unauthorised("InsufficientEnrolments");
    }
    let value = predicate["businessKeys"][0]["value"].as_str().unwrap_or_default();
    if upstream.relationships.contains(value) {
        return (StatusCode::OK, Json(json!({}))).into_response();
    }
    unauthorised("FailedRelationship")
}

async fn store_handler(
    State(upstream): State<Arc<Upstream>>,
    Path(key): Path<String>,
) -> Response {
    if upstream.store_down {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    match upstream.principals.get(&key).copied().unwrap_or(0) {
        0 => StatusCode::NO_CONTENT.into_response(),
        count => {
            let ids: Vec<String> = (0..count).map(|idx| format!("principal-{idx}")).collect();
            (StatusCode::OK, Json(json!({"principalUserIds": ids}))).into_response()
        }
    }
}

/// Spawns the scripted upstream and returns its base URL.
pub async fn spawn_upstream(upstream: Arc<Upstream>) -> (String, oneshot::Sender<()>) {
    let app = Router::new()
        .route("/auth/authorise", post(auth_handler))
        .route("/enrolment-store-proxy/enrolment-store/enrolments/{key}/users", get(store_handler))
        .with_state(upstream);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind upstream");
    let addr = listener.local_addr().expect("upstream addr");
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await;
    });
    (format!("http://{addr}"), shutdown_tx)
}

// ============================================================================
// SECTION: Gate
// ============================================================================

/// Running Trust Gate server with its upstream.
pub struct Gate {
    /// Gate base URL.
    pub base_url: String,
    /// Scripted upstream state.
    pub upstream: Arc<Upstream>,
    /// Audit log path.
    pub audit_path: PathBuf,
    /// Configuration the gate was built from.
    pub config: TrustGateConfig,
    /// Keeps the audit directory alive.
    _audit_dir: tempfile::TempDir,
    /// Gate shutdown.
    gate_shutdown: Option<oneshot::Sender<()>>,
    /// Upstream shutdown.
    upstream_shutdown: Option<oneshot::Sender<()>>,
}

impl Gate {
    /// Builds a URL on the gate.
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Reads the audit log as JSON lines.
    pub fn audit_lines(&self) -> Vec<Value> {
        let content = std::fs::read_to_string(&self.audit_path).unwrap_or_default();
        content.lines().map(|line| serde_json::from_str(line).expect("audit json")).collect()
    }

    /// Raw audit log content.
    pub fn audit_raw(&self) -> String {
        std::fs::read_to_string(&self.audit_path).unwrap_or_default()
    }
}

impl Drop for Gate {
    fn drop(&mut self) {
        if let Some(tx) = self.gate_shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(tx) = self.upstream_shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Starts an upstream and a gate configured against it.
pub async fn spawn_gate(upstream: Upstream) -> Gate {
    let upstream = Arc::new(upstream);
    let (upstream_url, upstream_shutdown) = spawn_upstream(Arc::clone(&upstream)).await;
    let audit_dir = tempfile::tempdir().expect("audit dir");
    let audit_path = audit_dir.path().join("audit.jsonl");

    let mut config = TrustGateConfig::from_toml_str(&config_toml_example()).expect("example");
    config.auth_provider.base_url.clone_from(&upstream_url);
    config.enrolment_store.base_url = upstream_url;
    config.access_codes.codes = vec![ACCESS_CODE.to_string()];
    config.server.max_body_bytes = MAX_BODY_BYTES;
    config.server.audit.path = Some(audit_path.to_string_lossy().into_owned());

    let server = TrustGateServer::from_config(config.clone()).expect("gate");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind gate");
    let addr = listener.local_addr().expect("gate addr");
    let (gate_tx, gate_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let _ = server
            .serve_listener(listener, async move {
                let _ = gate_rx.await;
            })
            .await;
    });
    Gate {
        base_url: format!("http://{addr}"),
        upstream,
        audit_path,
        config,
        _audit_dir: audit_dir,
        gate_shutdown: Some(gate_tx),
        upstream_shutdown: Some(upstream_shutdown),
    }
}
